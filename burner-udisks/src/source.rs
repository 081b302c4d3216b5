// SPDX-License-Identifier: GPL-3.0-only

//! UDisks2 notification source
//!
//! Translates `org.freedesktop.DBus.ObjectManager` signals on the UDisks2
//! root object into the four [`DeviceNotification`] kinds. Drive objects
//! map directly; Block objects are resolved to their owning drive through
//! the `Drive` property carried in the InterfacesAdded payload, with a
//! small path map so removals (which carry no properties) still resolve.

use std::collections::HashMap;

use anyhow::Result;
use futures::StreamExt;
use tracing::warn;
use zbus::Connection;
use zbus::zvariant::{ObjectPath, OwnedValue};

use burner_media::{EventFanout, EventStream};
use burner_types::DeviceNotification;

use crate::proxies::{BLOCK_IFACE, DRIVE_IFACE, UDisks2ObjectManagerProxy};

pub struct UdisksSource {
    connection: Connection,
}

impl UdisksSource {
    pub async fn new() -> Result<Self> {
        let connection = Connection::system().await?;
        Ok(Self { connection })
    }

    pub fn with_connection(connection: Connection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Connected-drive notifications for everything already present.
    /// Feeding only these through the pump performs a one-shot enumeration.
    pub async fn initial_notifications(&self) -> Result<Vec<DeviceNotification>> {
        let object_manager = UDisks2ObjectManagerProxy::new(&self.connection).await?;
        let objects = object_manager.get_managed_objects().await?;

        let mut notifications = Vec::new();
        for (path, interfaces) in &objects {
            if interfaces.contains_key(DRIVE_IFACE) {
                notifications.push(DeviceNotification::DriveConnected {
                    device: path.to_string(),
                });
            }
        }

        Ok(notifications)
    }

    /// Live notification stream: current devices first, then hot-plug
    /// signals for as long as the stream is held.
    pub async fn notifications(&self) -> Result<EventStream<DeviceNotification>> {
        let object_manager = UDisks2ObjectManagerProxy::new(&self.connection).await?;
        let mut added_stream = object_manager.receive_interfaces_added().await?;
        let mut removed_stream = object_manager.receive_interfaces_removed().await?;

        let mut fanout = EventFanout::new();
        let stream = fanout.subscribe();

        // Seed with the devices that are already there, and remember which
        // block belongs to which drive for later removals.
        let objects = object_manager.get_managed_objects().await?;
        let mut block_to_drive: HashMap<String, String> = HashMap::new();
        for (path, interfaces) in &objects {
            if interfaces.contains_key(DRIVE_IFACE) {
                fanout.emit(DeviceNotification::DriveConnected {
                    device: path.to_string(),
                });
            }
            if let Some(properties) = interfaces.get(BLOCK_IFACE)
                && let Some(drive) = drive_of_block(properties)
            {
                block_to_drive.insert(path.to_string(), drive);
            }
        }

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    maybe_added = added_stream.next() => {
                        let Some(signal) = maybe_added else { break };
                        match signal.args() {
                            Ok(args) => {
                                let path = args.object_path.to_string();
                                if args.interfaces_and_properties.contains_key(DRIVE_IFACE) {
                                    fanout.emit(DeviceNotification::DriveConnected {
                                        device: path.clone(),
                                    });
                                }
                                if let Some(properties) =
                                    args.interfaces_and_properties.get(BLOCK_IFACE)
                                {
                                    let drive = drive_of_block(properties);
                                    if let Some(drive) = &drive {
                                        block_to_drive.insert(path, drive.clone());
                                    }
                                    fanout.emit(DeviceNotification::VolumeAdded {
                                        device: drive,
                                    });
                                }
                            }
                            Err(e) => {
                                warn!("Failed to parse InterfacesAdded signal args: {e}");
                            }
                        }
                    }
                    maybe_removed = removed_stream.next() => {
                        let Some(signal) = maybe_removed else { break };
                        match signal.args() {
                            Ok(args) => {
                                let path = args.object_path.to_string();
                                if args.interfaces.iter().any(|i| i == DRIVE_IFACE) {
                                    fanout.emit(DeviceNotification::DriveDisconnected {
                                        device: path.clone(),
                                    });
                                }
                                if args.interfaces.iter().any(|i| i == BLOCK_IFACE) {
                                    fanout.emit(DeviceNotification::VolumeRemoved {
                                        device: block_to_drive.remove(&path),
                                    });
                                }
                            }
                            Err(e) => {
                                warn!("Failed to parse InterfacesRemoved signal args: {e}");
                            }
                        }
                    }
                }
            }
        });

        Ok(stream)
    }
}

/// The owning drive of a Block object, from its `Drive` property. Loop and
/// ram devices point at "/", which means no drive.
fn drive_of_block(properties: &HashMap<String, OwnedValue>) -> Option<String> {
    let value = properties.get("Drive")?;
    match value.downcast_ref::<ObjectPath<'_>>() {
        Ok(path) if path.as_str() != "/" => Some(path.to_string()),
        Ok(_) => None,
        Err(e) => {
            warn!("Block object carries an unreadable Drive property: {e}");
            None
        }
    }
}
