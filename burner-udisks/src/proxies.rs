// SPDX-License-Identifier: GPL-3.0-only

//! Hand-written proxies for the UDisks2 interface subset this adapter
//! consumes.

use std::collections::HashMap;

use zbus::zvariant::{OwnedObjectPath, OwnedValue};
use zbus_macros::proxy;

pub const DRIVE_IFACE: &str = "org.freedesktop.UDisks2.Drive";
pub const BLOCK_IFACE: &str = "org.freedesktop.UDisks2.Block";

#[proxy(
    default_service = "org.freedesktop.UDisks2",
    default_path = "/org/freedesktop/UDisks2",
    interface = "org.freedesktop.DBus.ObjectManager"
)]
pub trait UDisks2ObjectManager {
    fn get_managed_objects(
        &self,
    ) -> zbus::Result<HashMap<OwnedObjectPath, HashMap<String, HashMap<String, OwnedValue>>>>;

    #[zbus(signal)]
    fn interfaces_added(
        &self,
        object_path: OwnedObjectPath,
        interfaces_and_properties: HashMap<String, HashMap<String, OwnedValue>>,
    ) -> zbus::Result<()>;

    #[zbus(signal)]
    fn interfaces_removed(
        &self,
        object_path: OwnedObjectPath,
        interfaces: Vec<String>,
    ) -> zbus::Result<()>;
}

#[proxy(
    default_service = "org.freedesktop.UDisks2",
    interface = "org.freedesktop.UDisks2.Drive"
)]
pub trait UDisks2Drive {
    #[zbus(property)]
    fn vendor(&self) -> zbus::Result<String>;

    #[zbus(property)]
    fn model(&self) -> zbus::Result<String>;

    #[zbus(property)]
    fn optical(&self) -> zbus::Result<bool>;

    #[zbus(property)]
    fn optical_blank(&self) -> zbus::Result<bool>;

    #[zbus(property)]
    fn media_available(&self) -> zbus::Result<bool>;

    #[zbus(property)]
    fn media(&self) -> zbus::Result<String>;

    #[zbus(property)]
    fn media_compatibility(&self) -> zbus::Result<Vec<String>>;

    #[zbus(property)]
    fn size(&self) -> zbus::Result<u64>;
}
