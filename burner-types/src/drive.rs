// SPDX-License-Identifier: GPL-3.0-only

//! Drive and medium snapshot models
//!
//! These types are the wire/query representation of the monitor's state.
//! The stateful objects live in `burner-media`; everything crossing an
//! event stream or a JSON boundary is one of the snapshots below.

use serde::{Deserialize, Serialize};

use crate::media::MediaSet;

/// Point-in-time view of one optical drive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriveInfo {
    /// Device path (e.g. "/dev/sr0"). `None` only for the image-file drive.
    pub device: Option<String>,

    /// Vendor string from the hardware probe.
    pub vendor: String,

    /// Model string from the hardware probe.
    pub model: String,

    /// Whether the drive can record media.
    pub can_write: bool,

    /// Whether the drive can read media.
    pub can_read: bool,

    /// Whether this is a virtual drive (image-file backed).
    pub fake: bool,

    /// Monitor-assigned identity. A drive that leaves and comes back gets a
    /// new instance; a cancelled removal keeps the old one.
    pub instance: u64,
}

impl DriveInfo {
    /// Get a human-readable display name for the drive.
    pub fn display_name(&self) -> String {
        if self.fake {
            return "Image file".to_string();
        }

        if !self.model.is_empty() {
            if !self.vendor.is_empty() {
                format!("{} {}", self.vendor, self.model)
            } else {
                self.model.clone()
            }
        } else if !self.vendor.is_empty() {
            format!("{} Drive", self.vendor)
        } else {
            self.device
                .as_deref()
                .and_then(|device| device.split('/').next_back())
                .unwrap_or("Unknown drive")
                .to_string()
        }
    }
}

/// Stable identity of a medium: the drive it sits in plus the insertion
/// generation. A re-inserted disc is a new medium.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MediumId {
    pub device: Option<String>,
    pub generation: u64,
}

/// Point-in-time view of one medium.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediumInfo {
    /// Device path of the owning drive; `None` for the image-file medium.
    pub device: Option<String>,

    /// Insertion generation, monotonically increasing per monitor.
    pub generation: u64,

    /// Format, writability and lifecycle attributes.
    pub status: MediaSet,

    /// Remaining capacity in bytes.
    pub free_bytes: u64,

    /// Recorded capacity in bytes.
    pub used_bytes: u64,

    /// Volume label, when the medium carries one.
    pub label: Option<String>,

    /// Whether the owning drive is a real recorder.
    pub recorder: bool,
}

impl MediumInfo {
    pub fn id(&self) -> MediumId {
        MediumId {
            device: self.device.clone(),
            generation: self.generation,
        }
    }
}

/// Hot-plug event published by the medium monitor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MonitorEvent {
    DriveAdded(DriveInfo),
    DriveRemoved(DriveInfo),
    MediumInserted(MediumInfo),
    MediumRemoved(MediumInfo),
}

/// Raw notification consumed from the OS layer. Device paths are opaque
/// identity strings; the monitor never interprets them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeviceNotification {
    DriveConnected { device: String },
    DriveDisconnected { device: String },
    /// A volume surfaced without a drive-level event (blank/fresh media).
    /// `device` is the resolved owning drive, when the OS layer knows it.
    VolumeAdded { device: Option<String> },
    VolumeRemoved { device: Option<String> },
}

#[cfg(test)]
mod tests {
    use enumflags2::make_bitflags;

    use super::*;
    use crate::media::MediaAttr;

    #[test]
    fn test_drive_info_serialization() {
        let drive = DriveInfo {
            device: Some("/dev/sr0".to_string()),
            vendor: "HL-DT-ST".to_string(),
            model: "BD-RE WH16NS40".to_string(),
            can_write: true,
            can_read: true,
            fake: false,
            instance: 3,
        };

        let json = serde_json::to_string(&drive).unwrap();
        let deserialized: DriveInfo = serde_json::from_str(&json).unwrap();

        assert_eq!(drive, deserialized);
    }

    #[test]
    fn test_medium_info_serialization() {
        let medium = MediumInfo {
            device: Some("/dev/sr0".to_string()),
            generation: 7,
            status: make_bitflags!(MediaAttr::{Dvd | Sequential | Rewritable | Blank}),
            free_bytes: 4_700_000_000,
            used_bytes: 0,
            label: None,
            recorder: true,
        };

        let json = serde_json::to_string(&medium).unwrap();
        let deserialized: MediumInfo = serde_json::from_str(&json).unwrap();

        assert_eq!(medium, deserialized);
        assert_eq!(
            deserialized.id(),
            MediumId {
                device: Some("/dev/sr0".to_string()),
                generation: 7,
            }
        );
    }

    #[test]
    fn display_name_falls_back_through_vendor_and_device() {
        let mut drive = DriveInfo {
            device: Some("/dev/sr1".to_string()),
            vendor: "ACME".to_string(),
            model: "Writer 5000".to_string(),
            can_write: true,
            can_read: true,
            fake: false,
            instance: 1,
        };
        assert_eq!(drive.display_name(), "ACME Writer 5000");

        drive.model.clear();
        assert_eq!(drive.display_name(), "ACME Drive");

        drive.vendor.clear();
        assert_eq!(drive.display_name(), "sr1");

        drive.fake = true;
        assert_eq!(drive.display_name(), "Image file");
    }
}
