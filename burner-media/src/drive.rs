// SPDX-License-Identifier: GPL-3.0-only

//! Stateful drive and medium objects
//!
//! A [`Drive`] is owned by the monitor and owns at most one [`Medium`].
//! Replacing a medium always goes through [`Drive::set_medium`], which
//! hands the previous owner back so the caller can publish its removal
//! before anything else happens.

use burner_types::{DriveInfo, MediaAttr, MediumInfo};

use crate::probe::{DriveDetails, MediumDetails};

/// Where a tracked drive sits in the hot-plug state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DriveState {
    Present,
    /// Disconnect seen; waiting for the debounce window to confirm it.
    PendingRemoval,
}

/// One disc, owned by the drive it sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Medium {
    generation: u64,
    details: MediumDetails,
}

impl Medium {
    pub(crate) fn new(generation: u64, details: MediumDetails) -> Self {
        Self {
            generation,
            details,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> burner_types::MediaSet {
        self.details.status
    }

    pub fn label(&self) -> Option<&str> {
        self.details.label.as_deref()
    }

    /// Whether a fresh probe reported the same physical disc. Used to skip
    /// the replace-and-republish cycle on duplicate volume notifications.
    pub(crate) fn matches_details(&self, details: &MediumDetails) -> bool {
        self.details == *details
    }
}

/// One physical or virtual optical drive.
#[derive(Debug)]
pub struct Drive {
    device: Option<String>,
    vendor: String,
    model: String,
    can_write: bool,
    can_read: bool,
    fake: bool,
    instance: u64,
    pub(crate) state: DriveState,
    medium: Option<Medium>,
}

impl Drive {
    /// The synthetic image-file drive. Created once per monitor, never
    /// removed, and always holding the FILE pseudo medium.
    pub(crate) fn file_drive() -> Self {
        Self {
            device: None,
            vendor: String::new(),
            model: String::new(),
            can_write: true,
            can_read: true,
            fake: true,
            instance: 0,
            state: DriveState::Present,
            medium: Some(Medium::new(
                0,
                MediumDetails {
                    status: MediaAttr::File.into(),
                    free_bytes: 0,
                    used_bytes: 0,
                    label: None,
                },
            )),
        }
    }

    pub(crate) fn from_details(device: String, instance: u64, details: &DriveDetails) -> Self {
        Self {
            device: Some(device),
            vendor: details.vendor.clone(),
            model: details.model.clone(),
            can_write: details.can_write,
            can_read: details.can_read,
            fake: false,
            instance,
            state: DriveState::Present,
            medium: None,
        }
    }

    /// Stable identity; `None` only for the image-file drive.
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    pub fn can_write(&self) -> bool {
        self.can_write
    }

    pub fn can_read(&self) -> bool {
        self.can_read
    }

    pub fn is_fake(&self) -> bool {
        self.fake
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn medium(&self) -> Option<&Medium> {
        self.medium.as_ref()
    }

    /// Replace the owned medium, handing the previous one back. The caller
    /// publishes the old medium's removal before touching anything else.
    pub(crate) fn set_medium(&mut self, medium: Option<Medium>) -> Option<Medium> {
        std::mem::replace(&mut self.medium, medium)
    }

    pub fn snapshot(&self) -> DriveInfo {
        DriveInfo {
            device: self.device.clone(),
            vendor: self.vendor.clone(),
            model: self.model.clone(),
            can_write: self.can_write,
            can_read: self.can_read,
            fake: self.fake,
            instance: self.instance,
        }
    }

    pub fn medium_snapshot(&self) -> Option<MediumInfo> {
        self.medium.as_ref().map(|medium| MediumInfo {
            device: self.device.clone(),
            generation: medium.generation,
            status: medium.details.status,
            free_bytes: medium.details.free_bytes,
            used_bytes: medium.details.used_bytes,
            label: medium.details.label.clone(),
            recorder: !self.fake && self.can_write,
        })
    }
}
