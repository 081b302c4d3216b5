// SPDX-License-Identifier: GPL-3.0-only

//! Hardware probe collaborator
//!
//! The monitor never touches hardware itself. Everything it learns about a
//! device comes through this trait: once per drive when a new device path
//! shows up, and once per volume event for the inserted medium. Production
//! wires in the UDisks2 implementation from `burner-udisks`; tests wire in
//! a scripted fake.

use async_trait::async_trait;

use burner_types::MediaSet;

use crate::error::ProbeError;

/// Result of a successful drive inquiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveDetails {
    pub vendor: String,
    pub model: String,
    pub can_write: bool,
    pub can_read: bool,
    /// Medium already sitting in the drive at probe time, if any.
    pub medium: Option<MediumDetails>,
}

/// Result of a successful medium inquiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediumDetails {
    pub status: MediaSet,
    pub free_bytes: u64,
    pub used_bytes: u64,
    pub label: Option<String>,
}

/// Asynchronous hardware inquiry backend.
///
/// Completions re-enter the monitor through its single dispatch task; an
/// implementation only has to answer, not to worry about ordering.
#[async_trait]
pub trait DriveProbe: Send + Sync {
    /// Verify that `device` is an optical drive and read its capabilities.
    /// An error means the device is not usable and will be ignored.
    async fn probe_drive(&self, device: &str) -> Result<DriveDetails, ProbeError>;

    /// Read the medium currently inserted in `device`. `Ok(None)` means the
    /// drive answered and is empty.
    async fn probe_medium(&self, device: &str) -> Result<Option<MediumDetails>, ProbeError>;
}
