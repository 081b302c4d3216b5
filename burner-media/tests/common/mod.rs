// SPDX-License-Identifier: GPL-3.0-only

//! Scripted probe backend shared by the integration suites.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use enumflags2::make_bitflags;

use burner_media::{DriveDetails, DriveProbe, MediumDetails, ProbeError};
use burner_types::MediaAttr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Drive(String),
    Medium(String),
}

/// Probe double: answers are scripted per device, calls are recorded.
/// Unscripted devices fail the optical check, like real non-optical
/// hardware would.
#[derive(Clone, Default)]
pub struct FakeProbe {
    calls: Arc<Mutex<Vec<Call>>>,
    drive_results: Arc<Mutex<HashMap<String, Result<DriveDetails, ProbeError>>>>,
    medium_results: Arc<Mutex<HashMap<String, Result<Option<MediumDetails>, ProbeError>>>>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_drive_result(&self, device: &str, result: Result<DriveDetails, ProbeError>) {
        self.drive_results
            .lock()
            .unwrap()
            .insert(device.to_string(), result);
    }

    pub fn set_medium_result(
        &self,
        device: &str,
        result: Result<Option<MediumDetails>, ProbeError>,
    ) {
        self.medium_results
            .lock()
            .unwrap()
            .insert(device.to_string(), result);
    }

    #[allow(dead_code)]
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }
}

#[async_trait]
impl DriveProbe for FakeProbe {
    async fn probe_drive(&self, device: &str) -> Result<DriveDetails, ProbeError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Drive(device.to_string()));
        self.drive_results
            .lock()
            .unwrap()
            .get(device)
            .cloned()
            .unwrap_or_else(|| Err(ProbeError::NotOptical(device.to_string())))
    }

    async fn probe_medium(&self, device: &str) -> Result<Option<MediumDetails>, ProbeError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Medium(device.to_string()));
        self.medium_results
            .lock()
            .unwrap()
            .get(device)
            .cloned()
            .unwrap_or(Ok(None))
    }
}

#[allow(dead_code)]
pub fn writer_details(medium: Option<MediumDetails>) -> DriveDetails {
    DriveDetails {
        vendor: "ACME".to_string(),
        model: "BW-16".to_string(),
        can_write: true,
        can_read: true,
        medium,
    }
}

#[allow(dead_code)]
pub fn blank_dvd_rw() -> MediumDetails {
    MediumDetails {
        status: make_bitflags!(MediaAttr::{Dvd | Sequential | Rewritable | Blank}),
        free_bytes: 4_700_000_000,
        used_bytes: 0,
        label: None,
    }
}
