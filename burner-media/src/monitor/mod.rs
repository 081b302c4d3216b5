// SPDX-License-Identifier: GPL-3.0-only

//! Medium monitor
//!
//! The monitor owns the authoritative drive set and turns raw OS
//! notifications into the four typed events the dialogs consume. Every
//! transition is a synchronous method; the async plumbing around probes
//! and the debounce timer lives in [`pump`].
//!
//! Per tracked device the state machine is:
//!
//! ```text
//! (probing) -> Present -> PendingRemoval -> Present      (reconnect burst)
//!                                        -> removed      (debounce expired)
//! ```
//!
//! Ejecting a disc makes some OS layers report a disconnect/reconnect pair
//! for the drive itself; the pending-removal queue plus the 2-second timer
//! absorbs that burst so the drive object keeps its identity.

pub mod events;
pub mod pump;

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use burner_types::{
    DeviceNotification, DriveInfo, DriveTypeFilter, MediaTypeFilter, MediumInfo, MonitorEvent,
    drive_matches, medium_matches,
};

use crate::drive::{Drive, DriveState, Medium};
use crate::error::ProbeError;
use crate::probe::{DriveDetails, MediumDetails};

pub use events::{EventFanout, EventStream};
pub use pump::{SharedMonitor, run};

/// How long a disconnect must stand before the drive is really removed.
pub const REMOVAL_DEBOUNCE: Duration = Duration::from_secs(2);

/// Hardware inquiry the caller must run and feed back in. Probes are
/// asynchronous relative to the notification that triggered them; the
/// monitor records who is in flight and ignores stale completions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeRequest {
    Drive { device: String },
    Medium { device: String },
}

/// Process-wide drive/medium monitor. One per application, shared behind
/// [`SharedMonitor`] and mutated only from the pump task.
#[derive(Debug)]
pub struct MediumMonitor {
    drives: Vec<Drive>,
    /// Device paths whose drive probe has not answered yet.
    probing: Vec<String>,
    /// Drive instances awaiting removal confirmation, strictly FIFO.
    pending_removals: VecDeque<u64>,
    removal_deadline: Option<Instant>,
    events: EventFanout<MonitorEvent>,
    next_instance: u64,
    next_generation: u64,
}

impl MediumMonitor {
    pub fn new() -> Self {
        Self {
            drives: vec![Drive::file_drive()],
            probing: Vec::new(),
            pending_removals: VecDeque::new(),
            removal_deadline: None,
            events: EventFanout::new(),
            next_instance: 1,
            next_generation: 1,
        }
    }

    /// Subscribe to drive/medium hot-plug events.
    pub fn subscribe(&mut self) -> EventStream<MonitorEvent> {
        self.events.subscribe()
    }

    /// Apply one OS notification. The returned probe request, if any, must
    /// be executed and its outcome handed back through
    /// [`complete_drive_probe`](Self::complete_drive_probe) or
    /// [`complete_medium_probe`](Self::complete_medium_probe).
    pub fn handle_notification(&mut self, note: DeviceNotification) -> Option<ProbeRequest> {
        match note {
            DeviceNotification::DriveConnected { device } => self.drive_connected(device),
            DeviceNotification::DriveDisconnected { device } => {
                self.drive_disconnected(&device);
                None
            }
            DeviceNotification::VolumeAdded { device } => self.volume_added(device),
            DeviceNotification::VolumeRemoved { device } => {
                self.volume_removed(device.as_deref());
                None
            }
        }
    }

    fn drive_connected(&mut self, device: String) -> Option<ProbeRequest> {
        if let Some(drive) = self.drive_mut(Some(&device)) {
            if drive.state == DriveState::PendingRemoval {
                // Spurious disconnect/reconnect burst: keep the drive, keep
                // its identity. The queued entry is skipped when its turn
                // comes.
                drive.state = DriveState::Present;
                debug!("{} reconnected inside the removal window", device);
            } else {
                debug!("{} already tracked, ignoring connect", device);
            }
            return None;
        }

        if self.probing.iter().any(|pending| *pending == device) {
            return None;
        }

        self.probing.push(device.clone());
        Some(ProbeRequest::Drive { device })
    }

    fn drive_disconnected(&mut self, device: &str) {
        if let Some(pos) = self.probing.iter().position(|pending| pending == device) {
            // Probe still in flight; forget the candidate and let the
            // completion fall on the floor.
            self.probing.remove(pos);
            return;
        }

        let Some(drive) = self.drive_mut(Some(device)) else {
            debug!("{} is not tracked, ignoring disconnect", device);
            return;
        };

        if drive.state == DriveState::PendingRemoval {
            return;
        }

        drive.state = DriveState::PendingRemoval;
        let instance = drive.instance();
        self.pending_removals.push_back(instance);

        if self.removal_deadline.is_none() {
            self.removal_deadline = Some(Instant::now() + REMOVAL_DEBOUNCE);
        }
    }

    fn volume_added(&mut self, device: Option<String>) -> Option<ProbeRequest> {
        // A volume with no resolvable drive never creates a phantom drive.
        let device = device?;

        let drive = self.drive(Some(&device))?;
        if drive.is_fake() || drive.state != DriveState::Present {
            return None;
        }

        Some(ProbeRequest::Medium { device })
    }

    fn volume_removed(&mut self, device: Option<&str>) {
        let Some(device) = device else { return };

        let removed = match self.drive_mut(Some(device)) {
            Some(drive) if !drive.is_fake() => {
                let info = drive.medium_snapshot();
                drive.set_medium(None);
                info
            }
            _ => None,
        };

        if let Some(info) = removed {
            self.events.emit(MonitorEvent::MediumRemoved(info));
        }
    }

    /// Land a drive probe. On success the drive joins the visible set and
    /// `DriveAdded` (plus `MediumInserted` when a disc was already in) is
    /// published; on failure the candidate is dropped silently.
    pub fn complete_drive_probe(
        &mut self,
        device: &str,
        result: Result<DriveDetails, ProbeError>,
    ) {
        let Some(pos) = self.probing.iter().position(|pending| pending == device) else {
            debug!("{} probe finished after the device left, discarding", device);
            return;
        };
        self.probing.remove(pos);

        let details = match result {
            Ok(details) => details,
            Err(error) => {
                debug!("{} is not a usable optical drive: {}", device, error);
                return;
            }
        };

        let instance = self.next_instance;
        self.next_instance += 1;

        let mut drive = Drive::from_details(device.to_string(), instance, &details);
        if let Some(medium_details) = details.medium {
            let generation = self.next_generation;
            self.next_generation += 1;
            drive.set_medium(Some(Medium::new(generation, medium_details)));
        }

        let drive_info = drive.snapshot();
        let medium_info = drive.medium_snapshot();
        self.drives.push(drive);

        self.events.emit(MonitorEvent::DriveAdded(drive_info));
        if let Some(info) = medium_info {
            self.events.emit(MonitorEvent::MediumInserted(info));
        }
    }

    /// Land a medium probe on an already tracked drive.
    pub fn complete_medium_probe(
        &mut self,
        device: &str,
        result: Result<Option<MediumDetails>, ProbeError>,
    ) {
        let details = match result {
            Ok(details) => details,
            Err(error) => {
                debug!("medium probe on {} failed: {}", device, error);
                return;
            }
        };

        let Some(pos) = self
            .drives
            .iter()
            .position(|drive| drive.device() == Some(device))
        else {
            return;
        };
        if self.drives[pos].is_fake() {
            return;
        }

        match details {
            Some(details) => {
                // Compare before replacing: a duplicate notification for
                // the same disc must not churn generations.
                if self.drives[pos]
                    .medium()
                    .is_some_and(|medium| medium.matches_details(&details))
                {
                    return;
                }

                let generation = self.next_generation;
                self.next_generation += 1;

                let drive = &mut self.drives[pos];
                let removed = drive.medium_snapshot();
                drive.set_medium(Some(Medium::new(generation, details)));
                let inserted = drive.medium_snapshot();

                if let Some(info) = removed {
                    self.events.emit(MonitorEvent::MediumRemoved(info));
                }
                if let Some(info) = inserted {
                    self.events.emit(MonitorEvent::MediumInserted(info));
                }
            }
            None => {
                let drive = &mut self.drives[pos];
                let removed = drive.medium_snapshot();
                drive.set_medium(None);
                if let Some(info) = removed {
                    self.events.emit(MonitorEvent::MediumRemoved(info));
                }
            }
        }
    }

    /// When the armed debounce window expires. Pops exactly one queue
    /// entry; a cancelled entry burns its slot without side effects.
    pub fn fire_removal_timer(&mut self) {
        let Some(instance) = self.pending_removals.pop_front() else {
            self.removal_deadline = None;
            return;
        };

        let confirmed = self.drives.iter().position(|drive| {
            drive.instance() == instance && drive.state == DriveState::PendingRemoval
        });

        if let Some(pos) = confirmed {
            let mut drive = self.drives.remove(pos);
            let medium_info = drive.medium_snapshot();
            drive.set_medium(None);
            let drive_info = drive.snapshot();

            if let Some(info) = medium_info {
                self.events.emit(MonitorEvent::MediumRemoved(info));
            }
            self.events.emit(MonitorEvent::DriveRemoved(drive_info));
        } else {
            debug!("pending removal was cancelled, drive kept");
        }

        self.removal_deadline = if self.pending_removals.is_empty() {
            None
        } else {
            Some(Instant::now() + REMOVAL_DEBOUNCE)
        };
    }

    /// Deadline of the armed debounce timer, if any.
    pub fn removal_deadline(&self) -> Option<Instant> {
        self.removal_deadline
    }

    /// Live capability-filtered drive query; always reflects the current set.
    pub fn drives(&self, filter: DriveTypeFilter) -> Vec<DriveInfo> {
        self.drives
            .iter()
            .map(Drive::snapshot)
            .filter(|drive| drive_matches(drive, filter))
            .collect()
    }

    /// Live category-filtered medium query over every drive's current disc.
    pub fn media(&self, filter: MediaTypeFilter) -> Vec<MediumInfo> {
        self.drives
            .iter()
            .filter_map(Drive::medium_snapshot)
            .filter(|medium| medium_matches(medium, filter))
            .collect()
    }

    /// Whether any real candidate drive is still being probed. Selections
    /// use this to label their placeholder.
    pub fn is_probing(&self) -> bool {
        !self.probing.is_empty()
    }

    /// Direct access to one tracked drive.
    pub fn drive(&self, device: Option<&str>) -> Option<&Drive> {
        self.drives.iter().find(|drive| drive.device() == device)
    }

    fn drive_mut(&mut self, device: Option<&str>) -> Option<&mut Drive> {
        self.drives
            .iter_mut()
            .find(|drive| drive.device() == device)
    }
}

impl Default for MediumMonitor {
    fn default() -> Self {
        Self::new()
    }
}
