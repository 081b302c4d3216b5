// SPDX-License-Identifier: GPL-3.0-only

//! Drive selection model
//!
//! Same shape as [`super::MediumSelection`], one level up: entries are
//! drives, identity is the device path, and only drive-level events patch
//! the list.

use burner_types::{DriveInfo, DriveTypeFilter, MonitorEvent, drive_matches};

use crate::monitor::{EventFanout, EventStream, MediumMonitor};

use super::Placeholder;

#[derive(Debug)]
pub struct DriveSelection {
    filter: DriveTypeFilter,
    entries: Vec<DriveInfo>,
    active: Option<usize>,
    placeholder: Option<Placeholder>,
    changed: EventFanout<Option<DriveInfo>>,
}

impl DriveSelection {
    pub fn new(monitor: &MediumMonitor, filter: DriveTypeFilter) -> Self {
        let mut selection = Self {
            filter,
            entries: Vec::new(),
            active: None,
            placeholder: None,
            changed: EventFanout::new(),
        };
        selection.show_drive_type(monitor, filter);
        selection
    }

    /// Signal carrying the new active drive (`None` = placeholder).
    pub fn subscribe(&mut self) -> EventStream<Option<DriveInfo>> {
        self.changed.subscribe()
    }

    pub fn filter(&self) -> DriveTypeFilter {
        self.filter
    }

    pub fn entries(&self) -> &[DriveInfo] {
        &self.entries
    }

    pub fn placeholder(&self) -> Option<Placeholder> {
        self.placeholder
    }

    pub fn active(&self) -> Option<&DriveInfo> {
        self.active.and_then(|pos| self.entries.get(pos))
    }

    /// Change the filter and resynchronize with the same diff-and-patch
    /// pass as the medium selection.
    pub fn show_drive_type(&mut self, monitor: &MediumMonitor, filter: DriveTypeFilter) {
        self.filter = filter;
        let previous = self.active_device();

        let mut candidates = monitor.drives(filter);
        self.entries.retain(|entry| {
            match candidates
                .iter()
                .position(|candidate| candidate.device == entry.device)
            {
                Some(pos) => {
                    candidates.remove(pos);
                    true
                }
                None => false,
            }
        });
        self.entries.append(&mut candidates);

        self.sync_placeholder(monitor);
        self.restore_active(previous);
    }

    /// Select the drive at `device` if displayed; unknown paths are a
    /// no-op returning false.
    pub fn set_active(&mut self, device: Option<&str>) -> bool {
        let Some(pos) = self
            .entries
            .iter()
            .position(|entry| entry.device.as_deref() == device)
        else {
            return false;
        };

        if self.active != Some(pos) {
            self.active = Some(pos);
            self.changed.emit(self.active().cloned());
        }
        true
    }

    pub fn handle_monitor_event(&mut self, monitor: &MediumMonitor, event: &MonitorEvent) {
        match event {
            MonitorEvent::DriveAdded(info) => self.drive_added(monitor, info.clone()),
            MonitorEvent::DriveRemoved(info) => self.drive_removed(monitor, info),
            MonitorEvent::MediumInserted(_) | MonitorEvent::MediumRemoved(_) => {
                if self.entries.is_empty() {
                    self.sync_placeholder(monitor);
                }
            }
        }
    }

    fn drive_added(&mut self, monitor: &MediumMonitor, info: DriveInfo) {
        if !drive_matches(&info, self.filter) {
            if self.entries.is_empty() {
                self.sync_placeholder(monitor);
            }
            return;
        }

        if self.entries.iter().any(|entry| entry.device == info.device) {
            return;
        }

        self.placeholder = None;
        self.entries.push(info);

        if self.active.is_none() {
            self.active = Some(self.entries.len() - 1);
            self.changed.emit(self.active().cloned());
        }
    }

    fn drive_removed(&mut self, monitor: &MediumMonitor, info: &DriveInfo) {
        let Some(pos) = self
            .entries
            .iter()
            .position(|entry| entry.device == info.device)
        else {
            return;
        };

        let was_active = self.active == Some(pos);
        self.entries.remove(pos);

        if let Some(active) = self.active {
            if active > pos {
                self.active = Some(active - 1);
            } else if was_active {
                self.active = None;
            }
        }

        self.sync_placeholder(monitor);

        if was_active {
            self.active = if self.entries.is_empty() { None } else { Some(0) };
            self.changed.emit(self.active().cloned());
        }
    }

    fn sync_placeholder(&mut self, monitor: &MediumMonitor) {
        self.placeholder = if self.entries.is_empty() {
            Some(if monitor.is_probing() {
                Placeholder::Searching
            } else {
                Placeholder::NoDriveAvailable
            })
        } else {
            None
        };
    }

    fn active_device(&self) -> Option<Option<String>> {
        self.active().map(|entry| entry.device.clone())
    }

    fn restore_active(&mut self, previous: Option<Option<String>>) {
        let restored = previous
            .as_ref()
            .and_then(|device| self.entries.iter().position(|entry| entry.device == *device));

        self.active = restored.or_else(|| {
            if self.entries.is_empty() {
                None
            } else {
                Some(0)
            }
        });

        if previous != self.active_device() {
            self.changed.emit(self.active().cloned());
        }
    }
}

#[cfg(test)]
mod tests {
    use enumflags2::make_bitflags;

    use burner_types::{DeviceNotification, DriveType};

    use crate::probe::DriveDetails;

    use super::*;

    const SR0: &str = "/dev/sr0";
    const SR1: &str = "/dev/sr1";

    fn writer_details() -> DriveDetails {
        DriveDetails {
            vendor: "ACME".to_string(),
            model: "BW-16".to_string(),
            can_write: true,
            can_read: true,
            medium: None,
        }
    }

    fn connect(monitor: &mut MediumMonitor, device: &str) -> MonitorEvent {
        let mut events = monitor.subscribe();
        monitor.handle_notification(DeviceNotification::DriveConnected {
            device: device.to_string(),
        });
        monitor.complete_drive_probe(device, Ok(writer_details()));
        events.drain().remove(0)
    }

    #[test]
    fn file_filter_always_shows_the_image_drive() {
        let monitor = MediumMonitor::new();
        let selection = DriveSelection::new(&monitor, DriveType::File.into());

        assert_eq!(selection.entries().len(), 1);
        assert!(selection.entries()[0].fake);
        assert!(selection.active().is_some());
        assert!(selection.placeholder().is_none());
    }

    #[test]
    fn writer_filter_starts_on_the_placeholder() {
        let monitor = MediumMonitor::new();
        let selection = DriveSelection::new(&monitor, DriveType::Writer.into());

        assert!(selection.entries().is_empty());
        assert_eq!(selection.placeholder(), Some(Placeholder::NoDriveAvailable));
    }

    #[test]
    fn added_writer_replaces_the_placeholder_and_is_selected() {
        let mut monitor = MediumMonitor::new();
        let mut selection = DriveSelection::new(&monitor, DriveType::Writer.into());
        let mut changed = selection.subscribe();

        let event = connect(&mut monitor, SR0);
        selection.handle_monitor_event(&monitor, &event);

        assert_eq!(selection.entries().len(), 1);
        assert!(selection.placeholder().is_none());
        assert_eq!(selection.active().unwrap().device.as_deref(), Some(SR0));
        assert_eq!(changed.drain().len(), 1);
    }

    #[test]
    fn removal_moves_the_selection_to_the_next_entry() {
        let mut monitor = MediumMonitor::new();
        let mut selection = DriveSelection::new(&monitor, DriveType::Writer.into());

        let added0 = connect(&mut monitor, SR0);
        let added1 = connect(&mut monitor, SR1);
        selection.handle_monitor_event(&monitor, &added0);
        selection.handle_monitor_event(&monitor, &added1);
        assert_eq!(selection.active().unwrap().device.as_deref(), Some(SR0));

        let mut events = monitor.subscribe();
        monitor.handle_notification(DeviceNotification::DriveDisconnected {
            device: SR0.to_string(),
        });
        monitor.fire_removal_timer();
        let removed = events.drain().remove(0);

        selection.handle_monitor_event(&monitor, &removed);
        assert_eq!(selection.active().unwrap().device.as_deref(), Some(SR1));
        assert_eq!(selection.entries().len(), 1);
    }

    #[test]
    fn switching_filters_keeps_the_active_drive_when_it_still_matches() {
        let mut monitor = MediumMonitor::new();
        let mut selection = DriveSelection::new(
            &monitor,
            make_bitflags!(DriveType::{Writer | Reader}),
        );

        let added = connect(&mut monitor, SR0);
        selection.handle_monitor_event(&monitor, &added);
        assert!(selection.set_active(Some(SR0)));

        let mut changed = selection.subscribe();
        selection.show_drive_type(&monitor, DriveType::Writer.into());

        assert_eq!(selection.active().unwrap().device.as_deref(), Some(SR0));
        assert!(changed.drain().is_empty());
    }

    #[test]
    fn stale_set_active_reports_failure_without_side_effects() {
        let monitor = MediumMonitor::new();
        let mut selection = DriveSelection::new(&monitor, DriveType::Writer.into());
        let mut changed = selection.subscribe();

        assert!(!selection.set_active(Some(SR0)));
        assert!(changed.drain().is_empty());
        assert!(selection.active().is_none());
    }
}
