// SPDX-License-Identifier: GPL-3.0-only

//! Medium selection model

use burner_types::{MediaTypeFilter, MediumId, MediumInfo, MonitorEvent, medium_matches};

use crate::monitor::{EventFanout, EventStream, MediumMonitor};

use super::Placeholder;

/// Filtered, ordered view over the monitor's media for one dialog.
///
/// The displayed list is patched entry by entry, never rebuilt, so entry
/// identity (and with it the active selection) survives refreshes.
#[derive(Debug)]
pub struct MediumSelection {
    filter: MediaTypeFilter,
    entries: Vec<MediumInfo>,
    active: Option<usize>,
    placeholder: Option<Placeholder>,
    changed: EventFanout<Option<MediumInfo>>,
}

impl MediumSelection {
    pub fn new(monitor: &MediumMonitor, filter: MediaTypeFilter) -> Self {
        let mut selection = Self {
            filter,
            entries: Vec::new(),
            active: None,
            placeholder: None,
            changed: EventFanout::new(),
        };
        selection.show_media_type(monitor, filter);
        selection
    }

    /// Signal carrying the new active medium (`None` = placeholder).
    pub fn subscribe(&mut self) -> EventStream<Option<MediumInfo>> {
        self.changed.subscribe()
    }

    pub fn filter(&self) -> MediaTypeFilter {
        self.filter
    }

    pub fn entries(&self) -> &[MediumInfo] {
        &self.entries
    }

    pub fn placeholder(&self) -> Option<Placeholder> {
        self.placeholder
    }

    /// The selected medium, or `None` while the placeholder is shown.
    pub fn active(&self) -> Option<&MediumInfo> {
        self.active.and_then(|pos| self.entries.get(pos))
    }

    /// Change the filter and resynchronize against the monitor.
    ///
    /// One pass over the displayed list: entries that vanished are
    /// removed, survivors stay untouched and are struck from the candidate
    /// set, and whatever remains of the candidates is appended.
    pub fn show_media_type(&mut self, monitor: &MediumMonitor, filter: MediaTypeFilter) {
        self.filter = filter;
        let previous = self.active_id();

        let mut candidates = monitor.media(filter);
        self.entries.retain(|entry| {
            match candidates
                .iter()
                .position(|candidate| candidate.id() == entry.id())
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

    /// Select `id` if it is displayed. Returns false, without side
    /// effects, when the entry is unknown; selecting the already active
    /// entry is a no-op that still reports success.
    pub fn set_active(&mut self, id: &MediumId) -> bool {
        let Some(pos) = self.entries.iter().position(|entry| entry.id() == *id) else {
            return false;
        };

        if self.active != Some(pos) {
            self.active = Some(pos);
            self.changed.emit(self.active().cloned());
        }
        true
    }

    /// Feed one monitor event into the view.
    pub fn handle_monitor_event(&mut self, monitor: &MediumMonitor, event: &MonitorEvent) {
        match event {
            MonitorEvent::MediumInserted(info) => self.medium_inserted(monitor, info.clone()),
            MonitorEvent::MediumRemoved(info) => self.medium_removed(monitor, &info.id()),
            MonitorEvent::DriveAdded(_) | MonitorEvent::DriveRemoved(_) => {
                // Probing state may have flipped; keep the placeholder
                // label in step.
                if self.entries.is_empty() {
                    self.sync_placeholder(monitor);
                }
            }
        }
    }

    fn medium_inserted(&mut self, monitor: &MediumMonitor, info: MediumInfo) {
        if !medium_matches(&info, self.filter) {
            if self.entries.is_empty() {
                self.sync_placeholder(monitor);
            }
            return;
        }

        if self.entries.iter().any(|entry| entry.id() == info.id()) {
            return;
        }

        self.placeholder = None;
        self.entries.push(info);

        if self.active.is_none() {
            self.active = Some(self.entries.len() - 1);
            self.changed.emit(self.active().cloned());
        }
    }

    fn medium_removed(&mut self, monitor: &MediumMonitor, id: &MediumId) {
        let Some(pos) = self.entries.iter().position(|entry| entry.id() == *id) else {
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
                Placeholder::NoDiscAvailable
            })
        } else {
            None
        };
    }

    fn active_id(&self) -> Option<MediumId> {
        self.active().map(MediumInfo::id)
    }

    fn restore_active(&mut self, previous: Option<MediumId>) {
        let restored = previous
            .as_ref()
            .and_then(|id| self.entries.iter().position(|entry| entry.id() == *id));

        let next = restored.or_else(|| {
            if self.entries.is_empty() {
                None
            } else {
                Some(0)
            }
        });

        self.active = next;
        let next_id = self.active_id();
        if previous != next_id {
            self.changed.emit(self.active().cloned());
        }
    }
}
