// SPDX-License-Identifier: GPL-3.0-only

//! Full scenario: a writer appears, a blank DVD-RW goes in, the drive is
//! yanked, and the selection ends up back on its placeholder.

mod common;

use std::sync::Arc;
use std::time::Duration;

use enumflags2::make_bitflags;
use tokio::sync::Mutex;

use burner_media::{
    DriveProbe, EventFanout, MediumMonitor, MediumSelection, Placeholder, SharedMonitor, run,
};
use burner_types::{DeviceNotification, DriveType, MediaAttr, MediaType, MonitorEvent};

use common::FakeProbe;

const SR0: &str = "/dev/sr0";

#[tokio::test(start_paused = true)]
async fn writer_medium_and_removal_round_trip() {
    let monitor: SharedMonitor = Arc::new(Mutex::new(MediumMonitor::new()));
    let mut source = EventFanout::new();
    let notifications = source.subscribe();
    let probe = FakeProbe::new();
    let probe_arc: Arc<dyn DriveProbe> = Arc::new(probe.clone());
    let pump = tokio::spawn(run(Arc::clone(&monitor), probe_arc, notifications));

    let (mut events, mut selection) = {
        let mut monitor = monitor.lock().await;
        let events = monitor.subscribe();
        let selection = MediumSelection::new(&monitor, MediaType::Writable.into());
        (events, selection)
    };
    assert_eq!(selection.placeholder(), Some(Placeholder::NoDiscAvailable));

    // Connect the writer; the probe answers with an empty tray.
    probe.set_drive_result(SR0, Ok(common::writer_details(None)));
    source.emit(DeviceNotification::DriveConnected {
        device: SR0.to_string(),
    });
    tokio::time::sleep(Duration::from_millis(10)).await;

    {
        let monitor = monitor.lock().await;
        let published = events.drain();
        assert!(
            matches!(&published[..], [MonitorEvent::DriveAdded(d)] if d.device.as_deref() == Some(SR0))
        );
        for event in &published {
            selection.handle_monitor_event(&monitor, event);
        }

        assert_eq!(
            monitor
                .drives(make_bitflags!(DriveType::{Writer | Reader}))
                .len(),
            1
        );
        // Still no disc, still the placeholder.
        assert_eq!(selection.placeholder(), Some(Placeholder::NoDiscAvailable));
    }

    // Insert a blank DVD-RW.
    probe.set_medium_result(SR0, Ok(Some(common::blank_dvd_rw())));
    source.emit(DeviceNotification::VolumeAdded {
        device: Some(SR0.to_string()),
    });
    tokio::time::sleep(Duration::from_millis(10)).await;

    {
        let monitor = monitor.lock().await;
        let published = events.drain();
        assert!(matches!(&published[..], [MonitorEvent::MediumInserted(_)]));
        for event in &published {
            selection.handle_monitor_event(&monitor, event);
        }

        assert_eq!(selection.entries().len(), 1);
        let active = selection.active().expect("blank disc should be selected");
        assert_eq!(active.device.as_deref(), Some(SR0));
        assert_eq!(
            active.status,
            make_bitflags!(MediaAttr::{Dvd | Sequential | Rewritable | Blank})
        );
    }

    // Yank the drive and let the debounce window run out.
    source.emit(DeviceNotification::DriveDisconnected {
        device: SR0.to_string(),
    });
    tokio::time::sleep(Duration::from_secs(3)).await;

    {
        let monitor = monitor.lock().await;
        let published = events.drain();
        assert_eq!(published.len(), 2);
        assert!(matches!(published[0], MonitorEvent::MediumRemoved(_)));
        assert!(matches!(published[1], MonitorEvent::DriveRemoved(_)));
        for event in &published {
            selection.handle_monitor_event(&monitor, event);
        }

        assert!(selection.entries().is_empty());
        assert_eq!(selection.placeholder(), Some(Placeholder::NoDiscAvailable));
        assert!(selection.active().is_none());
        assert!(
            monitor
                .drives(make_bitflags!(DriveType::{Writer | Reader}))
                .is_empty()
        );
    }

    pump.abort();
}
