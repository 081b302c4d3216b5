// SPDX-License-Identifier: GPL-3.0-only

//! Monitor dispatch pump
//!
//! One task serializes everything that mutates the monitor: incoming OS
//! notifications, probe completions and the debounce deadline. Probes run
//! concurrently with the loop but their results only land here, so the
//! cancel-pending-removal and finalize-removal paths can never interleave.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, Stream, StreamExt};
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};
use tracing::debug;

use burner_types::DeviceNotification;

use crate::error::ProbeError;
use crate::probe::{DriveDetails, DriveProbe, MediumDetails};

use super::{MediumMonitor, ProbeRequest};

/// The monitor as shared by the pump, the selections and the queries.
pub type SharedMonitor = Arc<Mutex<MediumMonitor>>;

enum ProbeOutcome {
    Drive {
        device: String,
        result: Result<DriveDetails, ProbeError>,
    },
    Medium {
        device: String,
        result: Result<Option<MediumDetails>, ProbeError>,
    },
}

/// Drive the monitor until the notification source ends.
///
/// In-flight probes are drained before returning, so running the pump over
/// a finite source (initial enumeration) leaves the monitor fully
/// populated.
pub async fn run<S>(monitor: SharedMonitor, probe: Arc<dyn DriveProbe>, mut notifications: S)
where
    S: Stream<Item = DeviceNotification> + Unpin,
{
    let mut probes = FuturesUnordered::new();

    loop {
        let deadline = monitor.lock().await.removal_deadline();

        tokio::select! {
            maybe_note = notifications.next() => {
                let Some(note) = maybe_note else { break };
                let request = monitor.lock().await.handle_notification(note);
                if let Some(request) = request {
                    probes.push(execute(Arc::clone(&probe), request));
                }
            }
            Some(outcome) = probes.next(), if !probes.is_empty() => {
                apply(&monitor, outcome).await;
            }
            _ = wait_until(deadline), if deadline.is_some() => {
                monitor.lock().await.fire_removal_timer();
            }
        }
    }

    while let Some(outcome) = probes.next().await {
        apply(&monitor, outcome).await;
    }

    debug!("notification source ended, monitor pump stopping");
}

async fn execute(probe: Arc<dyn DriveProbe>, request: ProbeRequest) -> ProbeOutcome {
    match request {
        ProbeRequest::Drive { device } => {
            let result = probe.probe_drive(&device).await;
            ProbeOutcome::Drive { device, result }
        }
        ProbeRequest::Medium { device } => {
            let result = probe.probe_medium(&device).await;
            ProbeOutcome::Medium { device, result }
        }
    }
}

async fn apply(monitor: &SharedMonitor, outcome: ProbeOutcome) {
    let mut monitor = monitor.lock().await;
    match outcome {
        ProbeOutcome::Drive { device, result } => monitor.complete_drive_probe(&device, result),
        ProbeOutcome::Medium { device, result } => monitor.complete_medium_probe(&device, result),
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
