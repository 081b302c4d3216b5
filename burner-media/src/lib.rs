// SPDX-License-Identifier: GPL-3.0-only

//! Drive/medium state model for optical burning front-ends
//!
//! This crate owns the live hardware picture every burning dialog works
//! from:
//!
//! - [`monitor::MediumMonitor`] tracks drives and inserted media from OS
//!   hot-plug notifications, debounces spurious disconnect bursts, and
//!   publishes typed events
//! - [`selection::DriveSelection`] / [`selection::MediumSelection`] keep
//!   filtered, ordered views with a single active entry and a placeholder
//!   when nothing matches
//! - [`probe::DriveProbe`] is the only path to hardware; production wires
//!   in `burner-udisks`, tests wire in scripted fakes
//!
//! Everything that mutates the monitor is serialized onto one dispatch
//! task by [`monitor::run`]; the rest of the application only reads.

pub mod drive;
pub mod error;
pub mod monitor;
pub mod probe;
pub mod selection;

pub use drive::{Drive, Medium};
pub use error::ProbeError;
pub use monitor::{
    EventFanout, EventStream, MediumMonitor, ProbeRequest, REMOVAL_DEBOUNCE, SharedMonitor, run,
};
pub use probe::{DriveDetails, DriveProbe, MediumDetails};
pub use selection::{DriveSelection, MediumSelection, Placeholder};
