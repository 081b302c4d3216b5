// SPDX-License-Identifier: GPL-3.0-only

//! UDisks2 adapter for the burner media subsystem
//!
//! Two pieces, matching the two collaborator seams of `burner-media`:
//!
//! - [`UdisksSource`] turns ObjectManager signals into
//!   [`burner_types::DeviceNotification`]s
//! - [`UdisksProbe`] answers the monitor's drive/medium inquiries through
//!   the UDisks2 Drive interface
//!
//! Both speak in UDisks2 drive object paths; the core treats those as
//! opaque identity strings.

mod map;
mod proxies;

pub mod probe;
pub mod source;

pub use map::{compatibility_can_write, medium_status, profile_attrs};
pub use probe::UdisksProbe;
pub use proxies::{UDisks2DriveProxy, UDisks2ObjectManagerProxy};
pub use source::UdisksSource;
