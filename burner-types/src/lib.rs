// SPDX-License-Identifier: GPL-3.0-only

//! Canonical domain models for the burner media subsystem
//!
//! This crate defines the single source of truth for the media/drive domain
//! types. These models are used throughout the stack:
//!
//! - **burner-media**: owns the stateful monitor and selections, and hands
//!   out these types from its query and event surfaces
//! - **burner-udisks**: maps UDisks2 notifications and properties onto them
//! - **burner-cli**: consumes them and serializes them for `--json` output
//!
//! ## Architecture
//!
//! Two kinds of types live here:
//!
//! ### Flags and filters (bitmask algebra)
//! - `MediaAttr`/`MediaSet` → attributes of a concrete medium
//! - `DriveType`/`MediaType` → per-query capability filters
//! - `profiles::legal_profiles` → expansion of a request mask into every
//!   internally consistent media status
//!
//! ### Snapshots (serde models)
//! - `DriveInfo` / `MediumInfo` → point-in-time views handed to clients
//! - `MonitorEvent` / `DeviceNotification` → typed event surfaces
//!
//! Keeping both here eliminates circular conversions and ensures the
//! monitor and the selection widgets apply identical rules.

pub mod common;
pub mod drive;
pub mod filter;
pub mod media;
pub mod profiles;

pub use common::{bytes_to_pretty, pretty_to_bytes};
pub use drive::{DeviceNotification, DriveInfo, MediumId, MediumInfo, MonitorEvent};
pub use filter::{
    DriveType, DriveTypeFilter, MediaType, MediaTypeFilter, drive_matches, medium_matches,
};
pub use media::{
    BD_RE, CD_ROM, DVD_PLUS_RW, DVD_RAM, DVD_RW_RESTRICTED, MediaAttr, MediaSet, attr_name,
    can_be_rewritten, can_be_written, has_audio, has_data, is_true_random_writable,
    media_set_from_str, media_set_to_string,
};
pub use profiles::legal_profiles;
