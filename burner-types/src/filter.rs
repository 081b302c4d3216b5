// SPDX-License-Identifier: GPL-3.0-only

//! Query filter masks
//!
//! These masks are never stored; callers build one per query. The matching
//! predicates live here so the monitor and the selection widgets apply the
//! exact same test to a candidate entry.

use enumflags2::{BitFlags, bitflags};
use serde::{Deserialize, Serialize};

use crate::drive::{DriveInfo, MediumInfo};
use crate::media::{self, MediaAttr};

/// Requested drive capability for [`crate::drive::DriveInfo`] queries.
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveType {
    /// The synthetic image-file drive.
    File,
    /// Drives that can record media.
    Writer,
    /// Any real drive that can read media.
    Reader,
}

pub type DriveTypeFilter = BitFlags<DriveType>;

/// Requested medium category for media queries.
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    /// The image-file pseudo medium.
    File,
    /// Media carrying a data track.
    Data,
    /// Media carrying audio tracks.
    Audio,
    /// Media that can receive a new recording.
    Writable,
    /// Media that can be erased and rewritten.
    Rewritable,
    /// Any medium sitting in a recorder, whatever its state.
    AnyInRecorder,
    /// Refinement: restrict every other category to CD media.
    CdOnly,
}

pub type MediaTypeFilter = BitFlags<MediaType>;

/// Whether a drive satisfies a capability filter. The file drive is only
/// ever matched through the `File` bit; `Writer`/`Reader` select real
/// hardware.
pub fn drive_matches(drive: &DriveInfo, filter: DriveTypeFilter) -> bool {
    if drive.fake {
        return filter.contains(DriveType::File);
    }

    (filter.contains(DriveType::Writer) && drive.can_write)
        || (filter.contains(DriveType::Reader) && drive.can_read)
}

/// Whether a medium satisfies a category filter.
///
/// The test is disjunctive over the category bits, with `CdOnly` applied as
/// a refinement afterwards: it narrows whatever the other bits matched to
/// CD media instead of selecting on its own.
pub fn medium_matches(medium: &MediumInfo, filter: MediaTypeFilter) -> bool {
    let status = medium.status;
    let mut matched = false;

    if filter.contains(MediaType::File) && status.contains(MediaAttr::File) {
        matched = true;
    }
    if filter.contains(MediaType::Audio) && media::has_audio(status) {
        matched = true;
    }
    if filter.contains(MediaType::Data) && media::has_data(status) {
        matched = true;
    }
    if filter.contains(MediaType::Writable) && media::can_be_written(status) {
        matched = true;
    }
    if filter.contains(MediaType::Rewritable) && media::can_be_rewritten(status) {
        matched = true;
    }
    if filter.contains(MediaType::AnyInRecorder) && medium.recorder {
        matched = true;
    }

    if matched && filter.contains(MediaType::CdOnly) && !status.contains(MediaAttr::Cd) {
        matched = false;
    }

    matched
}

#[cfg(test)]
mod tests {
    use enumflags2::make_bitflags;

    use super::*;
    use crate::drive::{DriveInfo, MediumInfo};
    use crate::media::MediaSet;

    fn real_drive(can_write: bool) -> DriveInfo {
        DriveInfo {
            device: Some("/dev/sr0".to_string()),
            vendor: "ACME".to_string(),
            model: "BD-9000".to_string(),
            can_write,
            can_read: true,
            fake: false,
            instance: 1,
        }
    }

    fn medium(status: MediaSet, recorder: bool) -> MediumInfo {
        MediumInfo {
            device: Some("/dev/sr0".to_string()),
            generation: 1,
            status,
            free_bytes: 0,
            used_bytes: 0,
            label: None,
            recorder,
        }
    }

    #[test]
    fn file_drive_only_matches_file_bit() {
        let file_drive = DriveInfo {
            device: None,
            vendor: String::new(),
            model: String::new(),
            can_write: true,
            can_read: true,
            fake: true,
            instance: 0,
        };

        assert!(drive_matches(&file_drive, DriveType::File.into()));
        assert!(!drive_matches(
            &file_drive,
            make_bitflags!(DriveType::{Writer | Reader})
        ));
        assert!(drive_matches(&real_drive(true), DriveType::Writer.into()));
        assert!(!drive_matches(&real_drive(false), DriveType::Writer.into()));
        assert!(drive_matches(&real_drive(false), DriveType::Reader.into()));
    }

    #[test]
    fn cd_only_refines_other_bits() {
        let blank_cd = medium(
            make_bitflags!(MediaAttr::{Cd | Writable | Blank}),
            true,
        );
        let blank_dvd = medium(
            make_bitflags!(MediaAttr::{Dvd | Plus | Rewritable | Blank}),
            true,
        );

        let writable = MediaTypeFilter::from(MediaType::Writable);
        assert!(medium_matches(&blank_cd, writable));
        assert!(medium_matches(&blank_dvd, writable));

        let writable_cd = make_bitflags!(MediaType::{Writable | CdOnly});
        assert!(medium_matches(&blank_cd, writable_cd));
        assert!(!medium_matches(&blank_dvd, writable_cd));

        // CdOnly on its own selects nothing.
        assert!(!medium_matches(&blank_cd, MediaType::CdOnly.into()));
    }

    #[test]
    fn any_in_recorder_requires_a_recorder() {
        let closed = medium(
            make_bitflags!(MediaAttr::{Dvd | Rom | Closed | HasData}),
            true,
        );
        assert!(medium_matches(&closed, MediaType::AnyInRecorder.into()));
        assert!(!medium_matches(&closed, MediaType::Writable.into()));

        let in_reader = medium(
            make_bitflags!(MediaAttr::{Dvd | Rom | Closed | HasData}),
            false,
        );
        assert!(!medium_matches(&in_reader, MediaType::AnyInRecorder.into()));
    }

    #[test]
    fn file_medium_matches_file_bit() {
        let file = MediumInfo {
            device: None,
            generation: 0,
            status: MediaAttr::File.into(),
            free_bytes: 0,
            used_bytes: 0,
            label: None,
            recorder: false,
        };

        assert!(medium_matches(&file, MediaType::File.into()));
        assert!(!medium_matches(&file, MediaType::Writable.into()));
    }
}
