// SPDX-License-Identifier: GPL-3.0-only

//! UDisks2 media profile mapping
//!
//! UDisks2 reports the loaded profile as a string like `optical_dvd_plus_rw`
//! and the drive's capabilities as a list of the same tokens. These tables
//! translate that vocabulary into [`MediaSet`] attributes.

use enumflags2::make_bitflags;

use burner_types::{MediaAttr, MediaSet};

const PROFILES: [(&str, MediaSet); 14] = [
    ("optical_cd", make_bitflags!(MediaAttr::{Cd | Rom})),
    ("optical_cd_r", make_bitflags!(MediaAttr::{Cd | Writable})),
    ("optical_cd_rw", make_bitflags!(MediaAttr::{Cd | Rewritable})),
    ("optical_dvd", make_bitflags!(MediaAttr::{Dvd | Rom})),
    (
        "optical_dvd_r",
        make_bitflags!(MediaAttr::{Dvd | Sequential | Writable}),
    ),
    (
        "optical_dvd_rw",
        make_bitflags!(MediaAttr::{Dvd | Sequential | Rewritable}),
    ),
    (
        "optical_dvd_ram",
        make_bitflags!(MediaAttr::{Dvd | Ram | Rewritable}),
    ),
    (
        "optical_dvd_plus_r",
        make_bitflags!(MediaAttr::{Dvd | Plus | Writable}),
    ),
    (
        "optical_dvd_plus_rw",
        make_bitflags!(MediaAttr::{Dvd | Plus | Rewritable}),
    ),
    (
        "optical_dvd_plus_r_dl",
        make_bitflags!(MediaAttr::{Dvd | Plus | Writable | DualLayer}),
    ),
    (
        "optical_dvd_plus_rw_dl",
        make_bitflags!(MediaAttr::{Dvd | Plus | Rewritable | DualLayer}),
    ),
    ("optical_bd", make_bitflags!(MediaAttr::{Bd | Rom})),
    (
        "optical_bd_r",
        make_bitflags!(MediaAttr::{Bd | Srm | Writable}),
    ),
    ("optical_bd_re", make_bitflags!(MediaAttr::{Bd | Rewritable})),
];

/// Format and writability attributes for one UDisks2 profile token.
/// Unknown tokens (HD DVD, MO, ...) yield `None` and are skipped.
pub fn profile_attrs(profile: &str) -> Option<MediaSet> {
    PROFILES
        .iter()
        .find(|(token, _)| *token == profile)
        .map(|(_, attrs)| *attrs)
}

/// Whether a compatibility list announces any recordable profile.
pub fn compatibility_can_write(profiles: &[String]) -> bool {
    profiles.iter().any(|profile| {
        profile_attrs(profile).is_some_and(|attrs| {
            attrs.intersects(MediaAttr::Writable | MediaAttr::Rewritable)
        })
    })
}

/// Full status of a loaded medium: the profile attributes plus the
/// lifecycle UDisks2 can tell apart (blank vs. recorded-and-closed; the
/// appendable middle ground needs deeper probing than the Drive interface
/// offers).
pub fn medium_status(profile: &str, blank: bool) -> Option<MediaSet> {
    let attrs = profile_attrs(profile)?;

    Some(if blank && !attrs.contains(MediaAttr::Rom) {
        attrs | MediaAttr::Blank
    } else {
        attrs | MediaAttr::Closed | MediaAttr::HasData
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_profiles_map_to_consistent_attrs() {
        for (token, attrs) in PROFILES {
            let writability = [MediaAttr::Rom, MediaAttr::Writable, MediaAttr::Rewritable]
                .iter()
                .filter(|attr| attrs.contains(**attr))
                .count();
            assert_eq!(writability, 1, "profile {} mixes writability", token);
        }

        assert_eq!(
            profile_attrs("optical_dvd_plus_rw"),
            Some(make_bitflags!(MediaAttr::{Dvd | Plus | Rewritable}))
        );
        assert_eq!(profile_attrs("optical_hddvd"), None);
    }

    #[test]
    fn compatibility_detects_recorders() {
        let writer = vec![
            "optical_cd".to_string(),
            "optical_cd_r".to_string(),
            "optical_dvd_plus_rw".to_string(),
        ];
        assert!(compatibility_can_write(&writer));

        let reader = vec!["optical_cd".to_string(), "optical_dvd".to_string()];
        assert!(!compatibility_can_write(&reader));
    }

    #[test]
    fn medium_status_reflects_blankness() {
        assert_eq!(
            medium_status("optical_dvd_rw", true),
            Some(make_bitflags!(
                MediaAttr::{Dvd | Sequential | Rewritable | Blank}
            ))
        );
        assert_eq!(
            medium_status("optical_cd", false),
            Some(make_bitflags!(MediaAttr::{Cd | Rom | Closed | HasData}))
        );
        // A pressed disc can never be blank, whatever the flag says.
        assert_eq!(
            medium_status("optical_dvd", true),
            Some(make_bitflags!(MediaAttr::{Dvd | Rom | Closed | HasData}))
        );
        assert_eq!(medium_status("optical_mo", true), None);
    }
}
