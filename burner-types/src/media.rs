// SPDX-License-Identifier: GPL-3.0-only

//! Media attribute flags
//!
//! A concrete disc is described by a [`MediaSet`]: one physical format bit,
//! exactly one writability bit, optional subtype/capacity bits, and the
//! lifecycle bits reported by the medium probe. The composed constants below
//! name the disc families the rest of the stack reasons about.

use enumflags2::{BitFlags, bitflags, make_bitflags};
use serde::{Deserialize, Serialize};

/// One independent attribute of an optical medium.
#[bitflags]
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaAttr {
    /// Virtual medium backed by an image file rather than a disc.
    File,
    Cd,
    Dvd,
    Bd,

    /// Second recording layer present (or required, for DVD-R DL).
    DualLayer,

    /// Pressed, read-only media.
    Rom,
    /// Write-once media.
    Writable,
    /// Erasable/overwritable media.
    Rewritable,

    /// DVD "plus" family (DVD+R / DVD+RW).
    Plus,
    /// DVD "dash" family recorded in sequential mode (DVD-R / DVD-RW).
    Sequential,
    /// DVD-RW in restricted-overwrite mode.
    Restricted,
    /// DVD-R dual-layer jump recording.
    Jump,
    /// DVD-RAM.
    Ram,

    /// BD-R in sequential recording mode.
    Srm,
    /// BD-R in pseudo-overwrite mode.
    Pow,
    /// BD-R in random recording mode.
    RandomAccess,

    Blank,
    /// Session closed / disc finalized.
    Closed,
    Appendable,
    /// Blank but not yet formatted for packet writing.
    Unformatted,

    HasData,
    HasAudio,
    /// Write-protected (e.g. cartridge switch).
    Protected,
}

/// A combination of [`MediaAttr`] flags describing a medium or a request.
pub type MediaSet = BitFlags<MediaAttr>;

/// CD-ROM.
pub const CD_ROM: MediaSet = make_bitflags!(MediaAttr::{Cd | Rom});
/// DVD-RW in restricted-overwrite mode (always rewritable).
pub const DVD_RW_RESTRICTED: MediaSet = make_bitflags!(MediaAttr::{Dvd | Restricted | Rewritable});
/// DVD+RW.
pub const DVD_PLUS_RW: MediaSet = make_bitflags!(MediaAttr::{Dvd | Plus | Rewritable});
/// DVD-RAM (always rewritable).
pub const DVD_RAM: MediaSet = make_bitflags!(MediaAttr::{Dvd | Ram | Rewritable});
/// BD-RE.
pub const BD_RE: MediaSet = make_bitflags!(MediaAttr::{Bd | Rewritable});

/// Media that rewrite in place with true random access. These never go
/// through an appendable state: there is no session to leave open.
const TRUE_RANDOM_WRITABLE: [MediaSet; 4] = [DVD_RW_RESTRICTED, DVD_PLUS_RW, DVD_RAM, BD_RE];

/// Whether `media` supports true random-access rewriting.
pub fn is_true_random_writable(media: MediaSet) -> bool {
    TRUE_RANDOM_WRITABLE.iter().any(|family| media.contains(*family))
}

/// Whether a medium with this status can be erased and rewritten.
pub fn can_be_rewritten(media: MediaSet) -> bool {
    media.contains(MediaAttr::Rewritable)
}

/// Whether a medium with this status can receive a new recording: any
/// rewritable disc, or a write-once disc that is blank or still appendable.
pub fn can_be_written(media: MediaSet) -> bool {
    if media.contains(MediaAttr::Protected) {
        return false;
    }

    can_be_rewritten(media)
        || (media.contains(MediaAttr::Writable)
            && media.intersects(MediaAttr::Blank | MediaAttr::Appendable))
}

pub fn has_data(media: MediaSet) -> bool {
    media.contains(MediaAttr::HasData)
}

pub fn has_audio(media: MediaSet) -> bool {
    media.contains(MediaAttr::HasAudio)
}

/// Short lower-case token for one attribute, stable for CLI use.
pub fn attr_name(attr: MediaAttr) -> &'static str {
    match attr {
        MediaAttr::File => "file",
        MediaAttr::Cd => "cd",
        MediaAttr::Dvd => "dvd",
        MediaAttr::Bd => "bd",
        MediaAttr::DualLayer => "dual-layer",
        MediaAttr::Rom => "rom",
        MediaAttr::Writable => "writable",
        MediaAttr::Rewritable => "rewritable",
        MediaAttr::Plus => "plus",
        MediaAttr::Sequential => "sequential",
        MediaAttr::Restricted => "restricted",
        MediaAttr::Jump => "jump",
        MediaAttr::Ram => "ram",
        MediaAttr::Srm => "srm",
        MediaAttr::Pow => "pow",
        MediaAttr::RandomAccess => "random-access",
        MediaAttr::Blank => "blank",
        MediaAttr::Closed => "closed",
        MediaAttr::Appendable => "appendable",
        MediaAttr::Unformatted => "unformatted",
        MediaAttr::HasData => "has-data",
        MediaAttr::HasAudio => "has-audio",
        MediaAttr::Protected => "protected",
    }
}

/// Render a media set as `cd+rewritable+blank` style tokens.
pub fn media_set_to_string(media: MediaSet) -> String {
    if media.is_empty() {
        return "none".to_string();
    }

    media
        .iter()
        .map(attr_name)
        .collect::<Vec<_>>()
        .join("+")
}

/// Parse a `cd+rewritable+blank` or comma-separated token list into a set.
pub fn media_set_from_str(input: &str) -> anyhow::Result<MediaSet> {
    let mut media = MediaSet::empty();

    for token in input.split(['+', ',']) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let attr = BitFlags::<MediaAttr>::all()
            .iter()
            .find(|attr| attr_name(*attr) == token)
            .ok_or_else(|| anyhow::anyhow!("unknown media attribute: {}", token))?;
        media |= attr;
    }

    Ok(media)
}
