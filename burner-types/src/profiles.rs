// SPDX-License-Identifier: GPL-3.0-only

//! Media profile expansion
//!
//! [`legal_profiles`] answers one question: given a coarse request mask
//! ("anything DVD, plus or sequential, rewritable, possibly blank"), which
//! concrete, internally consistent media statuses could a real disc of that
//! family report? Downstream filtering tests a probed medium against the
//! expanded set instead of re-deriving disc-format rules ad hoc.
//!
//! The expansion is hierarchical: format, then subtype, then the
//! writable/rewritable attribute, then the lifecycle status. Each level is
//! a small helper so the branches can be tested on their own. The result is
//! a set; ordering carries no meaning.

use enumflags2::make_bitflags;

use crate::media::{BD_RE, DVD_PLUS_RW, MediaAttr, MediaSet, is_true_random_writable};

/// Expand a request mask into every legal concrete media status.
///
/// An empty or contradictory request yields an empty set; there are no
/// error cases.
pub fn legal_profiles(request: MediaSet) -> Vec<MediaSet> {
    let mut out = Vec::new();

    if request.contains(MediaAttr::File) {
        push_unique(&mut out, MediaAttr::File.into());
    }

    if request.contains(MediaAttr::Cd) {
        if request.contains(MediaAttr::Rom) {
            expand_status(make_bitflags!(MediaAttr::{Cd | Rom}), request, &mut out);
        }
        expand_attribute(MediaAttr::Cd.into(), request, &mut out);
    }

    if request.contains(MediaAttr::Dvd) {
        expand_dvd(request, &mut out);
    }

    if request.contains(MediaAttr::Bd) {
        expand_bd(request, &mut out);
    }

    out
}

/// DVD subtypes each fix their writability up front or defer to the
/// attribute branch. There is no rewritable dual-layer dash format.
fn expand_dvd(request: MediaSet, out: &mut Vec<MediaSet>) {
    if request.contains(MediaAttr::Rom) {
        expand_status(make_bitflags!(MediaAttr::{Dvd | Rom}), request, out);
        if request.contains(MediaAttr::DualLayer) {
            expand_status(
                make_bitflags!(MediaAttr::{Dvd | Rom | DualLayer}),
                request,
                out,
            );
        }
    }

    if request.contains(MediaAttr::Jump) {
        expand_status(
            make_bitflags!(MediaAttr::{Dvd | Jump | DualLayer | Writable}),
            request,
            out,
        );
    }

    if request.contains(MediaAttr::Sequential) {
        expand_attribute(make_bitflags!(MediaAttr::{Dvd | Sequential}), request, out);
        if request.contains(MediaAttr::DualLayer) {
            expand_status(
                make_bitflags!(MediaAttr::{Dvd | Sequential | DualLayer | Writable}),
                request,
                out,
            );
        }
    }

    if request.contains(MediaAttr::Restricted) {
        expand_status(
            make_bitflags!(MediaAttr::{Dvd | Restricted | Rewritable}),
            request,
            out,
        );
    }

    if request.contains(MediaAttr::Plus) {
        expand_attribute(make_bitflags!(MediaAttr::{Dvd | Plus}), request, out);
        if request.contains(MediaAttr::DualLayer) {
            expand_attribute(
                make_bitflags!(MediaAttr::{Dvd | Plus | DualLayer}),
                request,
                out,
            );
        }
    }

    if request.contains(MediaAttr::Ram) {
        expand_status(
            make_bitflags!(MediaAttr::{Dvd | Ram | Rewritable}),
            request,
            out,
        );
    }
}

/// BD-R recording modes all imply write-once; BD-RE is the only rewritable
/// form.
fn expand_bd(request: MediaSet, out: &mut Vec<MediaSet>) {
    if request.contains(MediaAttr::Rom) {
        expand_with_dual_layer(make_bitflags!(MediaAttr::{Bd | Rom}), request, out);
    }
    if request.contains(MediaAttr::RandomAccess) {
        expand_with_dual_layer(
            make_bitflags!(MediaAttr::{Bd | RandomAccess | Writable}),
            request,
            out,
        );
    }
    if request.contains(MediaAttr::Srm) {
        expand_with_dual_layer(
            make_bitflags!(MediaAttr::{Bd | Srm | Writable}),
            request,
            out,
        );
    }
    if request.contains(MediaAttr::Pow) {
        expand_with_dual_layer(
            make_bitflags!(MediaAttr::{Bd | Pow | Writable}),
            request,
            out,
        );
    }
    if request.contains(MediaAttr::Rewritable) {
        expand_with_dual_layer(make_bitflags!(MediaAttr::{Bd | Rewritable}), request, out);
    }
}

fn expand_with_dual_layer(media: MediaSet, request: MediaSet, out: &mut Vec<MediaSet>) {
    expand_status(media, request, out);
    if request.contains(MediaAttr::DualLayer) {
        expand_status(media | MediaAttr::DualLayer, request, out);
    }
}

/// Attribute branch: writable and rewritable are mutually exclusive, each
/// expanded independently when requested.
fn expand_attribute(media: MediaSet, request: MediaSet, out: &mut Vec<MediaSet>) {
    if request.contains(MediaAttr::Rewritable) {
        expand_status(media | MediaAttr::Rewritable, request, out);
    }
    if request.contains(MediaAttr::Writable) {
        expand_status(media | MediaAttr::Writable, request, out);
    }
}

/// Status branch: record the bare format+writability value, then the
/// lifecycle variants whose bits the request asked for.
fn expand_status(media: MediaSet, request: MediaSet, out: &mut Vec<MediaSet>) {
    push_unique(out, media);

    if request.contains(MediaAttr::Blank) && !media.contains(MediaAttr::Rom) {
        push_unique(out, media | MediaAttr::Blank);

        // Only DVD+RW and BD-RE exist in a blank-but-unformatted state.
        // Sequential DVD-RW is usable directly in sequential mode and
        // restricted-overwrite DVD-RW is deliberately not included either.
        if request.contains(MediaAttr::Unformatted)
            && !media.contains(MediaAttr::Ram)
            && (media.contains(DVD_PLUS_RW) || media.contains(BD_RE))
        {
            push_unique(out, media | MediaAttr::Blank | MediaAttr::Unformatted);
        }
    }

    if request.contains(MediaAttr::Closed) {
        if media.intersects(MediaAttr::Dvd | MediaAttr::Bd) {
            // DVD/BD cannot mix audio and data at this granularity.
            let mut profile = media | MediaAttr::Closed;
            if request.contains(MediaAttr::HasData) {
                profile |= MediaAttr::HasData;
            }
            if request.contains(MediaAttr::Protected) {
                profile |= MediaAttr::Protected;
            }
            push_unique(out, profile);
        } else {
            expand_cd_content(media | MediaAttr::Closed, request, out);
        }
    }

    if request.contains(MediaAttr::Appendable)
        && !media.contains(MediaAttr::Rom)
        && !is_true_random_writable(media)
    {
        if media.intersects(MediaAttr::Dvd | MediaAttr::Bd) {
            push_unique(out, media | MediaAttr::Appendable | MediaAttr::HasData);
        } else {
            expand_cd_content(media | MediaAttr::Appendable, request, out);
        }
    }
}

/// CD content split: audio, data, and mixed-mode variants.
fn expand_cd_content(media: MediaSet, request: MediaSet, out: &mut Vec<MediaSet>) {
    if request.contains(MediaAttr::HasAudio) {
        push_unique(out, media | MediaAttr::HasAudio);
    }
    if request.contains(MediaAttr::HasData) {
        push_unique(out, media | MediaAttr::HasData);
    }
    if request.contains(MediaAttr::HasAudio) && request.contains(MediaAttr::HasData) {
        push_unique(out, media | MediaAttr::HasAudio | MediaAttr::HasData);
    }
}

fn push_unique(out: &mut Vec<MediaSet>, media: MediaSet) {
    if !out.contains(&media) {
        out.push(media);
    }
}
