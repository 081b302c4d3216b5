// SPDX-License-Identifier: GPL-3.0-only

//! Error types for probe collaborators

use thiserror::Error;

/// Why a hardware probe produced no answer.
///
/// A failed probe is not surfaced to the user: the monitor drops the
/// candidate device (or leaves the medium untouched) and logs at debug
/// level. The variants exist so backends can say what happened.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("{0} is not an optical drive")]
    NotOptical(String),

    #[error("{device} did not answer the probe: {reason}")]
    Unresponsive { device: String, reason: String },

    #[error("probe backend failure: {0}")]
    Backend(String),
}
