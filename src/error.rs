// Copyright 2026 the Regio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by the construction APIs.

/// The error type for fallible constructors in this crate.
///
/// Parameter-contract violations (such as splitting a curve outside the
/// open unit interval) are programmer errors and panic instead; see the
/// `# Panics` sections on the relevant methods.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A ring needs at least one curve.
    #[error("a ring requires at least one curve")]
    EmptyRing,
    /// A distance field needs a region with nonzero extent.
    #[error("cannot sample a distance field over an empty region")]
    EmptyRegion,
    /// The sampling frequency of a distance field must be positive.
    #[error("sampling frequency must be positive, got {0}")]
    InvalidSampleFrequency(f64),
}
