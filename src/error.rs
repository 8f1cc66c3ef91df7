//! Error types surfaced to callers of [`crate::compute_convex_hull`].
//!
//! Only [`DegenerateInput`](HullError) is a recoverable, user-facing error.
//! Everything else a broken mesh could do — a missing twin, a non-triangular
//! face, a horizon that refuses to close — is a programming error and is
//! reported by panicking through [`fatal`], not by returning a `Result`.

use std::fmt;

/// The reason [`HullError::DegenerateInput`] was returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateReason {
    /// Fewer than four points were supplied.
    TooFewPoints,
    /// Every four-point subset sampled during tetrahedron construction was
    /// coplanar after [`crate::tetrahedron::MAX_COPLANARITY_RETRIES`] attempts.
    AllCoplanar,
}

impl fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegenerateReason::TooFewPoints => write!(f, "fewer than 4 points were supplied"),
            DegenerateReason::AllCoplanar => {
                write!(f, "every sampled 4-point subset was coplanar")
            }
        }
    }
}

/// The only error [`crate::compute_convex_hull`] returns to its caller.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HullError {
    /// The input cannot produce a non-degenerate tetrahedron.
    #[error("degenerate input: {0}")]
    DegenerateInput(DegenerateReason),
}

/// Logs `message` at `error` level and panics.
///
/// This is the single place an invariant violation surfaces: the DCEL and
/// conflict graph invariants documented on [`crate::dcel::Dcel`] are supposed
/// to be unconditionally true between driver iterations, so a violation is a
/// bug in this crate, not bad input — it is reported the same way in debug
/// and release builds rather than being smuggled into a `Result` the caller
/// might plausibly recover from.
#[track_caller]
pub(crate) fn fatal(message: impl fmt::Display) -> ! {
    tracing::error!(%message, "hull invariant violated");
    panic!("inc-hull3d invariant violation: {message}");
}
