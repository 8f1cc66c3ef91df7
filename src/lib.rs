//! # inc-hull3d
//!
//! Randomized incremental construction of 3D convex hulls, built over an
//! explicit doubly-connected edge list (DCEL) rather than the flat
//! face-list-plus-outside-set representation more common in Quickhull-style
//! crates.
//!
//! The three load-bearing pieces are [`dcel`] (the polyhedral mesh, owning
//! every vertex/half-edge/face record behind generation-checked handles),
//! [`conflict`] (a bidirectional face<->point incidence used to prune which
//! points need re-testing after each insertion), and `driver` (the outer
//! loop: horizon extraction, face destruction, fan construction, twin
//! stitching). [`tetrahedron`] bootstraps the first of those from four
//! affinely-independent input points.
//!
//! Point ingestion from files, a viewer, and any GUI frame driving this are
//! explicitly out of scope — this crate consumes an unordered point cloud
//! and returns a [`dcel::Dcel`] describing the convex polytope; a
//! collaborator decides how to display or persist it.
//!
//! ## References
//!
//! - Preparata, F. P. and Shamos, M. I. 1985. *Computational Geometry: An
//!   Introduction.* The randomized incremental 3D hull algorithm this crate
//!   implements.
//! - Berg, M. de et al. 2008. *Computational Geometry: Algorithms and
//!   Applications*, chapter 11.

#![warn(missing_docs, clippy::all)]

pub mod conflict;
pub mod dcel;
mod driver;
pub mod error;
pub mod geometry;
pub mod tetrahedron;

#[cfg(test)]
mod tests;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

pub use conflict::ConflictGraph;
pub use dcel::{Dcel, FaceId, HalfEdgeId, VertexId};
pub use error::{DegenerateReason, HullError};
pub use geometry::Point;

/// Computes the convex hull of `points`.
///
/// `points` is copied and permuted internally; the order of the original
/// slice is never observed by the caller. `seed`, when given, makes the
/// internal randomized permutation (and therefore the exact sequence of
/// insertions) reproducible — useful for tests and debugging. When absent,
/// the permutation is drawn from the host's non-deterministic source.
///
/// # Errors
///
/// Returns [`HullError::DegenerateInput`] if fewer than four points are
/// given, or if every sampled four-point subset is coplanar after
/// [`tetrahedron::MAX_COPLANARITY_RETRIES`] reshuffles.
///
/// # Panics
///
/// Panics if the DCEL or conflict-graph invariants documented on
/// [`dcel::Dcel`] are ever violated mid-algorithm. That is a programming
/// error in this crate, not a condition a caller can recover from, so it is
/// never turned into a `Result`.
pub fn compute_convex_hull(points: &[Point], seed: Option<u64>) -> Result<Dcel, HullError> {
    let mut points = points.to_vec();
    let mut rng: Box<dyn RngCore> = match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    };

    let mut dcel = Dcel::new();
    let span = tracing::debug_span!("compute_convex_hull", points = points.len());
    let _enter = span.enter();

    tetrahedron::build_tetrahedron(&mut dcel, &mut points, &mut *rng)?;

    let mut conflict = ConflictGraph::new();
    conflict.seed(&dcel, &points);

    driver::run(&mut dcel, &mut conflict, &points);

    Ok(dcel)
}
