//! Bootstraps the incremental hull algorithm's invariant "current hull": an
//! oriented tetrahedron built from four affinely-independent points.
//!
//! Grounded on `original_source/ConvexHull/tetrahedronbuilder.cpp`: permute
//! the points, sample the first four, retry on coplanarity, then build the
//! tetrahedron as a single closed unit with all six internal twin pairs
//! wired immediately (the spec's suggested simplification over the
//! original's build-then-patch-twins approach).

use rand::seq::SliceRandom;
use rand::Rng;

use crate::dcel::{Dcel, FaceId, HalfEdgeId, VertexId};
use crate::error::{DegenerateReason, HullError};
use crate::geometry::{Orientation, Point};

/// Bound on reshuffle attempts before giving up on a coplanar input.
///
/// The original implementation loops forever here; the spec's open
/// question on the coplanarity case requires a bounded retry that gives up
/// with `DegenerateInput` rather than looping or falling back to a 2D hull.
pub const MAX_COPLANARITY_RETRIES: usize = 1024;

/// The four tetrahedron vertices and its four triangular faces.
pub struct Tetrahedron {
    /// The DCEL vertex handles for the four tetrahedron points, in the same
    /// order they were sampled from the permuted point slice.
    pub vertices: [VertexId; 4],
    /// The tetrahedron's four faces: the base triangle on `vertices[0..3]`,
    /// followed by the three faces closing that base to `vertices[3]`.
    pub faces: [FaceId; 4],
}

/// Permutes `points` in place (Fisher-Yates via `rand`), then builds a
/// tetrahedron from the first four affinely-independent points found,
/// retrying the permutation up to [`MAX_COPLANARITY_RETRIES`] times.
///
/// On success, `points[0..4]` are exactly the tetrahedron's vertices and the
/// driver proceeds iterating `points[4..]`.
pub fn build_tetrahedron(
    dcel: &mut Dcel,
    points: &mut [Point],
    rng: &mut impl Rng,
) -> Result<Tetrahedron, HullError> {
    if points.len() < 4 {
        return Err(HullError::DegenerateInput(DegenerateReason::TooFewPoints));
    }

    for attempt in 0..MAX_COPLANARITY_RETRIES {
        points.shuffle(rng);
        let orientation = crate::geometry::sign4(points[0], points[1], points[2], points[3]);
        if orientation != Orientation::Coplanar {
            tracing::debug!(attempt, "found non-coplanar seed for tetrahedron");
            return Ok(make_tetrahedron(dcel, points, orientation));
        }
    }

    Err(HullError::DegenerateInput(DegenerateReason::AllCoplanar))
}

/// Builds the tetrahedron on `points[0..4]`, given their already-computed
/// orientation sign. Winds the base face so `points[3]` lies strictly
/// inside the solid being built, then closes the three remaining faces to
/// `points[3]` with all twins set in one pass.
fn make_tetrahedron(dcel: &mut Dcel, points: &[Point], orientation: Orientation) -> Tetrahedron {
    let v = [
        dcel.add_vertex(points[0]),
        dcel.add_vertex(points[1]),
        dcel.add_vertex(points[2]),
        dcel.add_vertex(points[3]),
    ];

    let h1 = dcel.add_half_edge();
    let h2 = dcel.add_half_edge();
    let h3 = dcel.add_half_edge();

    // Positive orientation winds (v0 -> v1 -> v2); negative flips to
    // (v1 -> v0 -> v2), so that in both cases v3 ends up strictly inside the
    // half-space behind the base face's outward normal.
    let wind = match orientation {
        Orientation::Positive => [(v[0], v[1]), (v[1], v[2]), (v[2], v[0])],
        Orientation::Negative => [(v[1], v[0]), (v[0], v[2]), (v[2], v[1])],
        Orientation::Coplanar => unreachable!("caller only builds on a non-coplanar orientation"),
    };

    for (h, (from, to)) in [h1, h2, h3].into_iter().zip(wind) {
        dcel.set_from(h, from);
        dcel.set_to(h, to);
    }
    dcel.set_next(h1, h2);
    dcel.set_next(h2, h3);
    dcel.set_next(h3, h1);
    dcel.set_prev(h1, h3);
    dcel.set_prev(h2, h1);
    dcel.set_prev(h3, h2);

    for p in [v[0], v[1], v[2]] {
        dcel.increment_cardinality(p);
        dcel.increment_cardinality(p);
    }

    let base_face = dcel.add_face();
    dcel.set_outer_half_edge(base_face, h1);
    for h in [h1, h2, h3] {
        dcel.set_face(h, base_face);
    }

    let mut faces = [base_face, base_face, base_face, base_face];
    for (i, h) in [h1, h2, h3].into_iter().enumerate() {
        faces[i + 1] = close_to_apex(dcel, v[3], h);
    }

    Tetrahedron {
        vertices: v,
        faces,
    }
}

/// Closes a new triangular face connecting `apex` to `base_edge`'s two
/// endpoints, wiring the twin pair shared with `base_edge` immediately and
/// the twin pairs shared with sibling cap faces as soon as both sides of
/// those internal edges exist (mirrors `addFaceTotetrahedron` in the
/// original: the first two cap faces leave one twin unset, which the third
/// call fills in from both directions).
fn close_to_apex(dcel: &mut Dcel, apex: VertexId, base_edge: HalfEdgeId) -> FaceId {
    let from = dcel.half_edge(base_edge).from();
    let to = dcel.half_edge(base_edge).to();

    let e1 = dcel.add_half_edge(); // to -> from, twin of base_edge
    let e2 = dcel.add_half_edge(); // from -> apex
    let e3 = dcel.add_half_edge(); // apex -> to

    dcel.set_from(e1, to);
    dcel.set_to(e1, from);
    dcel.set_from(e2, from);
    dcel.set_to(e2, apex);
    dcel.set_from(e3, apex);
    dcel.set_to(e3, to);

    dcel.set_next(e1, e2);
    dcel.set_next(e2, e3);
    dcel.set_next(e3, e1);
    dcel.set_prev(e1, e3);
    dcel.set_prev(e2, e1);
    dcel.set_prev(e3, e2);

    dcel.set_incident_half_edge(to, e1);
    dcel.set_incident_half_edge(from, e2);
    dcel.set_incident_half_edge(apex, e3);

    dcel.set_twin(e1, base_edge);

    // The sibling cap face sharing e2 (built on base_edge.prev) already
    // exists once we are not on the first call: its own `e3` is exactly our
    // e2's twin, reachable as base_edge.prev.twin.prev.
    let base_prev = dcel.half_edge(base_edge).prev().expect("base triangle wired");
    if let Some(prev_twin) = dcel.half_edge(base_prev).twin() {
        let sibling_e3 = dcel.half_edge(prev_twin).prev().expect("cap face wired");
        dcel.set_twin(e2, sibling_e3);
    }
    let base_next = dcel.half_edge(base_edge).next().expect("base triangle wired");
    if let Some(next_twin) = dcel.half_edge(base_next).twin() {
        let sibling_e2 = dcel.half_edge(next_twin).next().expect("cap face wired");
        dcel.set_twin(e3, sibling_e2);
    }

    for vtx in [from, to, apex] {
        dcel.increment_cardinality(vtx);
        dcel.increment_cardinality(vtx);
    }

    let face = dcel.add_face();
    dcel.set_outer_half_edge(face, e1);
    for h in [e1, e2, e3] {
        dcel.set_face(h, face);
    }
    face
}
