//! The conflict graph: a bidirectional incidence between outward-facing
//! faces of the current hull and not-yet-inserted points that lie strictly
//! above them.
//!
//! Grounded on `original_source/ConvexHull/conflictgraph.cpp`'s
//! `VertexConflictList` / `FaceConflictList` pair of maps, translated to two
//! `HashMap`s. Points that have not yet become DCEL vertices are identified
//! by their index into the permuted point slice (the "remaining points
//! list" of spec §3) rather than by a `VertexId`, since no such handle
//! exists for them until the driver inserts them.

use std::collections::{HashMap, HashSet};

use crate::dcel::{Dcel, FaceId};
use crate::geometry::{visible, Point};

/// A not-yet-inserted point, identified by its index into the permuted
/// point slice passed to [`crate::compute_convex_hull`].
pub type PointIndex = usize;

/// Bidirectional `face <-> point` conflict index.
///
/// Both maps are populated lazily: a face or point that never conflicts
/// with anything never gets an entry, matching the spec's memory
/// discipline note and the original's find-before-insert pattern.
#[derive(Debug, Default)]
pub struct ConflictGraph {
    visible_by: HashMap<FaceId, HashSet<PointIndex>>,
    seen_from: HashMap<PointIndex, HashSet<FaceId>>,
}

impl ConflictGraph {
    /// An empty conflict graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the graph against the initial tetrahedron: for every current
    /// face and every point at index `>= 4` in `points`, records a conflict
    /// iff the point is visible from the face.
    pub fn seed(&mut self, dcel: &Dcel, points: &[Point]) {
        for face in dcel.iter_faces() {
            let [v0, v1, v2] = dcel.face_vertices(face).map(|v| dcel.vertex_point(v));
            for (i, &p) in points.iter().enumerate().skip(4) {
                if visible(v0, v1, v2, p) {
                    self.add_conflict(face, i);
                }
            }
        }
    }

    /// The faces visible from `point`, or an empty set if none are known.
    #[must_use]
    pub fn faces_visible_from(&self, point: PointIndex) -> HashSet<FaceId> {
        self.seen_from.get(&point).cloned().unwrap_or_default()
    }

    /// The points visible from `face`, or an empty set if none are known.
    #[must_use]
    pub fn points_visible_from(&self, face: FaceId) -> HashSet<PointIndex> {
        self.visible_by.get(&face).cloned().unwrap_or_default()
    }

    /// Records that `point` conflicts with `face` in both indices.
    pub fn add_conflict(&mut self, face: FaceId, point: PointIndex) {
        self.visible_by.entry(face).or_default().insert(point);
        self.seen_from.entry(point).or_default().insert(face);
    }

    /// Removes `face` from the forward index and from every point's
    /// reverse-index entry that referenced it. A no-op if `face` has no
    /// entries.
    pub fn delete_face(&mut self, face: FaceId) {
        if let Some(points) = self.visible_by.remove(&face) {
            for point in points {
                if let Some(faces) = self.seen_from.get_mut(&point) {
                    faces.remove(&face);
                }
            }
        }
    }

    /// Removes `point` from the reverse index and from every face's
    /// forward-index entry that referenced it. A no-op if `point` has no
    /// entries.
    pub fn erase_point(&mut self, point: PointIndex) {
        if let Some(faces) = self.seen_from.remove(&point) {
            for face in faces {
                if let Some(points) = self.visible_by.get_mut(&face) {
                    points.remove(&point);
                }
            }
        }
    }

    /// For every horizon half-edge, the union of the candidate points that
    /// could see either of the two faces that used to meet there.
    ///
    /// Only points already in conflict with one of the two faces incident
    /// to a horizon edge could possibly be in conflict with the new
    /// triangle built on that edge, so the union of those two sets is
    /// exactly the set of points worth re-testing against the new face —
    /// testing every remaining point against every new face would be
    /// correct but wasteful.
    pub fn join_points_over_horizon(
        &self,
        dcel: &Dcel,
        horizon: &[crate::dcel::HalfEdgeId],
    ) -> HashMap<crate::dcel::HalfEdgeId, HashSet<PointIndex>> {
        horizon
            .iter()
            .map(|&h| {
                let inside_face = dcel.half_edge(h).face().expect("horizon edge has a face");
                let twin_face = dcel
                    .half_edge(dcel.half_edge(h).twin().expect("horizon edge has a twin"))
                    .face()
                    .expect("horizon twin has a face");

                let mut candidates = self.points_visible_from(inside_face);
                candidates.extend(self.points_visible_from(twin_face));
                (h, candidates)
            })
            .collect()
    }

    /// For each new face built on a horizon edge, tests every candidate
    /// point from [`Self::join_points_over_horizon`] against that face and
    /// records the conflicts that hold.
    pub fn recompute_for_new_faces(
        &mut self,
        dcel: &Dcel,
        new_faces: &[(crate::dcel::HalfEdgeId, FaceId)],
        candidates: &HashMap<crate::dcel::HalfEdgeId, HashSet<PointIndex>>,
        points: &[Point],
    ) {
        for &(horizon_edge, face) in new_faces {
            let [v0, v1, v2] = dcel.face_vertices(face).map(|v| dcel.vertex_point(v));
            let Some(points_to_test) = candidates.get(&horizon_edge) else {
                continue;
            };
            for &point_index in points_to_test {
                if visible(v0, v1, v2, points[point_index]) {
                    self.add_conflict(face, point_index);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dcel::Dcel;

    #[test]
    fn unknown_keys_yield_empty_sets() {
        let graph = ConflictGraph::new();
        assert!(graph.faces_visible_from(0).is_empty());
    }

    #[test]
    fn delete_face_clears_reverse_entries() {
        let mut dcel = Dcel::new();
        let a = dcel.add_vertex(Point::new(0.0, 0.0, 0.0));
        let b = dcel.add_vertex(Point::new(1.0, 0.0, 0.0));
        let c = dcel.add_vertex(Point::new(0.0, 1.0, 0.0));
        let h1 = dcel.add_half_edge();
        let h2 = dcel.add_half_edge();
        let h3 = dcel.add_half_edge();
        dcel.set_from(h1, a);
        dcel.set_to(h1, b);
        dcel.set_from(h2, b);
        dcel.set_to(h2, c);
        dcel.set_from(h3, c);
        dcel.set_to(h3, a);
        dcel.set_next(h1, h2);
        dcel.set_next(h2, h3);
        dcel.set_next(h3, h1);
        let face = dcel.add_face();
        dcel.set_outer_half_edge(face, h1);

        let mut graph = ConflictGraph::new();
        graph.add_conflict(face, 7);
        assert_eq!(graph.faces_visible_from(7).len(), 1);

        graph.delete_face(face);
        assert!(graph.faces_visible_from(7).is_empty());
        assert!(graph.points_visible_from(face).is_empty());
    }

    #[test]
    fn erase_point_is_noop_on_unknown_point() {
        let mut graph = ConflictGraph::new();
        graph.erase_point(42);
    }
}
