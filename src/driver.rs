//! The incremental hull driver: the outer loop that inserts one remaining
//! point at a time, growing the tetrahedron into the full hull.
//!
//! Horizon extraction is grounded on
//! `original_source/ConvexHull/convexhullbuilderhelper.cpp`'s
//! `bringMeTheHorizon` / `orderHorizon` pair; fan construction and twin
//! stitching are grounded on `facebuilderhelper.cpp`'s `buildFaces`.

use std::collections::{HashMap, HashSet};

use crate::conflict::ConflictGraph;
use crate::dcel::{Dcel, FaceId, HalfEdgeId, VertexId};
use crate::error::fatal;
use crate::geometry::Point;

/// Runs the state machine in spec order for every point at index `>= 4`:
/// find visible faces, extract the horizon, tear down the visible cap,
/// stitch a new fan to the horizon, and refresh the conflict graph.
pub fn run(dcel: &mut Dcel, conflict: &mut ConflictGraph, points: &[Point]) {
    for i in 4..points.len() {
        step(dcel, conflict, points, i);
    }
}

fn step(dcel: &mut Dcel, conflict: &mut ConflictGraph, points: &[Point], point_index: usize) {
    let visible_faces = conflict.faces_visible_from(point_index);
    if visible_faces.is_empty() {
        // The point lies inside (or on) the current hull; it can never
        // become a vertex of the final hull.
        conflict.erase_point(point_index);
        return;
    }

    let horizon = extract_horizon(dcel, &visible_faces);
    let candidates = conflict.join_points_over_horizon(dcel, &horizon);

    for &face in &visible_faces {
        conflict.delete_face(face);
    }
    destroy_faces(dcel, &visible_faces);

    let apex = dcel.add_vertex(points[point_index]);
    let new_faces = build_fan(dcel, apex, &horizon);
    stitch_new_face_twins(dcel, &new_faces);

    conflict.recompute_for_new_faces(dcel, &new_faces, &candidates, points);
    conflict.erase_point(point_index);

    tracing::debug!(
        point_index,
        visible = visible_faces.len(),
        horizon = horizon.len(),
        "inserted point into hull"
    );
}

/// Collects the horizon of `visible_faces`: for every visible face, the
/// twins of its boundary edges whose other face is *not* visible, then
/// walks those edges into a single closed cycle via a from-vertex adjacency
/// map (a bijection on the horizon, since the visible region is a
/// topological disk).
fn extract_horizon(dcel: &Dcel, visible_faces: &HashSet<FaceId>) -> Vec<HalfEdgeId> {
    let mut unordered = Vec::new();
    let mut next_from: HashMap<VertexId, HalfEdgeId> = HashMap::new();

    for &face in visible_faces {
        for h in dcel.face_half_edges(face) {
            let twin = dcel
                .half_edge(h)
                .twin()
                .unwrap_or_else(|| fatal(format!("extract_horizon: {h:?} has no twin")));
            let twin_face = dcel
                .half_edge(twin)
                .face()
                .unwrap_or_else(|| fatal(format!("extract_horizon: {twin:?} has no face")));

            if !visible_faces.contains(&twin_face) {
                next_from.insert(dcel.half_edge(twin).from(), twin);
                unordered.push(twin);
            }
        }
    }

    if unordered.is_empty() {
        fatal("extract_horizon: visible region has no boundary");
    }

    let start = unordered[0];
    let start_from = dcel.half_edge(start).from();

    let mut ordered = Vec::with_capacity(unordered.len());
    let mut cursor = start;
    loop {
        ordered.push(cursor);
        let cursor_to = dcel.half_edge(cursor).to();
        if cursor_to == start_from {
            break;
        }
        cursor = *next_from
            .get(&cursor_to)
            .unwrap_or_else(|| fatal("extract_horizon: horizon failed to close"));
    }

    if ordered.len() != unordered.len() {
        fatal("extract_horizon: horizon cycle did not cover every boundary edge");
    }
    ordered
}

/// Deletes every face in `visible_faces` along with its three half-edges
/// (and any vertex whose cardinality drops to zero as a result). The
/// surviving horizon twins keep pointing at the half-edges being deleted
/// here until [`build_fan`]/[`stitch_new_face_twins`] overwrite them.
fn destroy_faces(dcel: &mut Dcel, visible_faces: &HashSet<FaceId>) {
    for &face in visible_faces {
        for h in dcel.face_half_edges(face) {
            dcel.delete_half_edge(h);
        }
        dcel.delete_face(face);
    }
}

/// Builds one new triangle per horizon edge, fanning out from `apex`.
/// Returns the new faces paired with the horizon edge each was built on, in
/// the same cyclic order as `horizon`.
fn build_fan(dcel: &mut Dcel, apex: VertexId, horizon: &[HalfEdgeId]) -> Vec<(HalfEdgeId, FaceId)> {
    horizon
        .iter()
        .map(|&h| {
            let from = dcel.half_edge(h).from();
            let to = dcel.half_edge(h).to();

            let e1 = dcel.add_half_edge(); // to -> from, co-directional with h's twin
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

            dcel.set_twin(e1, h);

            dcel.set_incident_half_edge(to, e1);
            dcel.set_incident_half_edge(from, e2);
            dcel.set_incident_half_edge(apex, e3);

            for v in [from, to, apex] {
                dcel.increment_cardinality(v);
                dcel.increment_cardinality(v);
            }

            let face = dcel.add_face();
            dcel.set_outer_half_edge(face, e1);
            for edge in [e1, e2, e3] {
                dcel.set_face(edge, face);
            }

            (h, face)
        })
        .collect()
}

/// Stitches the `e2`/`e3` twin pairs shared between adjacent cone faces:
/// `new_faces[i]`'s `e3` (`outer.prev`, `apex -> to_i`) is the twin of
/// `new_faces[i + 1]`'s `e2` (`outer.next`, `from_{i+1} -> apex`), cyclically
/// — the two faces meet at the shared spoke through horizon vertex `to_i ==
/// from_{i+1}`, matching `close_to_apex`'s `e2 <-> sibling_e3` pairing.
fn stitch_new_face_twins(dcel: &mut Dcel, new_faces: &[(HalfEdgeId, FaceId)]) {
    let n = new_faces.len();
    for i in 0..n {
        let (_, face_i) = new_faces[i];
        let (_, face_j) = new_faces[(i + 1) % n];

        let outer_i = dcel
            .face(face_i)
            .outer_half_edge()
            .expect("fan face has an outer edge");
        let e3_i = dcel
            .half_edge(outer_i)
            .prev()
            .expect("fan face is a wired triangle");

        let outer_j = dcel
            .face(face_j)
            .outer_half_edge()
            .expect("fan face has an outer edge");
        let e2_j = dcel
            .half_edge(outer_j)
            .next()
            .expect("fan face is a wired triangle");

        dcel.set_twin(e3_i, e2_j);
    }
}
