//! The polyhedral mesh container: a doubly-connected edge list addressed by
//! stable, generation-checked handles.
//!
//! The original C++ implementation this crate is grounded on represents
//! vertices, half-edges and faces as raw pointers threaded through each
//! other (`Dcel::Vertex*`, `Dcel::HalfEdge*`, ...). A systems language with
//! ownership discipline can't keep that graph alive through reference
//! counting without risking cycles, so every entity here lives in a
//! [`generational_arena::Arena`] instead and is addressed by an opaque
//! handle (grounded on `setzer22-blackjack`'s `mesh/halfedge/id_types.rs`,
//! which does the same for an unrelated half-edge mesh). Deleting an entity
//! bumps its arena slot's generation; any handle taken before the deletion
//! then fails to resolve instead of aliasing whatever got allocated into the
//! freed slot.
//!
//! # Invariants
//!
//! These hold for every [`Dcel`] observed between driver iterations (i.e.
//! with no hull insertion in progress):
//!
//! - For every half-edge `h`: `h.next.prev == h`, `h.prev.next == h`,
//!   `h.next.face == h.face`, and `h.next.next.next == h` (triangularity).
//! - For every half-edge `h` with twin `t`: `t.twin == h`, `t.from == h.to`,
//!   `t.to == h.from`.
//! - Every vertex's cardinality equals the number of half-edges incident to
//!   it (counting both endpoints).
//! - Every face's boundary half-edges share a common plane and wind CCW as
//!   seen from outside the hull.
//!
//! Breaking any of these mid-algorithm is a programming error; see
//! [`crate::error::fatal`].

use std::collections::HashSet;

use generational_arena::{Arena, Index};

use crate::error::fatal;
use crate::geometry::{face_normal, Point};

/// A handle to a [`Vertex`] stored in a [`Dcel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexId(Index);

/// A handle to a [`HalfEdge`] stored in a [`Dcel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HalfEdgeId(Index);

/// A handle to a [`Face`] stored in a [`Dcel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceId(Index);

/// A vertex: its coordinate, one arbitrary outgoing half-edge, and the count
/// of half-edges incident to it (either endpoint).
#[derive(Debug, Clone)]
pub struct Vertex {
    point: Point,
    incident_half_edge: Option<HalfEdgeId>,
    cardinality: u32,
}

impl Vertex {
    /// The coordinate this vertex sits at.
    #[must_use]
    pub fn point(&self) -> Point {
        self.point
    }

    /// An arbitrary half-edge leaving this vertex, if any exist yet.
    #[must_use]
    pub fn incident_half_edge(&self) -> Option<HalfEdgeId> {
        self.incident_half_edge
    }

    /// The number of half-edges for which this vertex is either endpoint.
    #[must_use]
    pub fn cardinality(&self) -> u32 {
        self.cardinality
    }
}

/// A directed half-edge: `from -> to`, plus its face-boundary neighbors and
/// its twin (the oppositely-directed half-edge of the adjacent face).
#[derive(Debug, Clone, Default)]
pub struct HalfEdge {
    from: Option<VertexId>,
    to: Option<VertexId>,
    next: Option<HalfEdgeId>,
    prev: Option<HalfEdgeId>,
    twin: Option<HalfEdgeId>,
    face: Option<FaceId>,
}

impl HalfEdge {
    /// The vertex this half-edge leaves from. Panics if not yet set.
    #[must_use]
    pub fn from(&self) -> VertexId {
        self.from
            .unwrap_or_else(|| fatal("HalfEdge::from read before being set"))
    }

    /// The vertex this half-edge arrives at. Panics if not yet set.
    #[must_use]
    pub fn to(&self) -> VertexId {
        self.to
            .unwrap_or_else(|| fatal("HalfEdge::to read before being set"))
    }

    /// The following half-edge on the same face boundary, CCW.
    #[must_use]
    pub fn next(&self) -> Option<HalfEdgeId> {
        self.next
    }

    /// The preceding half-edge on the same face boundary, CCW.
    #[must_use]
    pub fn prev(&self) -> Option<HalfEdgeId> {
        self.prev
    }

    /// The oppositely-directed half-edge of the adjacent face, if set.
    #[must_use]
    pub fn twin(&self) -> Option<HalfEdgeId> {
        self.twin
    }

    /// The face this half-edge bounds.
    #[must_use]
    pub fn face(&self) -> Option<FaceId> {
        self.face
    }
}

/// A triangular face: one outer half-edge, from which the other two are
/// reached via `next`. This crate never builds faces with inner boundaries.
#[derive(Debug, Clone)]
pub struct Face {
    outer: Option<HalfEdgeId>,
}

impl Face {
    /// One of the face's three boundary half-edges.
    #[must_use]
    pub fn outer_half_edge(&self) -> Option<HalfEdgeId> {
        self.outer
    }
}

/// The mesh container. Owns every [`Vertex`], [`HalfEdge`] and [`Face`];
/// handles returned from its methods are non-owning references into it.
#[derive(Debug, Default)]
pub struct Dcel {
    vertices: Arena<Vertex>,
    half_edges: Arena<HalfEdge>,
    faces: Arena<Face>,
}

impl Dcel {
    /// Creates an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all contents, as if freshly constructed.
    pub fn reset(&mut self) {
        self.vertices = Arena::new();
        self.half_edges = Arena::new();
        self.faces = Arena::new();
    }

    // -- creation -----------------------------------------------------

    /// Inserts a new vertex with zero cardinality and no incident edge.
    pub fn add_vertex(&mut self, point: Point) -> VertexId {
        VertexId(self.vertices.insert(Vertex {
            point,
            incident_half_edge: None,
            cardinality: 0,
        }))
    }

    /// Inserts a half-edge with all neighbor references absent, including
    /// its endpoints — those are wired up afterwards with [`Self::set_from`]
    /// and [`Self::set_to`].
    pub fn add_half_edge(&mut self) -> HalfEdgeId {
        HalfEdgeId(self.half_edges.insert(HalfEdge::default()))
    }

    /// Inserts a face with no outer half-edge set.
    pub fn add_face(&mut self) -> FaceId {
        FaceId(self.faces.insert(Face { outer: None }))
    }

    // -- deletion -------------------------------------------------------

    /// Removes a half-edge, decrementing the cardinality of both endpoints
    /// and deleting either endpoint whose cardinality reaches zero. Does
    /// *not* touch the twin; the caller deletes it separately (this mirrors
    /// face destruction in the driver, where both half-edges of an interior
    /// edge are deleted independently as their respective faces are torn
    /// down).
    pub fn delete_half_edge(&mut self, id: HalfEdgeId) {
        let edge = self
            .half_edges
            .remove(id.0)
            .unwrap_or_else(|| fatal(format!("delete_half_edge: dangling {id:?}")));

        for v in [edge.from, edge.to].into_iter().flatten() {
            self.decrement_cardinality(v);
            if self.vertex(v).cardinality == 0 {
                self.delete_vertex(v);
            }
        }
    }

    /// Removes a face record. Does *not* remove its half-edges; the caller
    /// deletes those separately.
    pub fn delete_face(&mut self, id: FaceId) {
        self.faces
            .remove(id.0)
            .unwrap_or_else(|| fatal(format!("delete_face: dangling {id:?}")));
    }

    /// Removes a vertex. The vertex must already have zero cardinality —
    /// removing a vertex that still has incident half-edges is a
    /// programming error.
    pub fn delete_vertex(&mut self, id: VertexId) {
        let cardinality = self.vertex(id).cardinality;
        if cardinality != 0 {
            fatal(format!(
                "delete_vertex: {id:?} still has cardinality {cardinality}"
            ));
        }
        self.vertices
            .remove(id.0)
            .unwrap_or_else(|| fatal(format!("delete_vertex: dangling {id:?}")));
        tracing::trace!(?id, "vertex cardinality reached zero, removed");
    }

    // -- accessors --------------------------------------------------------

    /// Borrows a vertex record. Panics if `id` is stale or foreign.
    #[must_use]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        self.vertices
            .get(id.0)
            .unwrap_or_else(|| fatal(format!("vertex: dangling {id:?}")))
    }

    /// Borrows a half-edge record. Panics if `id` is stale or foreign.
    #[must_use]
    pub fn half_edge(&self, id: HalfEdgeId) -> &HalfEdge {
        self.half_edges
            .get(id.0)
            .unwrap_or_else(|| fatal(format!("half_edge: dangling {id:?}")))
    }

    /// Borrows a face record. Panics if `id` is stale or foreign.
    #[must_use]
    pub fn face(&self, id: FaceId) -> &Face {
        self.faces
            .get(id.0)
            .unwrap_or_else(|| fatal(format!("face: dangling {id:?}")))
    }

    /// The point a vertex sits at. Shorthand for `vertex(id).point()`.
    #[must_use]
    pub fn vertex_point(&self, id: VertexId) -> Point {
        self.vertex(id).point
    }

    /// Number of live vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of live faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of live half-edges. Each topological edge contributes two.
    #[must_use]
    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    // -- iteration --------------------------------------------------------

    /// All live vertex handles, in unspecified order.
    pub fn iter_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.iter().map(|(idx, _)| VertexId(idx))
    }

    /// All live face handles, in unspecified order.
    pub fn iter_faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.iter().map(|(idx, _)| FaceId(idx))
    }

    /// A face's three boundary half-edges, starting from its outer
    /// half-edge, in `next` order.
    #[must_use]
    pub fn face_half_edges(&self, face: FaceId) -> [HalfEdgeId; 3] {
        let h0 = self
            .face(face)
            .outer
            .unwrap_or_else(|| fatal(format!("face_half_edges: {face:?} has no outer edge")));
        let h1 = self
            .half_edge(h0)
            .next
            .unwrap_or_else(|| fatal(format!("face_half_edges: {h0:?}.next missing")));
        let h2 = self
            .half_edge(h1)
            .next
            .unwrap_or_else(|| fatal(format!("face_half_edges: {h1:?}.next missing")));
        if self.half_edge(h2).next != Some(h0) {
            fatal(format!("face_half_edges: {face:?} is not a triangle"));
        }
        [h0, h1, h2]
    }

    /// A face's three incident vertices in CCW order (the `from` vertex of
    /// each of its boundary half-edges).
    #[must_use]
    pub fn face_vertices(&self, face: FaceId) -> [VertexId; 3] {
        self.face_half_edges(face)
            .map(|h| self.half_edge(h).from())
    }

    /// The outward normal of a face, derived from its three incident
    /// vertices.
    #[must_use]
    pub fn outward_normal(&self, face: FaceId) -> glam::DVec3 {
        let [v0, v1, v2] = self.face_vertices(face).map(|v| self.vertex_point(v));
        face_normal(v0, v1, v2)
    }

    /// The half-edges incident to a vertex (either endpoint), found by
    /// rotating around the vertex via `twin -> next`. Only meaningful when
    /// the DCEL invariants hold (all relevant twins are set); that is true
    /// at every point the driver calls it.
    #[must_use]
    pub fn vertex_half_edges(&self, vertex: VertexId) -> Vec<HalfEdgeId> {
        let Some(start) = self.vertex(vertex).incident_half_edge else {
            return Vec::new();
        };

        let mut result = Vec::new();
        let mut seen = HashSet::new();
        let mut current = start;
        loop {
            if !seen.insert(current) {
                fatal(format!(
                    "vertex_half_edges: rotation around {vertex:?} did not close"
                ));
            }
            result.push(current);

            let twin = self
                .half_edge(current)
                .twin
                .unwrap_or_else(|| fatal(format!("vertex_half_edges: {current:?} has no twin")));
            result.push(twin);

            let next = self
                .half_edge(twin)
                .next
                .unwrap_or_else(|| fatal(format!("vertex_half_edges: {twin:?}.next missing")));
            if next == start {
                break;
            }
            current = next;
        }
        result
    }

    // -- mutators -----------------------------------------------------------

    /// Sets `h.next`. Does not touch `h.next`'s old `prev`; callers wire
    /// whole boundary cycles in one pass.
    pub fn set_next(&mut self, h: HalfEdgeId, next: HalfEdgeId) {
        self.half_edge_mut(h).next = Some(next);
    }

    /// Sets `h.prev`.
    pub fn set_prev(&mut self, h: HalfEdgeId, prev: HalfEdgeId) {
        self.half_edge_mut(h).prev = Some(prev);
    }

    /// Sets `a` and `b` as each other's twin atomically, so `a.twin.twin ==
    /// a` holds immediately — the twin relationship is inherently
    /// symmetric and must never be set from only one side.
    pub fn set_twin(&mut self, a: HalfEdgeId, b: HalfEdgeId) {
        self.half_edge_mut(a).twin = Some(b);
        self.half_edge_mut(b).twin = Some(a);
    }

    /// Sets `h.face`.
    pub fn set_face(&mut self, h: HalfEdgeId, face: FaceId) {
        self.half_edge_mut(h).face = Some(face);
    }

    /// Sets `h.from`.
    pub fn set_from(&mut self, h: HalfEdgeId, from: VertexId) {
        self.half_edge_mut(h).from = Some(from);
    }

    /// Sets `h.to`.
    pub fn set_to(&mut self, h: HalfEdgeId, to: VertexId) {
        self.half_edge_mut(h).to = Some(to);
    }

    /// Sets a face's outer half-edge.
    pub fn set_outer_half_edge(&mut self, face: FaceId, h: HalfEdgeId) {
        self.face_mut(face).outer = Some(h);
    }

    /// Sets a vertex's incident half-edge.
    pub fn set_incident_half_edge(&mut self, vertex: VertexId, h: HalfEdgeId) {
        self.vertex_mut(vertex).incident_half_edge = Some(h);
    }

    /// Increments a vertex's cardinality counter by one.
    pub fn increment_cardinality(&mut self, vertex: VertexId) {
        self.vertex_mut(vertex).cardinality += 1;
    }

    /// Decrements a vertex's cardinality counter by one. Underflowing past
    /// zero is a programming error.
    pub fn decrement_cardinality(&mut self, vertex: VertexId) {
        let v = self.vertex_mut(vertex);
        v.cardinality = v
            .cardinality
            .checked_sub(1)
            .unwrap_or_else(|| fatal(format!("decrement_cardinality: {vertex:?} underflowed")));
    }

    fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        self.vertices
            .get_mut(id.0)
            .unwrap_or_else(|| fatal(format!("vertex_mut: dangling {id:?}")))
    }

    fn half_edge_mut(&mut self, id: HalfEdgeId) -> &mut HalfEdge {
        self.half_edges
            .get_mut(id.0)
            .unwrap_or_else(|| fatal(format!("half_edge_mut: dangling {id:?}")))
    }

    fn face_mut(&mut self, id: FaceId) -> &mut Face {
        self.faces
            .get_mut(id.0)
            .unwrap_or_else(|| fatal(format!("face_mut: dangling {id:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_delete_half_edge_collects_orphan_vertex() {
        let mut dcel = Dcel::new();
        let a = dcel.add_vertex(Point::new(0.0, 0.0, 0.0));
        let b = dcel.add_vertex(Point::new(1.0, 0.0, 0.0));
        let h = dcel.add_half_edge();
        dcel.set_from(h, a);
        dcel.set_to(h, b);
        dcel.increment_cardinality(a);
        dcel.increment_cardinality(b);

        assert_eq!(dcel.vertex_count(), 2);
        dcel.delete_half_edge(h);
        // Both vertices dropped to zero cardinality and were removed.
        assert_eq!(dcel.vertex_count(), 0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut dcel = Dcel::new();
        dcel.add_vertex(Point::new(0.0, 0.0, 0.0));
        dcel.add_face();
        dcel.reset();
        assert_eq!(dcel.vertex_count(), 0);
        assert_eq!(dcel.face_count(), 0);
        assert_eq!(dcel.half_edge_count(), 0);
    }

    #[test]
    #[should_panic(expected = "invariant violation")]
    fn dangling_handle_is_fatal() {
        let mut dcel = Dcel::new();
        let v = dcel.add_vertex(Point::new(0.0, 0.0, 0.0));
        dcel.delete_vertex(v);
        dcel.vertex(v);
    }

    #[test]
    fn vertex_half_edges_rotates_around_a_tetrahedron_vertex() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut points = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
        ];
        let mut dcel = Dcel::new();
        let mut rng = StdRng::seed_from_u64(42);
        let tet = crate::tetrahedron::build_tetrahedron(&mut dcel, &mut points, &mut rng)
            .expect("four affinely-independent points build a tetrahedron");

        for &vertex in &tet.vertices {
            let incident = dcel.vertex_half_edges(vertex);
            assert_eq!(
                incident.len(),
                dcel.vertex(vertex).cardinality() as usize,
                "rotation must visit exactly the vertex's cardinality"
            );
            assert_eq!(incident.len(), 6, "every tetrahedron vertex has cardinality 6");

            let brute_force: HashSet<HalfEdgeId> = dcel
                .half_edges
                .iter()
                .map(|(idx, _)| HalfEdgeId(idx))
                .filter(|&h| {
                    let edge = dcel.half_edge(h);
                    edge.from() == vertex || edge.to() == vertex
                })
                .collect();

            let rotated: HashSet<HalfEdgeId> = incident.into_iter().collect();
            assert_eq!(
                rotated, brute_force,
                "vertex_half_edges must return exactly the half-edges incident to the vertex"
            );
        }
    }
}
