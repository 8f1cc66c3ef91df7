use super::*;
use std::collections::HashSet;

fn face_euler_data(dcel: &Dcel) -> (usize, usize, usize) {
    let v = dcel.vertex_count();
    let e = dcel.half_edge_count() / 2;
    let f = dcel.face_count();
    (v, e, f)
}

/// Checks the universal invariants from the spec against a computed hull:
/// triangularity, twin symmetry, face closure, Euler characteristic,
/// convexity, and extremal containment of every input point.
fn check_invariants(dcel: &Dcel, input_points: &[Point]) {
    let (v, e, f) = face_euler_data(dcel);
    assert_eq!(
        v as isize - e as isize + f as isize,
        2,
        "Euler characteristic must hold: V={v} E={e} F={f}"
    );

    for face in dcel.iter_faces() {
        let hs = dcel.face_half_edges(face); // panics internally if not a triangle
        for &h in &hs {
            let edge = dcel.half_edge(h);
            let next = dcel.half_edge(edge.next().expect("next set"));
            assert_eq!(next.from(), edge.to(), "face closure: next.from == h.to");
            assert_eq!(
                edge.next().map(|n| dcel.half_edge(n).face()),
                Some(edge.face()),
                "face closure: h.next.face == h.face"
            );

            let twin_id = edge.twin().expect("twin set between iterations");
            let twin = dcel.half_edge(twin_id);
            assert_eq!(twin.twin(), Some(h), "twin symmetry: h.twin.twin == h");
            assert_eq!(twin.from(), edge.to(), "twin symmetry: t.from == h.to");
            assert_eq!(twin.to(), edge.from(), "twin symmetry: t.to == h.from");
        }
    }

    for face in dcel.iter_faces() {
        let normal = dcel.outward_normal(face);
        let origin = dcel.vertex_point(dcel.face_vertices(face)[0]);
        for vertex in dcel.iter_vertices() {
            let p = dcel.vertex_point(vertex);
            let side = (p - origin).dot(normal);
            assert!(
                side < 1e-6,
                "convexity: vertex {p:?} is strictly outside face plane (side={side})"
            );
        }
    }

    let hull_vertices: HashSet<_> = dcel
        .iter_vertices()
        .map(|v| {
            let p = dcel.vertex_point(v);
            (p.x.to_bits(), p.y.to_bits(), p.z.to_bits())
        })
        .collect();
    for &p in input_points {
        // Extremal containment: every input point lies within or on the
        // polytope, i.e. on the non-positive side of every face plane.
        for face in dcel.iter_faces() {
            let normal = dcel.outward_normal(face);
            let origin = dcel.vertex_point(dcel.face_vertices(face)[0]);
            let side = (p - origin).dot(normal);
            assert!(
                side < 1e-6,
                "extremal containment: input point {p:?} outside face plane (side={side})"
            );
        }
    }
    let _ = hull_vertices; // available to callers wanting set-equality checks
}

/// The bit-pattern-keyed coordinate set of every vertex in `dcel`, for
/// set-equality comparisons between two hulls (permutation invariance,
/// hull-of-hull idempotence) that must not pass merely because the two
/// polytopes happen to share vertex/face/edge counts.
fn vertex_set(dcel: &Dcel) -> HashSet<(u64, u64, u64)> {
    dcel.iter_vertices()
        .map(|v| {
            let p = dcel.vertex_point(v);
            (p.x.to_bits(), p.y.to_bits(), p.z.to_bits())
        })
        .collect()
}

#[test]
fn too_few_points_is_degenerate() {
    let points = [Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0)];
    assert_eq!(
        compute_convex_hull(&points, Some(1)).unwrap_err(),
        HullError::DegenerateInput(DegenerateReason::TooFewPoints)
    );
}

#[test]
fn coplanar_points_are_degenerate() {
    let points = [
        Point::new(0.0, 0.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(1.0, 1.0, 0.0),
    ];
    assert_eq!(
        compute_convex_hull(&points, Some(7)).unwrap_err(),
        HullError::DegenerateInput(DegenerateReason::AllCoplanar)
    );
}

#[test]
fn four_points_form_a_tetrahedron() {
    let points = [
        Point::new(0.0, 0.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(0.0, 0.0, 1.0),
    ];
    let dcel = compute_convex_hull(&points, Some(42)).unwrap();
    assert_eq!(face_euler_data(&dcel), (4, 6, 4));
    check_invariants(&dcel, &points);
}

#[test]
fn cube_corners() {
    let mut points = Vec::new();
    for &x in &[0.0, 1.0] {
        for &y in &[0.0, 1.0] {
            for &z in &[0.0, 1.0] {
                points.push(Point::new(x, y, z));
            }
        }
    }
    let dcel = compute_convex_hull(&points, Some(99)).unwrap();
    let (v, e, f) = face_euler_data(&dcel);
    assert_eq!(v, 8);
    assert_eq!(f, 12); // each square face triangulated
    assert_eq!(e, 18);
    check_invariants(&dcel, &points);
}

#[test]
fn octahedron() {
    let points = [
        Point::new(1.0, 0.0, 0.0),
        Point::new(-1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(0.0, -1.0, 0.0),
        Point::new(0.0, 0.0, 1.0),
        Point::new(0.0, 0.0, -1.0),
    ];
    let dcel = compute_convex_hull(&points, Some(3)).unwrap();
    assert_eq!(face_euler_data(&dcel), (6, 12, 8));
    check_invariants(&dcel, &points);
}

#[test]
fn interior_point_is_absent_from_output() {
    let points = [
        Point::new(0.0, 0.0, 0.0),
        Point::new(2.0, 0.0, 0.0),
        Point::new(0.0, 2.0, 0.0),
        Point::new(0.0, 0.0, 2.0),
        Point::new(0.1, 0.1, 0.1),
    ];
    let dcel = compute_convex_hull(&points, Some(13)).unwrap();
    assert_eq!(face_euler_data(&dcel), (4, 6, 4));
    for v in dcel.iter_vertices() {
        assert_ne!(dcel.vertex_point(v), points[4]);
    }
}

#[test]
fn axis_points_survive_a_cloud_of_interior_points() {
    let axis_points = [
        Point::new(1.0, 0.0, 0.0),
        Point::new(-1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(0.0, -1.0, 0.0),
        Point::new(0.0, 0.0, 1.0),
        Point::new(0.0, 0.0, -1.0),
    ];

    let mut rng = rand::rngs::StdRng::seed_from_u64(11);
    let dist = rand::distr::Uniform::new(-1.0_f64, 1.0).unwrap();
    let mut points = Vec::from(axis_points);
    while points.len() < 106 {
        use rand::Rng;
        let p = Point::new(
            rng.sample(dist),
            rng.sample(dist),
            rng.sample(dist),
        );
        // Keep it strictly inside the octahedron so it can never become a
        // hull vertex, regardless of how the interior cloud happens to land.
        if p.x.abs() + p.y.abs() + p.z.abs() < 0.95 {
            points.push(p);
        }
    }

    let dcel = compute_convex_hull(&points, Some(5)).unwrap();
    assert_eq!(face_euler_data(&dcel), (6, 12, 8));

    let hull_points: HashSet<_> = dcel
        .iter_vertices()
        .map(|v| {
            let p = dcel.vertex_point(v);
            (p.x.to_bits(), p.y.to_bits(), p.z.to_bits())
        })
        .collect();
    for axis in axis_points {
        assert!(hull_points.contains(&(axis.x.to_bits(), axis.y.to_bits(), axis.z.to_bits())));
    }
}

#[test]
fn permuting_the_input_does_not_change_the_polytope() {
    let mut points = vec![
        Point::new(1.0, 1.0, 1.0),
        Point::new(1.0, -1.0, -1.0),
        Point::new(-1.0, 1.0, -1.0),
        Point::new(-1.0, -1.0, 1.0),
        Point::new(0.0, 0.0, 0.0),
        Point::new(2.0, 2.0, 2.0),
    ];

    let dcel_a = compute_convex_hull(&points, Some(1)).unwrap();
    points.reverse();
    let dcel_b = compute_convex_hull(&points, Some(2)).unwrap();

    assert_eq!(face_euler_data(&dcel_a), face_euler_data(&dcel_b));
    assert_eq!(
        vertex_set(&dcel_a),
        vertex_set(&dcel_b),
        "permuting the input must not change the polytope's vertex set"
    );
}

#[test]
fn hull_of_its_own_vertices_is_idempotent() {
    let points = sphere_points(10);
    let dcel = compute_convex_hull(&points, Some(21)).unwrap();
    let vertices: Vec<Point> = dcel.iter_vertices().map(|v| dcel.vertex_point(v)).collect();

    let reconstructed = compute_convex_hull(&vertices, Some(22)).unwrap();
    assert_eq!(face_euler_data(&dcel), face_euler_data(&reconstructed));
    assert_eq!(
        vertex_set(&dcel),
        vertex_set(&reconstructed),
        "hulling a hull's own vertices must reproduce the same vertex set"
    );
}

#[test]
fn sphere_sample_hull_is_valid() {
    let points = sphere_points(12);
    let dcel = compute_convex_hull(&points, Some(77)).unwrap();
    check_invariants(&dcel, &points);
}

fn sphere_points(divisions: usize) -> Vec<Point> {
    fn rot_z(point: Point, angle: f64) -> Point {
        let e1 = angle.cos() * point.x - angle.sin() * point.y;
        let e2 = angle.sin() * point.x + angle.cos() * point.y;
        Point::new(e1, e2, point.z)
    }
    fn rot_x(point: Point, angle: f64) -> Point {
        let e2 = angle.cos() * point.y - angle.sin() * point.z;
        let e3 = angle.sin() * point.y + angle.cos() * point.z;
        Point::new(point.x, e2, e3)
    }

    let mut points = Vec::with_capacity(divisions * divisions);
    for step_x in 0..divisions {
        let angle_x = 2.0 * std::f64::consts::PI * (step_x as f64 / divisions as f64);
        let p = rot_x(Point::Y, angle_x);
        for step_z in 0..divisions {
            let angle_z = 2.0 * std::f64::consts::PI * (step_z as f64 / divisions as f64);
            points.push(rot_z(p, angle_z));
        }
    }
    points
}
