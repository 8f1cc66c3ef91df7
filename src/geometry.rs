//! Orientation and visibility predicates.
//!
//! Both predicates compare against a fixed epsilon band rather than testing
//! for an exact zero, per the fixed-precision discipline this crate commits
//! to (no exact/tolerant arithmetic backend is provided).

use glam::DVec3;

/// A point in 3D space. An alias rather than a newtype so all of `glam`'s
/// vector arithmetic (add, sub, scalar multiply, dot, cross) is available
/// without re-exporting it by hand.
pub type Point = DVec3;

/// The sign of the 4x4 orientation determinant, compared against a
/// symmetric epsilon band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The signed volume of tetrahedron `abcd` is below `-epsilon`.
    Negative,
    /// The four points are coplanar within `epsilon`.
    Coplanar,
    /// The signed volume of tetrahedron `abcd` is above `epsilon`.
    Positive,
}

trait ToRobust {
    fn to_robust(self) -> robust::Coord3D<f64>;
}

impl ToRobust for Point {
    fn to_robust(self) -> robust::Coord3D<f64> {
        robust::Coord3D {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}

/// `sign4(a, b, c, d)` — the sign of the determinant of the 4x4 matrix whose
/// rows are `(a, 1), (b, 1), (c, 1), (d, 1)`, equivalently the signed volume
/// of tetrahedron `abcd`. Computed with `robust::orient3d`'s adaptive
/// precision rather than a naive determinant expansion, since the original
/// naive-determinant version of this predicate is exactly the source of the
/// round-off failures the teacher's `RoundOffError` variant exists to catch.
#[must_use]
pub fn sign4(a: Point, b: Point, c: Point, d: Point) -> Orientation {
    let det = robust::orient3d(a.to_robust(), b.to_robust(), c.to_robust(), d.to_robust());
    if det > f64::EPSILON {
        Orientation::Positive
    } else if det < -f64::EPSILON {
        Orientation::Negative
    } else {
        Orientation::Coplanar
    }
}

/// The outward normal of a CCW-wound triangle `(v0, v1, v2)`: the cross
/// product of two consecutive boundary edge vectors.
#[must_use]
pub fn face_normal(v0: Point, v1: Point, v2: Point) -> DVec3 {
    (v1 - v0).cross(v2 - v0)
}

/// `visible(v0, v1, v2, p)` — true iff `p` lies strictly in the open
/// half-space above the plane of the CCW-wound triangle `(v0, v1, v2)`.
///
/// Uses the direct dot-product form against the face normal rather than
/// reassembling a 4x4 determinant: same sign, fewer operations, and it
/// avoids rebuilding the face's row data on every candidate point in the
/// conflict graph's inner loop.
#[must_use]
pub fn visible(v0: Point, v1: Point, v2: Point, p: Point) -> bool {
    let n = face_normal(v0, v1, v2);
    (p - v0).dot(n) > f64::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign4_detects_coplanar() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(1.0, 0.0, 0.0);
        let c = Point::new(0.0, 1.0, 0.0);
        let d = Point::new(1.0, 1.0, 0.0);
        assert_eq!(sign4(a, b, c, d), Orientation::Coplanar);
    }

    #[test]
    fn sign4_distinguishes_sides() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(1.0, 0.0, 0.0);
        let c = Point::new(0.0, 1.0, 0.0);
        let above = Point::new(0.0, 0.0, 1.0);
        let below = Point::new(0.0, 0.0, -1.0);
        assert_ne!(sign4(a, b, c, above), sign4(a, b, c, below));
        assert_ne!(sign4(a, b, c, above), Orientation::Coplanar);
    }

    #[test]
    fn visible_matches_outward_normal() {
        let v0 = Point::new(1.0, 0.0, 0.0);
        let v1 = Point::new(0.0, 1.0, 0.0);
        let v2 = Point::new(0.0, 0.0, 1.0);
        let outside = Point::new(10.0, 10.0, 10.0);
        let inside = Point::new(0.0, 0.0, 0.0);
        assert!(visible(v0, v1, v2, outside));
        assert!(!visible(v0, v1, v2, inside));
    }
}
