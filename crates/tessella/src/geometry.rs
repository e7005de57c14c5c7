//! Core 2D math types and transform builders.
//!
//! Everything rides on `lyon_geom`'s `euclid`-backed types: `Point`,
//! `Vector`, `Box2D` and `Transform2D`. This module pins the `f64`
//! aliases used throughout the crate and adds the two transform
//! constructors the matching model needs: the direct similarity mapping
//! one segment onto another, and the reflection across a segment's
//! supporting line.

/// 2D point in tiling space.
pub type Point = lyon_geom::Point<f64>;

/// 2D direction/offset vector.
pub type Vector = lyon_geom::Vector<f64>;

/// Affine placement transform.
pub type Transform = lyon_geom::Transform<f64>;

/// Axis-aligned rectangle (viewport bounds, tile bounds).
pub type Rect = lyon_geom::Box2D<f64>;

/// Angle in radians.
pub type Angle = lyon_geom::Angle<f64>;

pub use lyon_geom::{point, vector};

/// The similarity (rotation + uniform scale + translation) mapping the
/// directed segment `(a1, a2)` onto the directed segment `(b1, b2)`.
///
/// Computed as a complex ratio: with `u = a2 - a1` and `v = b2 - b1`,
/// the linear part is multiplication by `v / u`, and the translation
/// pins `a1` onto `b1`. Degenerate source segments (zero length) yield
/// a pure translation.
pub fn similarity_between(a1: Point, a2: Point, b1: Point, b2: Point) -> Transform {
    let u = a2 - a1;
    let v = b2 - b1;
    let denom = u.x * u.x + u.y * u.y;
    let (rx, ry) = if denom > 0.0 {
        ((v.x * u.x + v.y * u.y) / denom, (v.y * u.x - v.x * u.y) / denom)
    } else {
        (1.0, 0.0)
    };
    // Linear part: x' = rx*x - ry*y, y' = ry*x + rx*y.
    let tx = b1.x - (rx * a1.x - ry * a1.y);
    let ty = b1.y - (ry * a1.x + rx * a1.y);
    Transform::new(rx, ry, -ry, rx, tx, ty)
}

/// Reflection across the line through `p` and `q`.
///
/// `p` and `q` must be distinct; a degenerate axis reflects across the
/// horizontal line through `p`.
pub fn reflection_across(p: Point, q: Point) -> Transform {
    let d = q - p;
    let len = d.length();
    let (dx, dy) = if len > 0.0 { (d.x / len, d.y / len) } else { (1.0, 0.0) };
    let a = dx * dx - dy * dy;
    let b = 2.0 * dx * dy;
    // Linear part: x' = a*x + b*y, y' = b*x - a*y.
    let tx = p.x - (a * p.x + b * p.y);
    let ty = p.y - (b * p.x - a * p.y);
    Transform::new(a, b, b, -a, tx, ty)
}

/// Signed area of a closed point loop (shoelace formula).
///
/// Positive for counter-clockwise winding, negative for clockwise.
pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(p: Point, q: Point) {
        assert!(
            (p - q).length() < 1e-9,
            "expected {:?} to coincide with {:?}",
            p,
            q
        );
    }

    #[test]
    fn similarity_maps_endpoints() {
        let m = similarity_between(
            point(0.0, 0.0),
            point(1.0, 0.0),
            point(3.0, 1.0),
            point(3.0, 3.0),
        );
        assert_close(m.transform_point(point(0.0, 0.0)), point(3.0, 1.0));
        assert_close(m.transform_point(point(1.0, 0.0)), point(3.0, 3.0));
        // A similarity never flips handedness.
        assert!(m.determinant() > 0.0);
    }

    #[test]
    fn similarity_preserves_relative_offsets() {
        // Map the unit segment onto itself shifted by (2, 0): pure translation.
        let m = similarity_between(
            point(0.0, 0.0),
            point(1.0, 0.0),
            point(2.0, 0.0),
            point(3.0, 0.0),
        );
        assert_close(m.transform_point(point(0.5, 0.7)), point(2.5, 0.7));
    }

    #[test]
    fn reflection_fixes_axis_and_flips() {
        let m = reflection_across(point(0.0, 0.0), point(1.0, 1.0));
        assert_close(m.transform_point(point(0.5, 0.5)), point(0.5, 0.5));
        assert_close(m.transform_point(point(1.0, 0.0)), point(0.0, 1.0));
        assert!(m.determinant() < 0.0);
    }

    #[test]
    fn reflection_is_involutive() {
        let m = reflection_across(point(2.0, -1.0), point(3.0, 5.0));
        let twice = m.then(&m);
        assert_close(twice.transform_point(point(7.0, 7.0)), point(7.0, 7.0));
    }

    #[test]
    fn signed_area_winding() {
        let ccw = [
            point(0.0, 0.0),
            point(2.0, 0.0),
            point(2.0, 2.0),
            point(0.0, 2.0),
        ];
        assert!((signed_area(&ccw) - 4.0).abs() < 1e-12);
        let cw: Vec<Point> = ccw.iter().rev().copied().collect();
        assert!((signed_area(&cw) + 4.0).abs() < 1e-12);
    }
}
