//! Edge geometry primitives: straight segments, quadratic and cubic
//! Bézier curves, and elliptic arcs.
//!
//! All variants share one parametric interface over `t ∈ [0, 1]`:
//! sampling, tangents, splitting, approximate bounds and tolerance-based
//! hit-testing. Control points live in shape-local space; every query
//! takes the placement transform explicitly so the same master geometry
//! can be evaluated under any number of tile placements.

use crate::geometry::{Point, Rect, Transform, Vector};
use lyon_geom::{Arc, CubicBezierSegment, LineSegment, QuadraticBezierSegment};

/// Number of samples used for approximate length and arc bounds.
const LENGTH_SAMPLES: usize = 16;

/// Smallest hit-test sampling step; bounds the work on huge tolerances.
const MIN_HIT_STEP: f64 = 1e-4;

/// Errors from geometry queries with out-of-range inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Split parameter outside the open interval (0, 1).
    SplitOutOfRange(f64),
    /// Hit-test tolerance must be strictly positive.
    ToleranceNotPositive(f64),
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::SplitOutOfRange(t) => {
                write!(f, "split parameter {} is outside (0, 1)", t)
            }
            GeometryError::ToleranceNotPositive(tol) => {
                write!(f, "hit-test tolerance {} is not positive", tol)
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// Result of a successful hit test: the nearest point on the curve and
/// its normalized parametric position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveHit {
    pub point: Point,
    pub t: f64,
    pub distance: f64,
}

/// One piece of edge geometry.
#[derive(Debug, Clone)]
pub enum Curve {
    Line(LineSegment<f64>),
    Quadratic(QuadraticBezierSegment<f64>),
    Cubic(CubicBezierSegment<f64>),
    Arc(Arc<f64>),
}

impl Curve {
    /// Straight segment between two points.
    pub fn line(from: Point, to: Point) -> Self {
        Curve::Line(LineSegment { from, to })
    }

    /// Point at parameter `t ∈ [0, 1]` in local space.
    pub fn sample(&self, t: f64) -> Point {
        match self {
            Curve::Line(s) => s.sample(t),
            Curve::Quadratic(s) => s.sample(t),
            Curve::Cubic(s) => s.sample(t),
            Curve::Arc(s) => s.sample(t),
        }
    }

    /// Unit tangent at parameter `t`, under `transform`.
    ///
    /// Returns the zero vector for degenerate geometry.
    pub fn tangent(&self, t: f64, transform: &Transform) -> Vector {
        let raw = match self {
            Curve::Line(s) => s.to_vector(),
            Curve::Quadratic(s) => s.derivative(t),
            Curve::Cubic(s) => s.derivative(t),
            Curve::Arc(s) => s.sample_tangent(t),
        };
        let mapped = transform.transform_vector(raw);
        let len = mapped.length();
        if len > 0.0 { mapped / len } else { mapped }
    }

    /// Approximate length of the curve in local space, by sampled
    /// polyline. Exact for straight segments.
    pub fn approx_length(&self) -> f64 {
        match self {
            Curve::Line(s) => s.length(),
            _ => {
                let mut len = 0.0;
                let mut prev = self.sample(0.0);
                for i in 1..=LENGTH_SAMPLES {
                    let next = self.sample(i as f64 / LENGTH_SAMPLES as f64);
                    len += (next - prev).length();
                    prev = next;
                }
                len
            }
        }
    }

    /// Append points whose axis-aligned hull contains the curve under
    /// `transform`: endpoints plus control points for Bézier variants,
    /// sampled points for arcs.
    ///
    /// Callers bounding several curves at once collect all their hull
    /// points into one box. Note that a straight axis-aligned curve's
    /// own box has zero area, which `Box2D::union` treats as empty, so
    /// per-curve boxes must not be unioned.
    pub fn hull_points(&self, transform: &Transform, out: &mut Vec<Point>) {
        let map = |p: Point| transform.transform_point(p);
        match self {
            Curve::Line(s) => out.extend([map(s.from), map(s.to)]),
            Curve::Quadratic(s) => out.extend([map(s.from), map(s.ctrl), map(s.to)]),
            Curve::Cubic(s) => {
                out.extend([map(s.from), map(s.ctrl1), map(s.ctrl2), map(s.to)])
            }
            Curve::Arc(_) => {
                out.extend(
                    (0..=LENGTH_SAMPLES).map(|i| map(self.sample(i as f64 / LENGTH_SAMPLES as f64))),
                );
            }
        }
    }

    /// Approximate axis-aligned bounds under `transform`, from the hull
    /// points. The box is conservative, never tight-fitting.
    pub fn bounds(&self, transform: &Transform) -> Rect {
        let mut points = Vec::new();
        self.hull_points(transform, &mut points);
        Rect::from_points(points)
    }

    /// Split at parameter `t`, producing the two sub-curves.
    ///
    /// `t` must lie strictly inside (0, 1).
    pub fn split(&self, t: f64) -> Result<(Curve, Curve), GeometryError> {
        if !(t > 0.0 && t < 1.0) {
            return Err(GeometryError::SplitOutOfRange(t));
        }
        Ok(match self {
            Curve::Line(s) => {
                let (a, b) = s.split(t);
                (Curve::Line(a), Curve::Line(b))
            }
            Curve::Quadratic(s) => {
                let (a, b) = s.split(t);
                (Curve::Quadratic(a), Curve::Quadratic(b))
            }
            Curve::Cubic(s) => {
                let (a, b) = s.split(t);
                (Curve::Cubic(a), Curve::Cubic(b))
            }
            Curve::Arc(s) => {
                let (a, b) = s.split(t);
                (Curve::Arc(a), Curve::Arc(b))
            }
        })
    }

    /// Nearest point on the curve within `tolerance` of `point`, under
    /// `transform`.
    ///
    /// Straight segments project exactly. Curved variants sample
    /// uniformly with a parametric step of roughly
    /// `tolerance / approx_length` and keep the closest sample, so the
    /// reported point can be off by up to about one step's worth of arc
    /// length.
    pub fn hit_test(
        &self,
        point: Point,
        tolerance: f64,
        transform: &Transform,
    ) -> Result<Option<CurveHit>, GeometryError> {
        if tolerance <= 0.0 {
            return Err(GeometryError::ToleranceNotPositive(tolerance));
        }
        if let Curve::Line(s) = self {
            let from = transform.transform_point(s.from);
            let to = transform.transform_point(s.to);
            let d = to - from;
            let len_sq = d.x * d.x + d.y * d.y;
            let t = if len_sq > 0.0 {
                (((point - from).x * d.x + (point - from).y * d.y) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let nearest = from.lerp(to, t);
            let distance = (point - nearest).length();
            return Ok(if distance <= tolerance {
                Some(CurveHit { point: nearest, t, distance })
            } else {
                None
            });
        }

        let length = self.approx_length();
        if length <= 0.0 {
            return Ok(None);
        }
        let step = (tolerance / length).clamp(MIN_HIT_STEP, 0.25);
        let steps = (1.0 / step).ceil() as usize;
        let mut best: Option<CurveHit> = None;
        for i in 0..=steps {
            let t = (i as f64 / steps as f64).min(1.0);
            let candidate = transform.transform_point(self.sample(t));
            let distance = (point - candidate).length();
            if best.as_ref().map_or(true, |b| distance < b.distance) {
                best = Some(CurveHit { point: candidate, t, distance });
            }
        }
        Ok(best.filter(|b| b.distance <= tolerance))
    }
}
