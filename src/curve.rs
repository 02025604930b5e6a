// Copyright 2026 the Regio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tagged curve segment: line, quadratic or cubic Bézier.

use std::ops::Range;

use arrayvec::ArrayVec;

use crate::intersect::{self, MAX_INTERSECTIONS};
use crate::{CubicBez, Line, Point, QuadBez, Rect, Vec2};

/// Recursion guard for [`Curve::subdivide`]. Each level halves the
/// parameter range, so this bounds the output to 2^16 points per curve
/// on degenerate input.
const MAX_SUBDIVISION_DEPTH: usize = 16;

/// A parametric curve segment.
///
/// The parameter domain is the full real line; `eval(0.0)` is the start
/// point and `eval(1.0)` the end point, both exactly. Values are
/// immutable: all operations return new curves.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Curve {
    /// A line segment.
    Line(Line),
    /// A quadratic Bézier segment.
    Quad(QuadBez),
    /// A cubic Bézier segment.
    Cubic(CubicBez),
}

impl Curve {
    /// A line segment between two points.
    #[inline]
    pub fn line(p0: impl Into<Point>, p1: impl Into<Point>) -> Curve {
        Curve::Line(Line::new(p0, p1))
    }

    /// A quadratic Bézier from three control points.
    #[inline]
    pub fn quad(p0: impl Into<Point>, p1: impl Into<Point>, p2: impl Into<Point>) -> Curve {
        Curve::Quad(QuadBez::new(p0, p1, p2))
    }

    /// A cubic Bézier from four control points.
    #[inline]
    pub fn cubic(
        p0: impl Into<Point>,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> Curve {
        Curve::Cubic(CubicBez::new(p0, p1, p2, p3))
    }

    /// Evaluate the curve at parameter `t`, extrapolating beyond [0, 1].
    pub fn eval(&self, t: f64) -> Point {
        match self {
            Curve::Line(l) => l.eval(t),
            Curve::Quad(q) => q.eval(t),
            Curve::Cubic(c) => c.eval(t),
        }
    }

    /// The start point.
    #[inline]
    pub fn start(&self) -> Point {
        match self {
            Curve::Line(l) => l.p0,
            Curve::Quad(q) => q.p0,
            Curve::Cubic(c) => c.p0,
        }
    }

    /// The end point.
    #[inline]
    pub fn end(&self) -> Point {
        match self {
            Curve::Line(l) => l.p1,
            Curve::Quad(q) => q.p2,
            Curve::Cubic(c) => c.p3,
        }
    }

    /// The unnormalized tangent at parameter `t`.
    pub fn tangent(&self, t: f64) -> Vec2 {
        match self {
            Curve::Line(l) => l.tangent(),
            Curve::Quad(q) => q.tangent(t),
            Curve::Cubic(c) => c.tangent(t),
        }
    }

    /// The chord through the curve's endpoints.
    #[inline]
    pub fn baseline(&self) -> Line {
        Line::new(self.start(), self.end())
    }

    /// Split at parameter `t`.
    ///
    /// # Panics
    ///
    /// If `t` is not within the open interval (0, 1).
    pub fn split(&self, t: f64) -> (Curve, Curve) {
        match self {
            Curve::Line(l) => {
                let (a, b) = l.split(t);
                (Curve::Line(a), Curve::Line(b))
            }
            Curve::Quad(q) => {
                let (a, b) = q.split(t);
                (Curve::Quad(a), Curve::Quad(b))
            }
            Curve::Cubic(c) => {
                let (a, b) = c.split(t);
                (Curve::Cubic(a), Curve::Cubic(b))
            }
        }
    }

    /// The curve restricted to `[range.start, range.end]`,
    /// reparameterized to [0, 1].
    ///
    /// The new endpoints are the evaluated positions of the range
    /// bounds, so adjacent subsegments share endpoints exactly.
    ///
    /// # Panics
    ///
    /// If the range is empty or inverted.
    pub fn subsegment(&self, range: Range<f64>) -> Curve {
        let (t_min, t_max) = (range.start, range.end);
        assert!(t_min != t_max, "range must be non-zero");
        assert!(t_min < t_max, "range must not be inverted");

        if t_min == 0.0 && t_max == 1.0 {
            *self
        } else if t_min == 0.0 {
            self.split(t_max).0
        } else if t_max == 1.0 {
            self.split(t_min).1
        } else {
            self.split(t_min)
                .1
                .split((t_max - t_min) / (1.0 - t_min))
                .0
                .endpoints(self.eval(t_min), self.eval(t_max))
        }
    }

    /// The curve split at each of the given parameters.
    ///
    /// The parameters are sorted and deduplicated, and values at the
    /// domain bounds are dropped; passing no interior parameters returns
    /// the curve unchanged.
    pub fn split_at(&self, ts: &[f64]) -> Vec<Curve> {
        let mut ts: Vec<f64> = ts.to_vec();
        ts.sort_by(f64::total_cmp);
        ts.dedup();
        ts.retain(|&t| t != 0.0 && t != 1.0);

        match ts.len() {
            0 => vec![*self],
            1 => {
                let (a, b) = self.split(ts[0]);
                vec![a, b]
            }
            len => {
                let mut result = Vec::with_capacity(len + 1);
                result.push(self.subsegment(0.0..ts[0]));
                for window in ts.windows(2) {
                    result.push(self.subsegment(window[0]..window[1]));
                }
                result.push(self.subsegment(ts[len - 1]..1.0));
                result
            }
        }
    }

    /// The Green's-theorem area contribution of this curve.
    ///
    /// Summed around a closed ring this gives the signed enclosed area,
    /// negative for clockwise rings.
    pub fn signed_area(&self) -> f64 {
        match self {
            Curve::Line(l) => l.signed_area(),
            Curve::Quad(q) => q.signed_area(),
            Curve::Cubic(c) => c.signed_area(),
        }
    }

    /// Whether the curve deviates from its chord by less than
    /// `epsilon`.
    pub fn is_flat(&self, epsilon: f64) -> bool {
        match self {
            Curve::Line(_) => true,
            Curve::Quad(q) => q.is_flat(epsilon),
            Curve::Cubic(c) => c.is_flat(epsilon),
        }
    }

    /// The same tangent shape with new endpoints.
    pub fn endpoints(&self, start: Point, end: Point) -> Curve {
        match self {
            Curve::Line(l) => Curve::Line(l.endpoints(start, end)),
            Curve::Quad(q) => Curve::Quad(q.endpoints(start, end)),
            Curve::Cubic(c) => Curve::Cubic(c.endpoints(start, end)),
        }
    }

    /// The same curve traversed in the opposite direction.
    pub fn reverse(&self) -> Curve {
        match self {
            Curve::Line(l) => Curve::Line(l.reverse()),
            Curve::Quad(q) => Curve::Quad(q.reverse()),
            Curve::Cubic(c) => Curve::Cubic(c.reverse()),
        }
    }

    /// The parameter of the nearest point on the curve, not necessarily
    /// within [0, 1].
    pub fn nearest_t(&self, p: Point) -> f64 {
        match self {
            Curve::Line(l) => l.nearest_t(p),
            Curve::Quad(q) => q.nearest_t(p),
            Curve::Cubic(c) => c.nearest_t(p),
        }
    }

    /// Interior parameters where the tangent reverses along the x or y
    /// axis.
    pub fn inflections(&self) -> ArrayVec<f64, 4> {
        let mut result = ArrayVec::new();
        match self {
            Curve::Line(_) => {}
            Curve::Quad(q) => result.extend(q.inflections()),
            Curve::Cubic(c) => result.extend(c.inflections()),
        }
        result
    }

    /// The bounding box of the curve over [0, 1].
    ///
    /// Computed from the endpoints and interior inflections only, so it
    /// is tight exactly when the curve is monotone between them.
    pub fn bounds(&self) -> Rect {
        let mut bounds = Rect::from_points(self.start(), self.end());
        for t in self.inflections() {
            bounds = bounds.union_pt(self.eval(t));
        }
        bounds
    }

    /// Flatten the curve to a polyline within `max_error` of the true
    /// position, returned as an ordered point sequence including both
    /// endpoints.
    pub fn subdivide(&self, max_error: f64) -> Vec<Point> {
        let mut points = Vec::new();
        let threshold = max_error * max_error;
        subdivide_rec(self, threshold, 0, &mut points);
        points.push(self.end());
        points
    }

    /// All intersections between two curves.
    ///
    /// Returns deduplicated `(t_self, t_other)` pairs in [0, 1]², both
    /// parameters rounded to the parametric tolerance of the
    /// intersection engine.
    pub fn intersections(&self, other: &Curve) -> ArrayVec<(f64, f64), MAX_INTERSECTIONS> {
        intersect::intersections(self, other)
    }
}

impl From<Line> for Curve {
    #[inline]
    fn from(l: Line) -> Curve {
        Curve::Line(l)
    }
}

impl From<QuadBez> for Curve {
    #[inline]
    fn from(q: QuadBez) -> Curve {
        Curve::Quad(q)
    }
}

impl From<CubicBez> for Curve {
    #[inline]
    fn from(c: CubicBez) -> Curve {
        Curve::Cubic(c)
    }
}

/// The flattening error of a curve: squared deviation of its control
/// points from the chord midpoints.
fn subdivision_error(curve: &Curve) -> f64 {
    match curve {
        Curve::Line(_) => 0.0,
        Curve::Quad(q) => (q.p0.lerp(q.p2, 0.5) - q.p1).hypot2(),
        Curve::Cubic(c) => f64::max(
            (c.p0.lerp(c.p3, 1.0 / 3.0) - c.p1).hypot2(),
            (c.p0.lerp(c.p3, 2.0 / 3.0) - c.p2).hypot2(),
        ),
    }
}

fn subdivide_rec(curve: &Curve, threshold: f64, depth: usize, points: &mut Vec<Point>) {
    if depth >= MAX_SUBDIVISION_DEPTH || subdivision_error(curve) <= threshold {
        points.push(curve.start());
    } else {
        let (a, b) = curve.split(0.5);
        subdivide_rec(&a, threshold, depth + 1, points);
        subdivide_rec(&b, threshold, depth + 1, points);
    }
}

/// Signed perpendicular distance from `p` to the line through `a` and
/// `b`.
pub(crate) fn signed_distance(p: Point, a: Point, b: Point) -> f64 {
    let d = b - a;
    (p.to_vec2().cross(d) + b.to_vec2().cross(a.to_vec2())) / d.hypot()
}

/// Like `f64::signum`, but zero maps to -1 so the result is always a
/// usable sign factor.
#[inline]
pub(crate) fn nonzero_sign(n: f64) -> f64 {
    if n == 0.0 {
        -1.0
    } else {
        n.signum()
    }
}

#[cfg(test)]
mod tests {
    use super::Curve;
    use crate::Point;

    fn sample_kinds() -> [Curve; 3] {
        [
            Curve::line((0.0, 0.0), (2.0, 1.0)),
            Curve::quad((0.0, 0.0), (1.0, 2.0), (2.0, 0.5)),
            Curve::cubic((0.0, 0.0), (0.5, 1.5), (1.5, -0.5), (2.0, 1.0)),
        ]
    }

    #[test]
    fn eval_matches_endpoints() {
        for c in sample_kinds() {
            assert_eq!(c.eval(0.0), c.start());
            assert_eq!(c.eval(1.0), c.end());
        }
    }

    #[test]
    fn split_then_eval_reproduces_position() {
        for c in sample_kinds() {
            for t in [0.25, 0.5, 0.75] {
                let (a, b) = c.split(t);
                for i in 0..=8 {
                    let s = (i as f64) / 8.0;
                    let orig = c.eval(t * s);
                    assert!((a.eval(s) - orig).hypot() < 1e-12);
                    let orig = c.eval(t + (1.0 - t) * s);
                    assert!((b.eval(s) - orig).hypot() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn subsegment_welds_adjacent_endpoints() {
        for c in sample_kinds() {
            let pieces = c.split_at(&[0.3, 0.7]);
            assert_eq!(pieces.len(), 3);
            assert_eq!(pieces[0].start(), c.start());
            assert_eq!(pieces[2].end(), c.end());
            for pair in pieces.windows(2) {
                assert_eq!(pair[0].end(), pair[1].start());
            }
        }
    }

    #[test]
    fn split_at_trims_domain_bounds() {
        let c = Curve::line((0.0, 0.0), (1.0, 0.0));
        assert_eq!(c.split_at(&[]).len(), 1);
        assert_eq!(c.split_at(&[0.0, 1.0]).len(), 1);
        assert_eq!(c.split_at(&[0.0, 0.5, 1.0]).len(), 2);
        assert_eq!(c.split_at(&[0.5, 0.5]).len(), 2);
    }

    #[test]
    #[should_panic(expected = "range must not be inverted")]
    fn inverted_subsegment_panics() {
        let c = Curve::line((0.0, 0.0), (1.0, 0.0));
        let _ = c.subsegment(0.7..0.3);
    }

    #[test]
    fn subdivide_stays_on_curve() {
        for c in sample_kinds() {
            let points = c.subdivide(1e-3);
            assert!(points.len() >= 2);
            assert_eq!(points[0], c.start());
            assert_eq!(*points.last().unwrap(), c.end());
            // every emitted point lies on the curve
            for p in &points {
                let t = c.nearest_t(*p).clamp(0.0, 1.0);
                assert!((c.eval(t) - *p).hypot() < 1e-6);
            }
        }
    }

    #[test]
    fn bounds_contains_samples() {
        for c in sample_kinds() {
            let bounds = c.bounds().inflate(1e-9, 1e-9);
            for i in 0..=32 {
                let t = (i as f64) / 32.0;
                assert!(bounds.contains(c.eval(t)), "{c:?} at {t}");
            }
        }
    }

    #[test]
    fn reverse_swaps_endpoints() {
        for c in sample_kinds() {
            let r = c.reverse();
            assert_eq!(r.start(), c.end());
            assert_eq!(r.end(), c.start());
            assert!((r.signed_area() + c.signed_area()).abs() < 1e-12);
        }
    }

    #[test]
    fn nearest_recovers_parameter_all_kinds() {
        for c in sample_kinds() {
            for t0 in [0.25, 0.5, 0.75] {
                let t = c.nearest_t(c.eval(t0));
                assert!((t - t0).abs() < 1e-6, "{c:?}: {t} vs {t0}");
            }
        }
    }

    #[test]
    fn line_line_crossing() {
        let a = Curve::line((0.0, 0.0), (2.0, 2.0));
        let b = Curve::line((0.0, 2.0), (2.0, 0.0));
        let hits = a.intersections(&b);
        assert_eq!(hits.len(), 1);
        let (ta, tb) = hits[0];
        assert!((ta - 0.5).abs() < 1e-12);
        assert!((tb - 0.5).abs() < 1e-12);
        assert!((a.eval(ta) - Point::new(1.0, 1.0)).hypot() < 1e-12);
    }
}
