// Copyright 2026 the Regio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier segments.

use arrayvec::ArrayVec;

use crate::common::{solve_quadratic, EPSILON};
use crate::curve::{nonzero_sign, signed_distance};
use crate::{Point, Vec2};

/// How many Newton searches the nearest-point query seeds, and how many
/// steps each may take. The quintic stationarity condition of a cubic
/// has no closed form, so the search must be restarted across the
/// parameter range to avoid settling in a local minimum.
const SEARCH_STARTS: usize = 4;
const SEARCH_STEPS: usize = 8;

/// A single cubic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBez {
    /// The start point.
    pub p0: Point,
    /// The first control point.
    pub p1: Point,
    /// The second control point.
    pub p2: Point,
    /// The end point.
    pub p3: Point,
}

impl CubicBez {
    /// Create a new cubic Bézier segment.
    #[inline]
    pub fn new(
        p0: impl Into<Point>,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> CubicBez {
        CubicBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
        }
    }

    /// Evaluate the curve at parameter `t`, extrapolating beyond [0, 1].
    ///
    /// The endpoints are returned exactly at t = 0 and t = 1.
    pub fn eval(&self, t: f64) -> Point {
        if t == 0.0 {
            return self.p0;
        } else if t == 1.0 {
            return self.p3;
        }
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let t2 = t * t;
        // (1 - t)³ p0 + 3t(1 - t)² p1 + 3(1 - t)t² p2 + t³ p3
        (self.p0.to_vec2() * (mt2 * mt)
            + self.p1.to_vec2() * (3.0 * mt2 * t)
            + self.p2.to_vec2() * (3.0 * mt * t2)
            + self.p3.to_vec2() * (t2 * t))
        .to_point()
    }

    /// The unnormalized tangent at parameter `t`.
    pub fn tangent(&self, t: f64) -> Vec2 {
        let mt = 1.0 - t;
        // 3(1 - t)²(p1 - p0) + 6(1 - t)t(p2 - p1) + 3t²(p3 - p2)
        (self.p1 - self.p0) * (3.0 * mt * mt)
            + (self.p2 - self.p1) * (6.0 * mt * t)
            + (self.p3 - self.p2) * (3.0 * t * t)
    }

    /// Split at parameter `t`, using de Casteljau.
    ///
    /// Both halves share the evaluated split point exactly.
    ///
    /// # Panics
    ///
    /// If `t` is not within the open interval (0, 1).
    pub fn split(&self, t: f64) -> (CubicBez, CubicBez) {
        assert!(t > 0.0 && t < 1.0, "t must be within (0,1)");
        let e = self.p0.lerp(self.p1, t);
        let f = self.p1.lerp(self.p2, t);
        let g = self.p2.lerp(self.p3, t);
        let h = e.lerp(f, t);
        let j = f.lerp(g, t);
        let k = self.eval(t);
        (
            CubicBez::new(self.p0, e, h, k),
            CubicBez::new(k, j, g, self.p3),
        )
    }

    /// The Green's-theorem area contribution of this segment.
    pub fn signed_area(&self) -> f64 {
        (self.p3.x * (-self.p0.y - 3.0 * self.p1.y - 6.0 * self.p2.y)
            - 3.0 * self.p2.x * (self.p0.y + self.p1.y - 2.0 * self.p3.y)
            + 3.0 * self.p1.x * (-2.0 * self.p0.y + self.p2.y + self.p3.y)
            + self.p0.x * (6.0 * self.p1.y + 3.0 * self.p2.y + self.p3.y))
            / 20.0
    }

    /// Whether both control points deviate from the chord by less than
    /// `epsilon`.
    ///
    /// Uses the Sederberg bound: factor 4/9 when the two offsets
    /// disagree in sign, 3/4 otherwise.
    pub fn is_flat(&self, epsilon: f64) -> bool {
        let d1 = signed_distance(self.p1, self.p0, self.p3);
        let d2 = signed_distance(self.p2, self.p0, self.p3);

        let k = if d1 * d2 < 0.0 { 4.0 / 9.0 } else { 3.0 / 4.0 };
        (d1 * k).abs() < epsilon && (d2 * k).abs() < epsilon
    }

    /// The same tangent shape with new endpoints.
    #[inline]
    pub fn endpoints(&self, start: Point, end: Point) -> CubicBez {
        CubicBez::new(
            start,
            self.p1 + (start - self.p0),
            self.p2 + (end - self.p3),
            end,
        )
    }

    /// The same segment traversed in the opposite direction.
    #[inline]
    pub fn reverse(&self) -> CubicBez {
        CubicBez {
            p0: self.p3,
            p1: self.p2,
            p2: self.p1,
            p3: self.p0,
        }
    }

    /// The parameter of the nearest point on the curve, not necessarily
    /// within [0, 1].
    ///
    /// Runs several seeded Newton searches over the quintic
    /// stationarity condition, always compared against the endpoint
    /// tangent projections since the search can miss them.
    pub fn nearest_t(&self, p: Point) -> f64 {
        let qa = self.p0 - p;
        let ab = self.p1 - self.p0;
        let bc = self.p2 - self.p1;
        let cd = self.p3 - self.p2;
        let qd = self.p3 - p;
        let br = bc - ab;
        let a2 = (cd - bc) - br;

        let mut min_distance = nonzero_sign(ab.cross(qa)) * qa.hypot();
        let mut param = -qa.dot(ab) / ab.dot(ab);

        let distance = nonzero_sign(cd.cross(qd)) * qd.hypot();
        if distance.abs() < min_distance.abs() {
            min_distance = distance;
            param = ((p - self.p2).dot(cd) / cd.dot(cd)).max(1.0);
        }

        for i in 0..SEARCH_STARTS {
            let mut t = i as f64 / (SEARCH_STARTS - 1) as f64;
            let mut step = 0;
            loop {
                let qpt = self.eval(t) - p;
                let distance = nonzero_sign(self.tangent(t).cross(qpt)) * qpt.hypot();
                if distance.abs() < min_distance.abs() {
                    min_distance = distance;
                    param = t;
                }
                if step == SEARCH_STEPS {
                    break;
                }

                let d1 = a2 * (3.0 * t * t) + br * (6.0 * t) + ab * 3.0;
                let d2 = a2 * (6.0 * t) + br * 6.0;
                let dt = qpt.dot(d1) / (d1.dot(d1) + qpt.dot(d2));
                if dt.abs() < EPSILON {
                    break;
                }

                t -= dt;
                if !(0.0..=1.0).contains(&t) {
                    break;
                }
                step += 1;
            }
        }

        param
    }

    /// Interior parameters where the tangent reverses along the x or y
    /// axis.
    ///
    /// Splitting at these makes each piece monotone on both axes.
    pub fn inflections(&self) -> ArrayVec<f64, 4> {
        // pathological shapes need a looser tolerance than the quad case
        const INFLECTION_EPSILON: f64 = 1e-7;

        let a0 = self.p1 - self.p0;
        let a1 = ((self.p2 - self.p1) - a0) * 2.0;
        let a2 = (self.p3 - self.p0) - (self.p2 - self.p1) * 3.0;

        let mut result = ArrayVec::new();
        let inside = |n: f64| n > INFLECTION_EPSILON && n < 1.0 - INFLECTION_EPSILON;
        for root in solve_quadratic(a0.x, a1.x, a2.x) {
            if inside(root) && !result.is_full() {
                result.push(root);
            }
        }
        for root in solve_quadratic(a0.y, a1.y, a2.y) {
            if inside(root) && !result.is_full() {
                result.push(root);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::CubicBez;
    use crate::Point;

    fn assert_near(p0: Point, p1: Point, epsilon: f64) {
        assert!((p1 - p0).hypot() < epsilon, "{p0:?} != {p1:?}");
    }

    #[test]
    fn eval_endpoints_exact() {
        let c = CubicBez::new((0.1, 0.2), (1.9, -0.6), (2.8, 1.1), (3.0, 4.0));
        assert_eq!(c.eval(0.0), c.p0);
        assert_eq!(c.eval(1.0), c.p3);
    }

    #[test]
    fn split_reproduces_curve() {
        let c = CubicBez::new((0.0, 0.0), (1.0, 2.0), (3.0, -1.0), (4.0, 1.0));
        for t in [0.2, 0.5, 0.8] {
            let (a, b) = c.split(t);
            assert_eq!(a.p3, b.p0);
            for i in 0..=10 {
                let s = (i as f64) / 10.0;
                assert_near(a.eval(s), c.eval(s * t), 1e-12);
                assert_near(b.eval(s), c.eval(t + s * (1.0 - t)), 1e-12);
            }
        }
    }

    #[test]
    fn tangent_matches_finite_difference() {
        let c = CubicBez::new((0.0, 0.0), (1.0, 2.0), (3.0, -1.0), (4.0, 1.0));
        let delta = 1e-6;
        for i in 1..10 {
            let t = (i as f64) / 10.0;
            let d = c.tangent(t);
            let approx = (c.eval(t + delta) - c.eval(t - delta)) * (0.5 / delta);
            assert!((d - approx).hypot() < 1e-4);
        }
    }

    #[test]
    fn signed_area_semicircle_approximation() {
        // kappa cubic approximating a quarter circle, swept four times,
        // encloses roughly pi
        let k = 4.0 / 3.0 * (2.0_f64.sqrt() - 1.0);
        let quads = [
            CubicBez::new((1.0, 0.0), (1.0, k), (k, 1.0), (0.0, 1.0)),
            CubicBez::new((0.0, 1.0), (-k, 1.0), (-1.0, k), (-1.0, 0.0)),
            CubicBez::new((-1.0, 0.0), (-1.0, -k), (-k, -1.0), (0.0, -1.0)),
            CubicBez::new((0.0, -1.0), (k, -1.0), (1.0, -k), (1.0, 0.0)),
        ];
        let area: f64 = quads.iter().map(CubicBez::signed_area).sum();
        assert!((area - std::f64::consts::PI).abs() < 1e-3);
    }

    #[test]
    fn nearest_recovers_parameter() {
        let c = CubicBez::new((0.0, 0.0), (1.0, 2.0), (3.0, -1.0), (4.0, 1.0));
        for t0 in [0.25, 0.5, 0.75] {
            let t = c.nearest_t(c.eval(t0));
            assert!((t - t0).abs() < 1e-6, "{t} vs {t0}");
        }
    }

    #[test]
    fn nearest_beyond_endpoints() {
        let c = CubicBez::new((0.0, 0.0), (1.0, 1.0), (3.0, 1.0), (4.0, 0.0));
        assert!(c.nearest_t(Point::new(-2.0, 0.0)) < 0.0);
        assert!(c.nearest_t(Point::new(6.0, 0.0)) > 1.0);
    }

    #[test]
    fn inflections_of_s_shape() {
        // y extreme twice: an S through the x axis
        let c = CubicBez::new((0.0, 0.0), (1.0, 3.0), (2.0, -3.0), (3.0, 0.0));
        let inf = c.inflections();
        assert_eq!(inf.len(), 2);
        for t in inf {
            assert!(t > 0.0 && t < 1.0);
        }

        // monotone on both axes
        let c = CubicBez::new((0.0, 0.0), (1.0, 0.5), (2.0, 1.5), (3.0, 2.0));
        assert!(c.inflections().is_empty());
    }

    #[test]
    fn is_flat_uses_sederberg_bound() {
        let flat = CubicBez::new((0.0, 0.0), (1.0, 1e-9), (2.0, -1e-9), (3.0, 0.0));
        assert!(flat.is_flat(1e-6));
        let bent = CubicBez::new((0.0, 0.0), (1.0, 1.0), (2.0, 1.0), (3.0, 0.0));
        assert!(!bent.is_flat(1e-6));
    }
}
