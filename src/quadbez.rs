// Copyright 2026 the Regio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadratic Bézier segments.

use arrayvec::ArrayVec;

use crate::common::solve_cubic;
use crate::curve::{nonzero_sign, signed_distance};
use crate::{CubicBez, Point, Vec2};

/// A single quadratic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadBez {
    /// The start point.
    pub p0: Point,
    /// The control point.
    pub p1: Point,
    /// The end point.
    pub p2: Point,
}

impl QuadBez {
    /// Create a new quadratic Bézier segment.
    #[inline]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>, p2: impl Into<Point>) -> QuadBez {
        QuadBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
        }
    }

    /// Evaluate the curve at parameter `t`, extrapolating beyond [0, 1].
    ///
    /// The endpoints are returned exactly at t = 0 and t = 1.
    pub fn eval(&self, t: f64) -> Point {
        if t == 0.0 {
            return self.p0;
        } else if t == 1.0 {
            return self.p2;
        }
        let mt = 1.0 - t;
        // (1 - t)² p0 + 2t(1 - t) p1 + t² p2
        (self.p0.to_vec2() * (mt * mt)
            + self.p1.to_vec2() * (2.0 * t * mt)
            + self.p2.to_vec2() * (t * t))
        .to_point()
    }

    /// The unnormalized tangent at parameter `t`.
    pub fn tangent(&self, t: f64) -> Vec2 {
        let mt = 1.0 - t;
        // 2(1 - t)(p1 - p0) + 2t(p2 - p1)
        (self.p1 - self.p0) * (2.0 * mt) + (self.p2 - self.p1) * (2.0 * t)
    }

    /// Split at parameter `t`, using de Casteljau.
    ///
    /// Both halves share the evaluated split point exactly.
    ///
    /// # Panics
    ///
    /// If `t` is not within the open interval (0, 1).
    pub fn split(&self, t: f64) -> (QuadBez, QuadBez) {
        assert!(t > 0.0 && t < 1.0, "t must be within (0,1)");
        let e = self.p0.lerp(self.p1, t);
        let f = self.p1.lerp(self.p2, t);
        let g = self.eval(t);
        (QuadBez::new(self.p0, e, g), QuadBez::new(g, f, self.p2))
    }

    /// Raise the order by 1.
    ///
    /// Returns a cubic Bézier segment that exactly represents this
    /// quadratic.
    pub fn raise(&self) -> CubicBez {
        CubicBez::new(
            self.p0,
            self.p0 + (2.0 / 3.0) * (self.p1 - self.p0),
            self.p2 + (2.0 / 3.0) * (self.p1 - self.p2),
            self.p2,
        )
    }

    /// The Green's-theorem area contribution of this segment.
    pub fn signed_area(&self) -> f64 {
        (self.p2.x * (self.p0.y - 2.0 * self.p1.y)
            + 2.0 * self.p1.x * (self.p2.y - self.p0.y)
            + self.p0.x * (2.0 * self.p1.y + self.p2.y))
            / 6.0
    }

    /// Whether the control point deviates from the chord by less than
    /// `epsilon`.
    pub fn is_flat(&self, epsilon: f64) -> bool {
        (signed_distance(self.p1, self.p0, self.p2) / 2.0).abs() < epsilon
    }

    /// The same tangent shape with new endpoints.
    ///
    /// The control point is slid along the original tangent directions
    /// to fit the new chord.
    pub fn endpoints(&self, start: Point, end: Point) -> QuadBez {
        let ad = self.p1 - self.p0;
        let bd = self.p1 - self.p2;

        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let det = bd.x * ad.y - bd.y * ad.x;
        let u = (dy * bd.x - dx * bd.y) / det;
        if !u.is_finite() {
            // degenerate tangents; translate the control point instead
            return QuadBez::new(start, self.p1 + (start - self.p0), end);
        }

        QuadBez::new(start, start + ad * u, end)
    }

    /// The same segment traversed in the opposite direction.
    #[inline]
    pub fn reverse(&self) -> QuadBez {
        QuadBez {
            p0: self.p2,
            p1: self.p1,
            p2: self.p0,
        }
    }

    /// The parameter of the nearest point on the curve, not necessarily
    /// within [0, 1].
    ///
    /// The stationarity condition is a cubic, solved in closed form and
    /// always checked against both endpoint tangent projections.
    pub fn nearest_t(&self, p: Point) -> f64 {
        let qa = self.p0 - p;
        let ab = self.p1 - self.p0;
        let bc = self.p2 - self.p1;
        let qc = self.p2 - p;
        let ac = self.p2 - self.p0;
        let br = (self.p0 - self.p1) + (self.p2 - self.p1);

        let mut min_distance = nonzero_sign(ab.cross(qa)) * qa.hypot();
        let mut param = -qa.dot(ab) / ab.dot(ab);

        let distance = nonzero_sign(bc.cross(qc)) * qc.hypot();
        if distance.abs() < min_distance.abs() {
            min_distance = distance;
            param = ((p - self.p1).dot(bc) / bc.dot(bc)).max(1.0);
        }

        let a = br.dot(br);
        let b = 3.0 * ab.dot(br);
        let c = 2.0 * ab.dot(ab) + qa.dot(br);
        let d = qa.dot(ab);
        for t in solve_cubic(d, c, b, a) {
            if t > 0.0 && t < 1.0 {
                let offset = self.eval(t) - p;
                let distance = nonzero_sign(ac.cross(offset)) * offset.hypot();
                if distance.abs() < min_distance.abs() {
                    min_distance = distance;
                    param = t;
                }
            }
        }

        param
    }

    /// Interior parameters where the tangent reverses along the x or y
    /// axis.
    ///
    /// Splitting at these makes each piece monotone on both axes, which
    /// the bounding-box and ray-counting logic relies on.
    pub fn inflections(&self) -> ArrayVec<f64, 2> {
        const INFLECTION_EPSILON: f64 = 1e-10;

        let mut result = ArrayVec::new();
        let div = (self.p0 - self.p1) + (self.p2 - self.p1);
        if div == Vec2::ZERO {
            return result;
        }
        let v = Vec2::new(
            (self.p0.x - self.p1.x) / div.x,
            (self.p0.y - self.p1.y) / div.y,
        );
        let inside = |n: f64| n > INFLECTION_EPSILON && n < 1.0 - INFLECTION_EPSILON;
        if inside(v.x) {
            result.push(v.x);
        }
        if inside(v.y) {
            result.push(v.y);
        }
        result
    }
}
