// Copyright 2026 the Regio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lines.

use crate::{Point, Rect, Vec2};

/// A single line segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// The line's start point.
    pub p0: Point,
    /// The line's end point.
    pub p1: Point,
}

impl Line {
    /// Create a new line segment.
    #[inline]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Line {
        Line {
            p0: p0.into(),
            p1: p1.into(),
        }
    }

    /// Evaluate the line at parameter `t`, extrapolating beyond [0, 1].
    ///
    /// The endpoints are returned exactly at t = 0 and t = 1.
    pub fn eval(&self, t: f64) -> Point {
        if t == 0.0 {
            self.p0
        } else if t == 1.0 {
            self.p1
        } else {
            self.p0 + (self.p1 - self.p0) * t
        }
    }

    /// The tangent vector, constant along the line.
    #[inline]
    pub fn tangent(&self) -> Vec2 {
        self.p1 - self.p0
    }

    /// Split at parameter `t`.
    ///
    /// # Panics
    ///
    /// If `t` is not within the open interval (0, 1).
    pub fn split(&self, t: f64) -> (Line, Line) {
        assert!(t > 0.0 && t < 1.0, "t must be within (0,1)");
        let mid = self.eval(t);
        (Line::new(self.p0, mid), Line::new(mid, self.p1))
    }

    /// The Green's-theorem area contribution of this segment.
    ///
    /// Summed around a closed ring this gives the signed enclosed area,
    /// negative for clockwise rings.
    #[inline]
    pub fn signed_area(&self) -> f64 {
        self.p0.to_vec2().cross(self.p1.to_vec2()) * 0.5
    }

    /// The parameter of the point on the (unbounded) line nearest to
    /// `p`; not clamped to [0, 1].
    pub fn nearest_t(&self, p: Point) -> f64 {
        let d = self.p1 - self.p0;
        (p - self.p0).dot(d) / d.hypot2()
    }

    /// The same segment with endpoints replaced.
    #[inline]
    pub fn endpoints(&self, start: Point, end: Point) -> Line {
        Line { p0: start, p1: end }
    }

    /// The same segment traversed in the opposite direction.
    #[inline]
    pub fn reverse(&self) -> Line {
        Line {
            p0: self.p1,
            p1: self.p0,
        }
    }

    /// The bounding box of the segment.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.p0, self.p1)
    }
}

#[cfg(test)]
mod tests {
    use super::Line;
    use crate::Point;

    #[test]
    fn eval_endpoints_exact() {
        let l = Line::new((0.1, 0.2), (0.7, 0.9));
        assert_eq!(l.eval(0.0), l.p0);
        assert_eq!(l.eval(1.0), l.p1);
        assert_eq!(l.eval(0.5), Point::new(0.4, 0.55));
    }

    #[test]
    fn nearest_t_is_unclamped() {
        let l = Line::new((0.0, 0.0), (2.0, 0.0));
        assert_eq!(l.nearest_t(Point::new(1.0, 5.0)), 0.5);
        assert_eq!(l.nearest_t(Point::new(4.0, 1.0)), 2.0);
        assert_eq!(l.nearest_t(Point::new(-2.0, -1.0)), -1.0);
    }

    #[test]
    fn split_shares_midpoint() {
        let l = Line::new((0.0, 0.0), (1.0, 3.0));
        let (a, b) = l.split(0.25);
        assert_eq!(a.p1, b.p0);
        assert_eq!(a.p0, l.p0);
        assert_eq!(b.p1, l.p1);
    }

    #[test]
    fn signed_area_closes() {
        // unit square, counter-clockwise
        let sides = [
            Line::new((0.0, 0.0), (1.0, 0.0)),
            Line::new((1.0, 0.0), (1.0, 1.0)),
            Line::new((1.0, 1.0), (0.0, 1.0)),
            Line::new((0.0, 1.0), (0.0, 0.0)),
        ];
        let area: f64 = sides.iter().map(Line::signed_area).sum();
        assert!((area - 1.0).abs() < 1e-15);
    }
}
