// Copyright 2026 the Regio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A closed loop of curves.

use crate::intersect::{line_curve, round, PARAMETRIC_EPSILON, SPATIAL_EPSILON};
use crate::{Curve, Error, Line, Point, Rect, Region};

/// The verdict of a point-membership test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Membership {
    /// The point is outside.
    Outside,
    /// The point is strictly interior.
    Inside,
    /// The point lies on the boundary; the carrying curve is reported
    /// so boolean classification can compare directions.
    OnEdge(Curve),
}

impl Membership {
    /// Whether the point is inside or on the boundary.
    #[inline]
    pub fn is_inside(&self) -> bool {
        !matches!(self, Membership::Outside)
    }
}

/// A closed, cyclically-ordered loop of curves.
///
/// Every curve is pre-split at its own inflections, so each stored
/// segment is monotone on both axes; the membership test and the
/// intersection pruning rely on that. Endpoints are welded so that
/// `curves[i].end() == curves[i + 1].start()` exactly, wrapping around;
/// an unclosed input is force-closed.
#[derive(Clone, Debug)]
pub struct Ring {
    curves: Vec<Curve>,
    curve_bounds: Vec<Rect>,
    bounds: Rect,
    area: f64,
    clockwise: bool,
}

impl Ring {
    /// Build a ring from an ordered curve list.
    ///
    /// Curves are split at their inflections and welded end-to-start.
    /// Returns [`Error::EmptyRing`] for an empty list.
    pub fn new(curves: Vec<Curve>) -> Result<Ring, Error> {
        if curves.is_empty() {
            return Err(Error::EmptyRing);
        }
        Ok(Self::build(curves))
    }

    fn build(curves: Vec<Curve>) -> Ring {
        let mut split = Vec::with_capacity(curves.len());
        let mut signed_area = 0.0;
        let mut bounds: Option<Rect> = None;
        for c in &curves {
            for piece in c.split_at(&c.inflections()) {
                // monotone pieces: endpoint bounds are tight
                let b = Rect::from_points(piece.start(), piece.end());
                bounds = Some(match bounds {
                    Some(acc) => acc.union(b),
                    None => b,
                });
                signed_area += piece.signed_area();
                split.push(piece);
            }
        }

        // weld each curve's end to the next curve's start; starts are
        // never touched, so order does not matter
        let len = split.len();
        for i in 0..len {
            let next_start = split[(i + 1) % len].start();
            if split[i].end() != next_start {
                split[i] = split[i].endpoints(split[i].start(), next_start);
            }
        }

        let curve_bounds = split.iter().map(Curve::bounds).collect();
        Ring {
            curves: split,
            curve_bounds,
            bounds: bounds.unwrap_or(Rect::ZERO),
            area: signed_area.abs(),
            clockwise: signed_area < 0.0,
        }
    }

    /// The unit square from (0, 0) to (1, 1), wound counter-clockwise.
    pub fn square() -> Ring {
        Self::build(vec![
            Curve::line((0.0, 0.0), (1.0, 0.0)),
            Curve::line((1.0, 0.0), (1.0, 1.0)),
            Curve::line((1.0, 1.0), (0.0, 1.0)),
            Curve::line((0.0, 1.0), (0.0, 0.0)),
        ])
    }

    /// A unit-radius circle approximation centered at the origin, wound
    /// counter-clockwise.
    pub fn circle() -> Ring {
        // kappa: cubic control offset best approximating a quarter arc
        let k = 4.0 / 3.0 * (2.0_f64.sqrt() - 1.0);
        Self::build(vec![
            Curve::cubic((1.0, 0.0), (1.0, k), (k, 1.0), (0.0, 1.0)),
            Curve::cubic((0.0, 1.0), (-k, 1.0), (-1.0, k), (-1.0, 0.0)),
            Curve::cubic((-1.0, 0.0), (-1.0, -k), (-k, -1.0), (0.0, -1.0)),
            Curve::cubic((0.0, -1.0), (k, -1.0), (1.0, -k), (1.0, 0.0)),
        ])
    }

    /// The ring's curves, in cyclic order.
    #[inline]
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    /// The bounding box of the ring.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The absolute enclosed area.
    #[inline]
    pub fn area(&self) -> f64 {
        self.area
    }

    /// The signed enclosed area, negative for clockwise rings.
    #[inline]
    pub fn signed_area(&self) -> f64 {
        if self.clockwise {
            -self.area
        } else {
            self.area
        }
    }

    /// Whether the ring is wound clockwise. Clockwise rings denote
    /// holes within a [`Region`].
    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.clockwise
    }

    /// The same loop traversed in the opposite direction.
    pub fn reverse(&self) -> Ring {
        let curves: Vec<Curve> = self.curves.iter().rev().map(Curve::reverse).collect();
        let curve_bounds = self.curve_bounds.iter().rev().copied().collect();
        Ring {
            curves,
            curve_bounds,
            bounds: self.bounds,
            area: self.area,
            clockwise: !self.clockwise,
        }
    }

    /// This ring as a single-boundary region.
    pub fn region(&self) -> Region {
        Region::new(vec![self.clone()])
    }

    /// Cast a rightward ray and classify `p` against the ring.
    ///
    /// Since the curves are split at inflections, a non-horizontal
    /// curve can cross the ray at most once, so most crossings are
    /// decided from the bounding box alone; only curves whose box
    /// straddles `p` pay for a real line-curve intersection. A ray
    /// parameter of exactly zero means `p` sits on that curve.
    pub fn test(&self, p: Point) -> Membership {
        if !self
            .bounds
            .inflate(SPATIAL_EPSILON, SPATIAL_EPSILON)
            .contains(p)
        {
            return Membership::Outside;
        }

        let ray = Line::new(p, Point::new(self.bounds.x1 + 1.0, p.y));
        let mut count = 0;

        for (c, b) in self.curves.iter().zip(&self.curve_bounds) {
            let flat = b.height() == 0.0;

            if p.x < b.x0 {
                // strictly to our right: crosses iff the vertical range
                // straddles the ray, half-open to avoid double counts
                // at shared vertices
                if p.y >= b.y0 && p.y < b.y1 {
                    count += 1;
                }
            } else if b.inflate(SPATIAL_EPSILON, 0.0).contains(p) {
                let hit = line_curve(&ray, c)
                    .into_iter()
                    .map(|(s, t)| (round(s, PARAMETRIC_EPSILON), round(t, PARAMETRIC_EPSILON)))
                    .filter(|&(s, t)| (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t))
                    .min_by(|x, y| x.0.total_cmp(&y.0));

                if let Some((s, _)) = hit {
                    if s == 0.0 {
                        return Membership::OnEdge(*c);
                    } else if !flat && p.y < b.y1 {
                        count += 1;
                    }
                }
            }
        }

        if count % 2 == 1 {
            Membership::Inside
        } else {
            Membership::Outside
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Membership, Ring};
    use crate::{Curve, Point};

    #[test]
    fn square_winding_and_area() {
        let square = Ring::square();
        assert!(!square.is_clockwise());
        assert!((square.signed_area() - 1.0).abs() < 1e-12);

        let reversed = square.reverse();
        assert!(reversed.is_clockwise());
        assert!((reversed.signed_area() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn circle_area_approximates_pi() {
        let circle = Ring::circle();
        assert!(!circle.is_clockwise());
        assert!((circle.signed_area() - std::f64::consts::PI).abs() < 1e-3);
    }

    #[test]
    fn ring_welds_unclosed_input() {
        let ring = Ring::new(vec![
            Curve::line((0.0, 0.0), (1.0, 0.0)),
            Curve::line((1.0, 0.0), (0.5, 1.0)),
            // gap back to the start: force-closed
            Curve::line((0.5, 1.0), (0.1, 0.1)),
        ])
        .unwrap();
        let curves = ring.curves();
        for i in 0..curves.len() {
            assert_eq!(curves[i].end(), curves[(i + 1) % curves.len()].start());
        }
    }

    #[test]
    fn empty_ring_is_an_error() {
        assert!(Ring::new(Vec::new()).is_err());
    }

    #[test]
    fn membership_square() {
        let square = Ring::square();
        assert_eq!(square.test(Point::new(0.5, 0.5)), Membership::Inside);
        assert_eq!(square.test(Point::new(1.5, 0.5)), Membership::Outside);
        assert_eq!(square.test(Point::new(-0.5, 0.5)), Membership::Outside);
        assert_eq!(square.test(Point::new(0.5, -0.5)), Membership::Outside);
        assert!(matches!(
            square.test(Point::new(0.0, 0.5)),
            Membership::OnEdge(_)
        ));
        assert!(matches!(
            square.test(Point::new(0.5, 0.0)),
            Membership::OnEdge(_)
        ));
    }

    #[test]
    fn membership_circle() {
        let circle = Ring::circle();
        assert_eq!(circle.test(Point::new(0.0, 0.0)), Membership::Inside);
        assert_eq!(circle.test(Point::new(0.5, 0.5)), Membership::Inside);
        assert_eq!(circle.test(Point::new(0.9, 0.9)), Membership::Outside);
        assert_eq!(circle.test(Point::new(1.5, 0.0)), Membership::Outside);
    }

    #[test]
    fn membership_invariant_under_cyclic_relabeling() {
        let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let probes = [
            Point::new(0.5, 0.5),
            Point::new(0.25, 0.75),
            Point::new(1.2, 0.4),
            Point::new(-0.2, 0.4),
        ];
        for offset in 0..4 {
            let mut curves = Vec::new();
            for i in 0..4 {
                let a = corners[(i + offset) % 4];
                let b = corners[(i + offset + 1) % 4];
                curves.push(Curve::line(a, b));
            }
            let ring = Ring::new(curves).unwrap();
            for p in probes {
                assert_eq!(ring.test(p).is_inside(), Ring::square().test(p).is_inside());
            }
        }
    }

    #[test]
    fn membership_counts_above_vertex_once() {
        // a probe horizontally aligned with a vertex between two edges
        let ring = Ring::new(vec![
            Curve::line((0.0, 0.0), (2.0, 0.0)),
            Curve::line((2.0, 0.0), (2.0, 1.0)),
            Curve::line((2.0, 1.0), (1.0, 0.5)),
            Curve::line((1.0, 0.5), (0.0, 1.0)),
            Curve::line((0.0, 1.0), (0.0, 0.0)),
        ])
        .unwrap();
        // ray through y = 0.5 passes the vertex at (1.0, 0.5)
        assert!(ring.test(Point::new(0.5, 0.5)).is_inside());
        assert!(!ring.test(Point::new(2.5, 0.5)).is_inside());
    }
}
