// Copyright 2026 the Regio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Robust curve-curve intersections.
//!
//! The fast path is Bézier clipping against "fat lines" (Sederberg):
//! each curve is split at its inflections into monotone segments, and a
//! segment's parameter interval is repeatedly clipped against the convex
//! hull of the other segment's control-point distances to its thickened
//! chord. When clipping stalls the intervals are bisected and requeued,
//! and a blowout of the iteration budget triggers an explicit
//! collinear-overlap check, which is the only way two curves can
//! legitimately defeat the clip.
//!
//! A plain recursive-subdivision engine is kept alongside for
//! verification; it is not the default.

use arrayvec::ArrayVec;
use tracing::trace;

use crate::curve::signed_distance;
use crate::{Curve, Interval, Line, Point};

/// Tolerance for comparing curve parameters.
///
/// Intersection parameters within this distance of 0 or 1 are snapped to
/// the exact bound, and parameter pairs closer than this are merged.
pub const PARAMETRIC_EPSILON: f64 = 1e-6;

/// Tolerance for comparing positions in the plane.
pub const SPATIAL_EPSILON: f64 = 1e-10;

/// The most intersections two non-overlapping curves can have
/// (cubic × cubic).
pub const MAX_INTERSECTIONS: usize = 9;

/// A clip that leaves more than this fraction of the interval makes too
/// little progress and forces a bisection.
const CLIP_STALL_RATIO: f64 = 0.8;

/// Iteration budget for one clipping run. Transversal intersections
/// converge in a handful of iterations each; only (near-)coincident
/// curves exhaust this, which is exactly when the collinear check
/// should take over.
const MAX_CLIP_ITERATIONS: usize = 1024;

/// Sample count for confirming a suspected collinear overlap.
const COLLINEAR_SAMPLES: usize = 8;

/// Relative tolerance on the cross-product denominator below which two
/// lines are treated as parallel.
const PARALLEL_EPSILON: f64 = 1e-9;

/// Snap a parameter to an exact domain bound when it is within
/// `epsilon` of it.
pub(crate) fn round(n: f64, epsilon: f64) -> f64 {
    if n.abs() < epsilon {
        0.0
    } else if (n - 1.0).abs() < epsilon {
        1.0
    } else {
        n
    }
}

/// All intersections between two curves.
///
/// Returns deduplicated `(ta, tb)` pairs in [0, 1]², rounded to
/// [`PARAMETRIC_EPSILON`], at which the curves meet within the spatial
/// tolerance. Coincident spans are reported as their two endpoints.
pub fn intersections(a: &Curve, b: &Curve) -> ArrayVec<(f64, f64), MAX_INTERSECTIONS> {
    let mut raw = Vec::new();

    let eps = SPATIAL_EPSILON;
    if a
        .bounds()
        .inflate(eps, eps)
        .overlaps(b.bounds().inflate(eps, eps))
    {
        match (a, b) {
            (Curve::Line(la), Curve::Line(lb)) => raw.extend(line_line(la, lb)),
            (Curve::Line(la), _) => raw.extend(line_curve(la, b)),
            (_, Curve::Line(lb)) => {
                raw.extend(line_curve(lb, a).into_iter().map(|(s, t)| (t, s)));
            }
            _ => curve_curve(a, b, &mut raw),
        }
    }

    normalize(raw)
}

/// Round, filter to [0, 1]², and deduplicate independently on each
/// parameter axis.
fn normalize(raw: Vec<(f64, f64)>) -> ArrayVec<(f64, f64), MAX_INTERSECTIONS> {
    let mut result = ArrayVec::new();
    for (ta, tb) in raw {
        let ta = round(ta, PARAMETRIC_EPSILON);
        let tb = round(tb, PARAMETRIC_EPSILON);
        if !(0.0..=1.0).contains(&ta) || !(0.0..=1.0).contains(&tb) {
            continue;
        }
        let duplicate = result.iter().any(|&(ua, ub): &(f64, f64)| {
            (ua - ta).abs() < PARAMETRIC_EPSILON || (ub - tb).abs() < PARAMETRIC_EPSILON
        });
        if !duplicate && !result.is_full() {
            result.push((ta, tb));
        }
    }
    result
}

/// Intersection of two line segments as `(ta, tb)` pairs.
///
/// Collinear overlapping lines report the two endpoints of the shared
/// span; parallel non-collinear lines report nothing. The single
/// crossing of non-parallel lines is reported even outside [0, 1] and
/// left to the caller to filter.
fn line_line(a: &Line, b: &Line) -> ArrayVec<(f64, f64), 2> {
    let mut result = ArrayVec::new();
    let av = a.p1 - a.p0;
    let bv = b.p1 - b.p0;

    let d = av.cross(bv);
    if d.abs() <= PARALLEL_EPSILON * av.hypot() * bv.hypot() {
        // near-parallel: the only intersections worth reporting are a
        // collinear overlap
        let tol = collinear_tolerance(a.bounds().union(b.bounds()));
        if signed_distance(b.p0, a.p0, a.p1).abs() <= tol
            && signed_distance(b.p1, a.p0, a.p1).abs() <= tol
        {
            let s0 = a.nearest_t(b.p0);
            let s1 = a.nearest_t(b.p1);
            let lo = s0.min(s1).max(0.0);
            let hi = s0.max(s1).min(1.0);
            if lo <= hi {
                for s in [lo, hi] {
                    let t = b.nearest_t(a.eval(s));
                    result.push((s, t));
                }
            }
        }
        return result;
    }

    let w = b.p0 - a.p0;
    result.push((w.cross(bv) / d, w.cross(av) / d));
    result
}

/// Intersections of a line with any curve, as `(t_line, t_curve)`
/// pairs, unfiltered.
///
/// The curve's signed distance to the line is a polynomial in its own
/// Bernstein basis; its roots are the curve-side parameters.
pub(crate) fn line_curve(l: &Line, c: &Curve) -> ArrayVec<(f64, f64), 3> {
    let mut result = ArrayVec::new();

    if let Curve::Line(lb) = c {
        result.extend(line_line(l, lb));
        return result;
    }

    let d = l.p1 - l.p0;
    let len2 = d.hypot2();
    if len2 < crate::common::EPSILON {
        return result;
    }
    let sd = |p: Point| (p - l.p0).cross(d);

    let mut roots: ArrayVec<f64, 3> = ArrayVec::new();
    match c {
        Curve::Line(_) => unreachable!("handled above"),
        Curve::Quad(q) => {
            let (d0, d1, d2) = (sd(q.p0), sd(q.p1), sd(q.p2));
            roots.extend(crate::common::solve_quadratic(
                d0,
                2.0 * (d1 - d0),
                d0 - 2.0 * d1 + d2,
            ));
        }
        Curve::Cubic(cb) => {
            let (d0, d1, d2, d3) = (sd(cb.p0), sd(cb.p1), sd(cb.p2), sd(cb.p3));
            roots.extend(crate::common::solve_cubic(
                d0,
                3.0 * (d1 - d0),
                3.0 * d0 - 6.0 * d1 + 3.0 * d2,
                -d0 + 3.0 * d1 - 3.0 * d2 + d3,
            ));
        }
    }

    for t in roots {
        let p = c.eval(t);
        let s = (p - l.p0).dot(d) / len2;
        result.push((s, t));
    }
    result
}

/// The monotone parameter intervals of a curve: [0, 1] split at the
/// curve's own inflections.
fn monotone_intervals(c: &Curve) -> Vec<Interval> {
    let mut ts = c.inflections();
    ts.sort_by(f64::total_cmp);
    let mut intervals = Vec::with_capacity(ts.len() + 1);
    let mut lo = 0.0;
    for &t in &ts {
        if t > lo {
            intervals.push(Interval { lo, hi: t });
            lo = t;
        }
    }
    intervals.push(Interval { lo, hi: 1.0 });
    intervals
}

/// The fat-line thickness of a curve around its own chord: closed-form
/// min/max signed control-point deviation, per curve kind.
fn fat_line_width(c: &Curve) -> (f64, f64) {
    match c {
        Curve::Line(_) => (0.0, 0.0),
        Curve::Quad(q) => {
            let d1 = signed_distance(q.p1, q.p0, q.p2) / 2.0;
            (d1.min(0.0), d1.max(0.0))
        }
        Curve::Cubic(cb) => {
            let d1 = signed_distance(cb.p1, cb.p0, cb.p3);
            let d2 = signed_distance(cb.p2, cb.p0, cb.p3);
            let k = if d1 * d2 > 0.0 { 3.0 / 4.0 } else { 4.0 / 9.0 };
            let (d1, d2) = (d1 * k, d2 * k);
            (d1.min(d2).min(0.0), d1.max(d2).max(0.0))
        }
    }
}

/// The convex hull, split into top and bottom chains, of a curve's
/// control-point distances to a line, in (t, distance) space.
fn distance_hull(c: &Curve, l: &Line) -> (Vec<Point>, Vec<Point>) {
    match c {
        Curve::Line(seg) => {
            let p0 = Point::new(0.0, signed_distance(seg.p0, l.p0, l.p1));
            let p1 = Point::new(1.0, signed_distance(seg.p1, l.p0, l.p1));
            (vec![p0, p1], vec![p0, p1])
        }
        Curve::Quad(q) => {
            let d0 = signed_distance(q.p0, l.p0, l.p1);
            let d1 = signed_distance(q.p1, l.p0, l.p1);
            let d2 = signed_distance(q.p2, l.p0, l.p1);

            let p0 = Point::new(0.0, d0);
            let p1 = Point::new(0.5, d1);
            let p2 = Point::new(1.0, d2);
            // vertical signed distance of p1 from [p0, p2]
            let dist1 = d1 - (d0 + d2) / 2.0;

            let mut hull = (vec![p0, p1, p2], vec![p0, p2]);
            if dist1 < 0.0 {
                hull = (hull.1, hull.0);
            }
            hull
        }
        Curve::Cubic(cb) => {
            let d0 = signed_distance(cb.p0, l.p0, l.p1);
            let d1 = signed_distance(cb.p1, l.p0, l.p1);
            let d2 = signed_distance(cb.p2, l.p0, l.p1);
            let d3 = signed_distance(cb.p3, l.p0, l.p1);

            let p0 = Point::new(0.0, d0);
            let p1 = Point::new(1.0 / 3.0, d1);
            let p2 = Point::new(2.0 / 3.0, d2);
            let p3 = Point::new(1.0, d3);
            // vertical signed distances of p1 and p2 from [p0, p3]
            let dist1 = d1 - (2.0 * d0 + d3) / 3.0;
            let dist2 = d2 - (d0 + 2.0 * d3) / 3.0;

            let mut hull = if dist1 * dist2 < 0.0 {
                // p1 and p2 on opposite sides: the hull is a
                // quadrilateral with one middle point in each chain
                (vec![p0, p1, p3], vec![p0, p2, p3])
            } else {
                // same side: triangle or quadrilateral, [p0, p3] is one
                // chain; triangle when one deviation dominates the other
                // by 2x or more
                let a1 = dist1.abs();
                let a2 = dist2.abs();
                if a1 >= 2.0 * a2 {
                    (vec![p0, p1, p3], vec![p0, p3])
                } else if a2 >= 2.0 * a1 {
                    (vec![p0, p2, p3], vec![p0, p3])
                } else {
                    (vec![p0, p1, p2, p3], vec![p0, p3])
                }
            };

            if dist1 < 0.0 || (dist1 == 0.0 && dist2 < 0.0) {
                hull = (hull.1, hull.0);
            }
            hull
        }
    }
}

/// Walk hull edges from the first vertex until the chain crosses
/// `threshold`, returning the crossing abscissa.
fn walk_hull_edges_to_fat_line(
    hull_vertices: &[Point],
    vertices_are_for_top: bool,
    threshold: f64,
) -> Option<f64> {
    for i in 0..hull_vertices.len() - 1 {
        let p = hull_vertices[i];
        let q = hull_vertices[i + 1];
        if (vertices_are_for_top && q.y >= threshold) || (!vertices_are_for_top && q.y <= threshold)
        {
            return if (q.y - threshold).abs() < f64::EPSILON {
                Some(q.x)
            } else {
                Some(p.x + (threshold - p.y) * (q.x - p.x) / (q.y - p.y))
            };
        }
    }
    // the whole hull is beyond the threshold
    None
}

fn walk_hull_start_to_fat_line(
    hull_top: &[Point],
    hull_bottom: &[Point],
    d_min: f64,
    d_max: f64,
) -> Option<f64> {
    let start_corner = hull_top[0];
    if start_corner.y < d_min {
        walk_hull_edges_to_fat_line(hull_top, true, d_min)
    } else if start_corner.y > d_max {
        walk_hull_edges_to_fat_line(hull_bottom, false, d_max)
    } else {
        Some(start_corner.x)
    }
}

/// The parameter range over which the hull stays within the fat line
/// band, or `None` when the hull avoids the band entirely.
fn clip_hull_to_fat_line(
    hull_top: &mut Vec<Point>,
    hull_bottom: &mut Vec<Point>,
    d_min: f64,
    d_max: f64,
) -> Option<(f64, f64)> {
    let t_min = walk_hull_start_to_fat_line(hull_top, hull_bottom, d_min, d_max)?;
    // walk in from the right by reversing both chains
    hull_top.reverse();
    hull_bottom.reverse();
    let t_max = walk_hull_start_to_fat_line(hull_top, hull_bottom, d_min, d_max)?;
    Some((t_min, t_max))
}

/// Absolute tolerance for coincidence checks, scaled to the coordinate
/// magnitude of the input.
fn collinear_tolerance(bounds: crate::Rect) -> f64 {
    let extent = bounds
        .x0
        .abs()
        .max(bounds.y0.abs())
        .max(bounds.x1.abs())
        .max(bounds.y1.abs());
    SPATIAL_EPSILON * (1.0 + extent)
}

/// Check whether two curves share a span, and if so return the two
/// parameter pairs bounding it.
///
/// Endpoint projections propose the span; sampling at fixed increments
/// along it confirms coincidence.
fn collinear_overlap(a: &Curve, b: &Curve) -> Option<[(f64, f64); 2]> {
    let tol = collinear_tolerance(a.bounds().union(b.bounds()));

    let mut candidates: ArrayVec<(f64, f64), 4> = ArrayVec::new();
    for (tb, p) in [(0.0, b.start()), (1.0, b.end())] {
        let ta = a.nearest_t(p).clamp(0.0, 1.0);
        if a.eval(ta).distance(p) <= tol {
            candidates.push((ta, tb));
        }
    }
    for (ta, p) in [(0.0, a.start()), (1.0, a.end())] {
        let tb = b.nearest_t(p).clamp(0.0, 1.0);
        if b.eval(tb).distance(p) <= tol {
            candidates.push((ta, tb));
        }
    }
    if candidates.len() < 2 {
        return None;
    }

    let lo = *candidates
        .iter()
        .min_by(|x, y| x.0.total_cmp(&y.0))
        .unwrap();
    let hi = *candidates
        .iter()
        .max_by(|x, y| x.0.total_cmp(&y.0))
        .unwrap();

    for k in 0..=COLLINEAR_SAMPLES {
        let f = k as f64 / COLLINEAR_SAMPLES as f64;
        let ta = lo.0 + f * (hi.0 - lo.0);
        let tb = lo.1 + f * (hi.1 - lo.1);
        if a.eval(ta).distance(b.eval(tb)) > tol {
            return None;
        }
    }

    Some([lo, hi])
}

/// The clipping loop over pairs of monotone segments.
fn curve_curve(a: &Curve, b: &Curve, acc: &mut Vec<(f64, f64)>) {
    // work items: parameter intervals into the two original curves;
    // `flip` records which original the first interval belongs to, so
    // the clip direction alternates without re-deriving it
    let mut work: Vec<(Interval, Interval, bool)> = Vec::new();
    for ia in monotone_intervals(a) {
        for ib in monotone_intervals(b) {
            work.push((ia, ib, false));
        }
    }

    let mut iterations = 0usize;
    while let Some((i1, i2, flip)) = work.pop() {
        iterations += 1;
        if iterations > MAX_CLIP_ITERATIONS {
            // clipping has degenerated, which in practice means the
            // curves share a span
            trace!("bezier clipping exceeded its iteration budget; checking collinear overlap");
            if let Some(pairs) = collinear_overlap(a, b) {
                acc.clear();
                acc.extend(pairs);
            }
            return;
        }

        let (c1, c2) = if flip { (b, a) } else { (a, b) };
        let push = |acc: &mut Vec<(f64, f64)>, t1: f64, t2: f64| {
            if flip {
                acc.push((t2, t1));
            } else {
                acc.push((t1, t2));
            }
        };

        let s1 = segment(c1, i1);
        let s2 = segment(c2, i2);

        let eps = SPATIAL_EPSILON;
        if !s1
            .bounds()
            .inflate(eps, eps)
            .overlaps(s2.bounds().inflate(eps, eps))
        {
            continue;
        }

        let base1 = s1.baseline();
        let base2 = s2.baseline();

        // a segment clipped down to (nearly) a point is matched against
        // the other curve's nearest position directly
        let degenerate1 = (base1.p1 - base1.p0).hypot2() < crate::common::EPSILON;
        let degenerate2 = (base2.p1 - base2.p0).hypot2() < crate::common::EPSILON;
        if degenerate1 || degenerate2 {
            if degenerate1 && degenerate2 {
                let p1 = s1.eval(0.5);
                let p2 = s2.eval(0.5);
                if p1.distance(p2) <= collinear_tolerance(s1.bounds().union(s2.bounds())) {
                    push(acc, i1.midpoint(), i2.midpoint());
                }
            } else if degenerate1 {
                let p = s1.eval(0.5);
                let local = s2.nearest_t(p).clamp(0.0, 1.0);
                if s2.eval(local).distance(p) <= collinear_tolerance(s2.bounds()) {
                    push(acc, i1.midpoint(), i2.lerp(local));
                }
            } else {
                let p = s2.eval(0.5);
                let local = s1.nearest_t(p).clamp(0.0, 1.0);
                if s1.eval(local).distance(p) <= collinear_tolerance(s1.bounds()) {
                    push(acc, i1.lerp(local), i2.midpoint());
                }
            }
            continue;
        }

        let flat1 = i1.size() <= PARAMETRIC_EPSILON || s1.is_flat(SPATIAL_EPSILON);
        let flat2 = i2.size() <= PARAMETRIC_EPSILON || s2.is_flat(SPATIAL_EPSILON);

        if flat1 && flat2 {
            // both sides straight within tolerance: solve directly on
            // the baselines, then reproject onto the curves, whose
            // parameter speed along a straight baseline need not be
            // uniform
            for (u1, u2) in line_line(&base1, &base2) {
                if (-PARAMETRIC_EPSILON..=1.0 + PARAMETRIC_EPSILON).contains(&u1)
                    && (-PARAMETRIC_EPSILON..=1.0 + PARAMETRIC_EPSILON).contains(&u2)
                {
                    let p = base1.eval(u1);
                    let t1 = match s1 {
                        Curve::Line(_) => u1,
                        _ => s1.nearest_t(p).clamp(0.0, 1.0),
                    };
                    let t2 = match s2 {
                        Curve::Line(_) => u2,
                        _ => s2.nearest_t(p).clamp(0.0, 1.0),
                    };
                    push(acc, i1.lerp(t1), i2.lerp(t2));
                }
            }
            continue;
        }

        // clip segment 2 against segment 1's fat line
        let (d_min, d_max) = fat_line_width(&s1);
        let (mut top, mut bottom) = distance_hull(&s2, &base1);
        let Some((lo, hi)) = clip_hull_to_fat_line(&mut top, &mut bottom, d_min, d_max) else {
            continue;
        };

        let clipped = Interval::new(i2.lerp(lo), i2.lerp(hi));

        if hi - lo > CLIP_STALL_RATIO {
            // stalled: bisect both sides and requeue
            let (a1, b1) = i1.split();
            let (a2, b2) = clipped.split();
            work.push((a2, a1, !flip));
            work.push((a2, b1, !flip));
            work.push((b2, a1, !flip));
            work.push((b2, b1, !flip));
        } else {
            // alternate which side clips which
            work.push((clipped, i1, !flip));
        }
    }
}

/// The subsegment of `c` over `i`, degenerating gracefully for
/// zero-width intervals.
fn segment(c: &Curve, i: Interval) -> Curve {
    if i.size() == 0.0 {
        let p = c.eval(i.lo);
        Curve::line(p, p)
    } else {
        c.subsegment(i.lo..i.hi)
    }
}

/// Plain recursive bounding-box subdivision, kept as a cross-check for
/// the clipping engine.
pub fn subdivision_intersections(a: &Curve, b: &Curve) -> ArrayVec<(f64, f64), MAX_INTERSECTIONS> {
    const MAX_ITEMS: usize = 65536;

    let mut raw = Vec::new();
    let mut work = vec![(Interval::UNIT, Interval::UNIT)];
    let mut processed = 0usize;
    while let Some((ia, ib)) = work.pop() {
        processed += 1;
        if processed > MAX_ITEMS {
            break;
        }
        let sa = segment(a, ia);
        let sb = segment(b, ib);
        let eps = SPATIAL_EPSILON;
        if !sa
            .bounds()
            .inflate(eps, eps)
            .overlaps(sb.bounds().inflate(eps, eps))
        {
            continue;
        }
        if ia.size() <= PARAMETRIC_EPSILON && ib.size() <= PARAMETRIC_EPSILON {
            raw.push((ia.midpoint(), ib.midpoint()));
            continue;
        }
        if ia.size() >= ib.size() {
            let (lo, hi) = ia.split();
            work.push((lo, ib));
            work.push((hi, ib));
        } else {
            let (lo, hi) = ib.split();
            work.push((ia, lo));
            work.push((ia, hi));
        }
    }
    normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::{intersections, subdivision_intersections};
    use crate::Curve;

    fn assert_pairs_on_curves(a: &Curve, b: &Curve, pairs: &[(f64, f64)]) {
        for &(ta, tb) in pairs {
            let d = a.eval(ta).distance(b.eval(tb));
            assert!(d < 1e-6, "pair ({ta}, {tb}) misses by {d}");
        }
    }

    #[test]
    fn line_line_crossing() {
        let a = Curve::line((0.0, 0.0), (2.0, 2.0));
        let b = Curve::line((0.0, 2.0), (2.0, 0.0));
        let hits = intersections(&a, &b);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0], (0.5, 0.5));
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let a = Curve::line((0.0, 0.0), (1.0, 0.0));
        let b = Curve::line((0.0, 1.0), (1.0, 1.0));
        assert!(intersections(&a, &b).is_empty());
    }

    #[test]
    fn collinear_lines_overlap_endpoints() {
        let a = Curve::line((0.0, 0.0), (2.0, 0.0));
        let b = Curve::line((1.0, 0.0), (3.0, 0.0));
        let hits = intersections(&a, &b);
        assert_eq!(hits.len(), 2);
        assert_pairs_on_curves(&a, &b, &hits);
    }

    #[test]
    fn line_quad_two_crossings() {
        let q = Curve::quad((0.0, 0.0), (0.5, 1.0), (1.0, 0.0));
        let l = Curve::line((0.0, 0.25), (1.0, 0.25));
        let hits = intersections(&q, &l);
        assert_eq!(hits.len(), 2);
        assert_pairs_on_curves(&q, &l, &hits);
    }

    #[test]
    fn line_tangent_to_quad() {
        let q = Curve::quad((0.0, 0.0), (0.5, 1.0), (1.0, 0.0));
        let l = Curve::line((0.0, 0.5), (1.0, 0.5));
        let hits = intersections(&q, &l);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].0 - 0.5).abs() < 1e-6);
    }

    #[test]
    fn line_cubic_three_crossings() {
        let c = Curve::cubic((0.2, 0.0), (0.5, 3.0), (0.5, -2.0), (0.8, 1.0));
        let l = Curve::line((0.0, 0.5), (1.0, 0.25));
        let hits = intersections(&c, &l);
        assert_eq!(hits.len(), 3);
        assert_pairs_on_curves(&c, &l, &hits);
    }

    #[test]
    fn quad_quad_crossings() {
        let a = Curve::quad((0.0, 0.0), (0.5, 1.0), (1.0, 0.0));
        let b = Curve::quad((0.0, 0.25), (0.5, -0.25), (1.0, 0.25));
        let hits = intersections(&a, &b);
        assert_eq!(hits.len(), 2);
        assert_pairs_on_curves(&a, &b, &hits);
    }

    #[test]
    fn cubic_cubic_crossings() {
        let a = Curve::cubic((0.0, 0.0), (0.5, 1.0), (0.5, 1.0), (1.0, 0.0));
        let b = Curve::cubic((0.0, 1.0), (0.5, 0.0), (0.5, 0.0), (1.0, 1.0));
        let hits = intersections(&a, &b);
        assert_eq!(hits.len(), 2);
        assert_pairs_on_curves(&a, &b, &hits);
    }

    #[test]
    fn cubic_cubic_four_crossings() {
        let a = Curve::cubic((48.0, 84.0), (104.0, 176.0), (190.0, 37.0), (121.0, 75.0));
        let b = Curve::cubic((68.0, 145.0), (74.0, 6.0), (143.0, 197.0), (138.0, 55.0));
        let hits = intersections(&a, &b);
        assert_eq!(hits.len(), 4);
        assert_pairs_on_curves(&a, &b, &hits);
    }

    #[test]
    fn coincident_curves_report_overlap_span() {
        let a = Curve::cubic((0.0, 0.0), (0.3, -1.0), (0.7, -1.0), (1.0, 0.0));
        let hits = intersections(&a, &a);
        assert_eq!(hits.len(), 2);
        assert!(hits.contains(&(0.0, 0.0)));
        assert!(hits.contains(&(1.0, 1.0)));
    }

    #[test]
    fn partial_overlap_span() {
        let c = Curve::cubic((0.0, 0.0), (0.3, -1.0), (0.7, -1.0), (1.0, 0.0));
        let head = c.subsegment(0.0..0.8);
        let tail = c.subsegment(0.2..1.0);
        let hits = intersections(&head, &tail);
        assert_eq!(hits.len(), 2);
        assert_pairs_on_curves(&head, &tail, &hits);
    }

    #[test]
    fn subdivision_agrees_with_clipping() {
        let a = Curve::quad((0.0, 0.0), (0.5, 1.0), (1.0, 0.0));
        let b = Curve::line((0.0, 0.25), (1.0, 0.25));
        let mut clip = intersections(&a, &b).to_vec();
        let mut subdiv = subdivision_intersections(&a, &b).to_vec();
        clip.sort_by(|x, y| x.0.total_cmp(&y.0));
        subdiv.sort_by(|x, y| x.0.total_cmp(&y.0));
        assert_eq!(clip.len(), subdiv.len());
        for (c, s) in clip.iter().zip(subdiv.iter()) {
            assert!((c.0 - s.0).abs() < 1e-4 && (c.1 - s.1).abs() < 1e-4);
        }
    }

    #[test]
    fn disjoint_curves() {
        let a = Curve::quad((0.0, 0.0), (0.5, 1.0), (1.0, 0.0));
        let b = Curve::quad((3.0, 0.0), (3.5, 1.0), (4.0, 0.0));
        assert!(intersections(&a, &b).is_empty());
    }
}
