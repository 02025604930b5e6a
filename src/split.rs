// Copyright 2026 the Regio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mutual splitting of two regions at their intersections.
//!
//! Every curve of each region is cut at its crossings with the other
//! region, and the cut points are merged into canonical vertices so
//! that both split regions refer to bit-identical points wherever they
//! (nearly) coincide. The canonical vertices become the graph nodes of
//! the boolean recombination in [`clip`](crate::clip).

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::intersect::{PARAMETRIC_EPSILON, SPATIAL_EPSILON};
use crate::sweep::SweepQueue;
use crate::{Curve, Point, Region, Ring};

/// Union-find over an arena of interned points.
///
/// Near-duplicate points from the two regions are merged; the
/// representative of a cluster is its least point in lexicographic
/// (x, y) order, so the choice does not depend on merge order.
pub(crate) struct VertexUnion {
    index: HashMap<(u64, u64), usize>,
    points: Vec<Point>,
    parent: Vec<Option<usize>>,
    root: Vec<bool>,
}

pub(crate) fn point_key(p: Point) -> (u64, u64) {
    // +0.0 collapses the two zero representations
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

impl VertexUnion {
    pub fn new() -> Self {
        VertexUnion {
            index: HashMap::new(),
            points: Vec::new(),
            parent: Vec::new(),
            root: Vec::new(),
        }
    }

    fn intern(&mut self, p: Point) -> usize {
        let key = point_key(p);
        if let Some(&i) = self.index.get(&key) {
            return i;
        }
        let i = self.points.len();
        self.points.push(p);
        self.parent.push(None);
        self.root.push(false);
        self.index.insert(key, i);
        i
    }

    fn find(&mut self, mut i: usize) -> usize {
        while let Some(next) = self.parent[i] {
            i = next;
        }
        i
    }

    /// Merge the clusters of two points; the lesser representative
    /// wins.
    pub fn join(&mut self, a: Point, b: Point) {
        let ia = self.intern(a);
        let ib = self.intern(b);
        let ra = self.find(ia);
        let rb = self.find(ib);
        match self.points[ra].cmp_xy(self.points[rb]) {
            std::cmp::Ordering::Less => {
                self.parent[rb] = Some(ra);
                self.root[ra] = true;
            }
            std::cmp::Ordering::Greater => {
                self.parent[ra] = Some(rb);
                self.root[rb] = true;
            }
            std::cmp::Ordering::Equal => {
                self.root[rb] = true;
            }
        }
    }

    /// The canonical representative of a point; unknown points map to
    /// themselves.
    pub fn canonical(&mut self, p: Point) -> Point {
        match self.index.get(&point_key(p)) {
            Some(&i) => {
                let r = self.find(i);
                self.points[r]
            }
            None => p,
        }
    }

    /// A curve with endpoints snapped to their canonical vertices, or
    /// `None` if snapping collapses it to zero length.
    pub fn adjust_curve(&mut self, c: &Curve) -> Option<Curve> {
        let start = self.canonical(c.start());
        let end = self.canonical(c.end());
        if start == end {
            return None;
        }
        if start == c.start() && end == c.end() {
            Some(*c)
        } else {
            Some(c.endpoints(start, end))
        }
    }

    /// All cluster representatives.
    pub fn roots(&self) -> Vec<Point> {
        (0..self.points.len())
            .filter(|&i| self.root[i] && self.parent[i].is_none())
            .map(|i| self.points[i])
            .collect()
    }
}

/// The two regions re-cut at their mutual intersections, plus the
/// canonical split vertices.
pub(crate) struct SplitResult {
    pub a: Region,
    pub b: Region,
    pub splits: Vec<Point>,
}

struct Entry {
    ring: usize,
    curve: Curve,
}

/// Cut regions `a` and `b` at every curve-pair intersection.
pub(crate) fn split(a: &Region, b: &Region) -> SplitResult {
    let entries = [flatten(a), flatten(b)];

    // one sweep queue per region over curve x-extents; only
    // bounding-box-overlapping pairs are ever intersected
    let mut queues: [SweepQueue<usize>; 2] = [SweepQueue::new(), SweepQueue::new()];
    for (side, entries) in entries.iter().enumerate() {
        for (i, e) in entries.iter().enumerate() {
            queues[side].add(i, e.curve.start().x, e.curve.end().x);
        }
    }

    let mut union = VertexUnion::new();
    let mut params: [Vec<SmallVec<[f64; 4]>>; 2] = [
        vec![SmallVec::new(); entries[0].len()],
        vec![SmallVec::new(); entries[1].len()],
    ];

    loop {
        // advance whichever queue has the earlier pending event; when
        // one side drains, keep consuming the other so every curve is
        // visited
        let side = if queues[0].peek_key() <= queues[1].peek_key() {
            0
        } else {
            1
        };
        let (side, taken) = match queues[side].take() {
            Some(taken) => (side, taken),
            None => match queues[1 - side].take() {
                Some(taken) => (1 - side, taken),
                None => break,
            },
        };

        let taken = *queues[side].value(taken);
        let taken_curve = entries[side][taken].curve;
        let others: Vec<usize> = {
            let queue = &queues[1 - side];
            queue.active().map(|handle| *queue.value(handle)).collect()
        };
        for other in others {
            let other_curve = entries[1 - side][other].curve;
            for (t0, t1) in taken_curve.intersections(&other_curve) {
                params[side][taken].push(t0);
                params[1 - side][other].push(t1);
                union.join(taken_curve.eval(t0), other_curve.eval(t1));
            }
        }
    }

    // merge near-duplicate parameters into canonical vertices
    let deduped: [Vec<SmallVec<[f64; 4]>>; 2] = [
        dedupe_side(&entries[0], &params[0], &mut union),
        dedupe_side(&entries[1], &params[1], &mut union),
    ];

    let result_a = rebuild(a, &entries[0], &deduped[0], &mut union);
    let result_b = rebuild(b, &entries[1], &deduped[1], &mut union);

    SplitResult {
        a: result_a,
        b: result_b,
        splits: union.roots(),
    }
}

fn flatten(region: &Region) -> Vec<Entry> {
    let mut entries = Vec::new();
    for (ring, r) in region.rings().iter().enumerate() {
        for &curve in r.curves() {
            entries.push(Entry { ring, curve });
        }
    }
    entries
}

fn dedupe_side(
    entries: &[Entry],
    params: &[SmallVec<[f64; 4]>],
    union: &mut VertexUnion,
) -> Vec<SmallVec<[f64; 4]>> {
    entries
        .iter()
        .zip(params)
        .map(|(e, ts)| dedupe(&e.curve, ts, union))
        .collect()
}

/// Drop split parameters that (within the parametric or spatial
/// tolerance) coincide with an already-kept parameter or with the
/// curve's endpoints, joining the dropped position with its survivor.
fn dedupe(c: &Curve, ts: &SmallVec<[f64; 4]>, union: &mut VertexUnion) -> SmallVec<[f64; 4]> {
    let mut ts: SmallVec<[f64; 4]> = ts.clone();
    ts.sort_by(f64::total_cmp);

    let mut result: SmallVec<[f64; 4]> = SmallVec::new();
    for &t1 in &ts {
        let t0 = result.last().copied().unwrap_or(0.0);
        if (t0 - t1).abs() < PARAMETRIC_EPSILON
            || c.eval(t0).is_near(c.eval(t1), SPATIAL_EPSILON)
        {
            union.join(c.eval(t0), c.eval(t1));
        } else if (t1 - 1.0).abs() < PARAMETRIC_EPSILON
            || c.eval(t1).is_near(c.end(), SPATIAL_EPSILON)
        {
            union.join(c.eval(t1), c.end());
        } else {
            result.push(t1);
        }
    }
    result
}

fn rebuild(
    region: &Region,
    entries: &[Entry],
    params: &[SmallVec<[f64; 4]>],
    union: &mut VertexUnion,
) -> Region {
    let ring_count = region.rings().len();
    let mut ring_curves: Vec<Vec<Curve>> = vec![Vec::new(); ring_count];

    for (e, ts) in entries.iter().zip(params) {
        for piece in e.curve.split_at(ts) {
            // snapping can collapse a piece to nothing; drop it
            if let Some(adjusted) = union.adjust_curve(&piece) {
                ring_curves[e.ring].push(adjusted);
            }
        }
    }

    let rings: Vec<Ring> = ring_curves
        .into_iter()
        .filter_map(|curves| Ring::new(curves).ok())
        .collect();
    Region::new(rings)
}

#[cfg(test)]
mod tests {
    use super::{split, VertexUnion};
    use crate::{Curve, Point, Region, Ring};

    fn square_at(x: f64, y: f64, size: f64) -> Region {
        Ring::new(vec![
            Curve::line((x, y), (x + size, y)),
            Curve::line((x + size, y), (x + size, y + size)),
            Curve::line((x + size, y + size), (x, y + size)),
            Curve::line((x, y + size), (x, y)),
        ])
        .unwrap()
        .region()
    }

    #[test]
    fn union_find_prefers_least_point() {
        let mut u = VertexUnion::new();
        let a = Point::new(1.0, 0.0);
        let b = Point::new(0.0, 5.0);
        let c = Point::new(0.0, 1.0);
        u.join(a, b);
        assert_eq!(u.canonical(a), b);
        u.join(b, c);
        assert_eq!(u.canonical(a), c);
        assert_eq!(u.canonical(b), c);
        assert_eq!(u.roots(), vec![c]);
    }

    #[test]
    fn canonical_of_unknown_point_is_identity() {
        let mut u = VertexUnion::new();
        let p = Point::new(3.0, 4.0);
        assert_eq!(u.canonical(p), p);
    }

    #[test]
    fn overlapping_squares_split_at_two_vertices() {
        let a = square_at(0.0, 0.0, 2.0);
        let b = square_at(1.0, 1.0, 2.0);
        let result = split(&a, &b);

        // the boundaries cross at (2, 1) and (1, 2)
        assert_eq!(result.splits.len(), 2);
        assert!(result.splits.contains(&Point::new(2.0, 1.0)));
        assert!(result.splits.contains(&Point::new(1.0, 2.0)));

        // each square gained exactly two cuts
        let count = |r: &Region| r.rings()[0].curves().len();
        assert_eq!(count(&result.a), 6);
        assert_eq!(count(&result.b), 6);

        // both split regions still cover the same area
        assert!((result.a.area() - 4.0).abs() < 1e-9);
        assert!((result.b.area() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_regions_split_nowhere() {
        let a = square_at(0.0, 0.0, 1.0);
        let b = square_at(5.0, 0.0, 1.0);
        let result = split(&a, &b);
        assert!(result.splits.is_empty());
        assert_eq!(result.a.rings()[0].curves().len(), 4);
        assert_eq!(result.b.rings()[0].curves().len(), 4);
    }

    #[test]
    fn identical_regions_share_all_vertices() {
        let a = square_at(0.0, 0.0, 1.0);
        let result = split(&a, &a.clone());
        // every corner becomes a canonical vertex, no curve is cut
        assert_eq!(result.splits.len(), 4);
        assert_eq!(result.a.rings()[0].curves().len(), 4);
    }
}
