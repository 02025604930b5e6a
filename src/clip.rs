// Copyright 2026 the Regio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boolean recombination of split regions.
//!
//! After [`split`](crate::split) has cut both regions at their mutual
//! intersections, each ring is partitioned into arcs between canonical
//! vertices, arcs are kept or dropped according to the operation, and
//! the kept arcs are reassembled into rings by extracting simple cycles
//! from a directed multigraph. A repair pass reconnects dangling
//! vertices when tangential touches or numerical near-misses leave the
//! graph unbalanced; arcs that still cannot be placed are dropped, so a
//! degenerate operation degrades to a best-effort region instead of
//! failing.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::graph::Digraph;
use crate::split::{self, point_key};
use crate::{Curve, Interval, Membership, Point, Region, Ring};

/// A boolean set operation on two regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoolOp {
    /// Everything in either region.
    Union,
    /// Everything in both regions.
    Intersection,
    /// Everything in the first region but not the second.
    Difference,
}

/// Orderings of more than this many dangling vertices are sampled
/// randomly instead of enumerated.
const EXHAUSTIVE_PERMUTATION_LIMIT: usize = 4;

/// How many random orderings the repair fallback tries.
const MAX_PERMUTATION_SAMPLES: usize = 32;

/// A maximal run of a ring's curves between two canonical vertices.
///
/// Length and area are cached at construction; the length is the sum
/// of chord lengths, which is all the repair heuristics need.
#[derive(Clone, Debug)]
struct Arc {
    curves: Vec<Curve>,
    length: f64,
    area: f64,
}

impl Arc {
    fn new(curves: Vec<Curve>) -> Arc {
        let length = curves.iter().map(|c| (c.end() - c.start()).hypot()).sum();
        let area = curves.iter().map(Curve::signed_area).sum();
        Arc {
            curves,
            length,
            area,
        }
    }

    fn head(&self) -> Point {
        self.curves[0].start()
    }

    fn tail(&self) -> Point {
        self.curves[self.curves.len() - 1].end()
    }

    fn reverse(&self) -> Arc {
        Arc::new(self.curves.iter().rev().map(Curve::reverse).collect())
    }

    /// The position at fraction `t` of the arc's chord length.
    fn position(&self, t: f64) -> Point {
        let threshold = self.length * t;
        let mut offset = 0.0;
        for c in &self.curves {
            let l = (c.end() - c.start()).hypot();
            let span = Interval {
                lo: offset,
                hi: offset + l,
            };
            if span.contains(threshold) {
                return c.eval(span.normalize(threshold));
            }
            offset = span.hi;
        }
        self.tail()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ArcClass {
    Outside,
    Inside,
    SameEdge,
    DiffEdge,
}

/// Which vertical half of its ring a curve runs along, decided by the
/// sign of its horizontal span.
fn is_top(c: &Curve) -> bool {
    let delta = c.end().x - c.start().x;
    if delta == 0.0 {
        c.end().y > c.start().y
    } else {
        delta < 0.0
    }
}

/// Classify an arc by testing its midpoint against the other region.
fn classify(region: &Region, arc: &Arc) -> ArcClass {
    match region.test(arc.position(0.5)) {
        Membership::Outside => ArcClass::Outside,
        Membership::Inside => ArcClass::Inside,
        Membership::OnEdge(curve) => {
            if is_top(&arc.curves[0]) == is_top(&curve) {
                ArcClass::SameEdge
            } else {
                ArcClass::DiffEdge
            }
        }
    }
}

fn keep_a(op: BoolOp, class: ArcClass) -> bool {
    match op {
        BoolOp::Union => matches!(class, ArcClass::Outside | ArcClass::SameEdge),
        BoolOp::Intersection => matches!(class, ArcClass::Inside | ArcClass::SameEdge),
        BoolOp::Difference => matches!(class, ArcClass::Outside | ArcClass::DiffEdge),
    }
}

fn keep_b(op: BoolOp, class: ArcClass) -> bool {
    match op {
        BoolOp::Union => class == ArcClass::Outside,
        BoolOp::Intersection | BoolOp::Difference => class == ArcClass::Inside,
    }
}

/// Cut the rings of a region into arcs at the given vertices.
///
/// A ring touching no vertex at all becomes a single closed-loop arc.
fn partition(region: &Region, vertices: &std::collections::HashSet<(u64, u64)>) -> Vec<Arc> {
    let mut result = Vec::new();
    for ring in region.rings() {
        let cs = ring.curves();
        let is_vertex = |c: &Curve| vertices.contains(&point_key(c.start()));

        match cs.iter().position(is_vertex) {
            None => result.push(Arc::new(cs.to_vec())),
            Some(offset) => {
                let mut acc: Vec<Curve> = Vec::new();
                for c in &cs[offset..] {
                    if is_vertex(c) {
                        if !acc.is_empty() {
                            result.push(Arc::new(acc));
                        }
                        acc = vec![*c];
                    } else {
                        acc.push(*c);
                    }
                }
                acc.extend_from_slice(&cs[..offset]);
                if !acc.is_empty() {
                    result.push(Arc::new(acc));
                }
            }
        }
    }
    result
}

/// Perform a boolean operation on two regions.
pub(crate) fn operation<R: Rng>(ra: &Region, rb: &Region, op: BoolOp, rng: &mut R) -> Region {
    let split = split::split(ra, rb);
    let vertices: std::collections::HashSet<(u64, u64)> =
        split.splits.iter().map(|p| point_key(*p)).collect();

    let pa = partition(&split.a, &vertices);
    let mut pb = partition(&split.b, &vertices);
    if op == BoolOp::Difference {
        pb = pb.iter().map(Arc::reverse).collect();
    }

    let a_count = pa.len();
    let arcs: Vec<Arc> = pa.into_iter().chain(pb).collect();

    let mut kept: Vec<bool> = Vec::with_capacity(arcs.len());
    for (i, arc) in arcs.iter().enumerate() {
        let keep = if i < a_count {
            keep_a(op, classify(&split.b, arc))
        } else {
            keep_b(op, classify(&split.a, arc))
        };
        kept.push(keep);
    }

    // intern arc endpoints as graph vertices
    let mut vert_index: HashMap<(u64, u64), usize> = HashMap::new();
    let mut vert_count = 0usize;
    let mut intern = |p: Point| -> usize {
        *vert_index.entry(point_key(p)).or_insert_with(|| {
            let i = vert_count;
            vert_count += 1;
            i
        })
    };
    let ends: Vec<(usize, usize)> = arcs
        .iter()
        .map(|arc| (intern(arc.head()), intern(arc.tail())))
        .collect();

    let mut result_rings: Vec<Ring> = Vec::new();
    let mut consumed = vec![false; arcs.len()];

    // first pass extracts cycles from the kept arcs; if arcs remain the
    // second pass repairs the graph and extracts once more
    for pass in 0..2 {
        let mut graph = build_graph(vert_count, &arcs, &ends, &kept, &consumed);

        if pass == 1 {
            let unused: Vec<usize> = (0..arcs.len())
                .filter(|&i| !kept[i] && !consumed[i])
                .collect();
            debug!(unused = unused.len(), "repairing unbalanced boolean graph");
            for path in repair(&graph, &arcs, &ends, &unused, rng) {
                for id in path {
                    // toggle membership: add unused arcs, retract kept ones
                    kept[id] = !kept[id];
                }
            }
            graph = build_graph(vert_count, &arcs, &ends, &kept, &consumed);
        }

        // every simple cycle, expanded into every parallel-arc choice,
        // largest enclosed area first so outer boundaries win over holes
        let mut candidates: Vec<Vec<usize>> = Vec::new();
        for cycle in graph.cycles() {
            let edge_sets: Vec<&Vec<usize>> = cycle
                .windows(2)
                .filter_map(|w| graph.edge(w[0], w[1]))
                .collect();
            if edge_sets.len() + 1 == cycle.len() {
                candidates.extend(combinations(&edge_sets));
            }
        }
        let area = |cand: &Vec<usize>| cand.iter().map(|&id| arcs[id].area).sum::<f64>().abs();
        candidates.sort_by(|x, y| area(y).total_cmp(&area(x)));

        for cand in candidates {
            if cand.iter().any(|&id| consumed[id]) {
                continue;
            }
            for &id in &cand {
                consumed[id] = true;
            }
            let curves: Vec<Curve> = cand
                .iter()
                .flat_map(|&id| arcs[id].curves.iter().copied())
                .collect();
            if let Ok(ring) = Ring::new(curves) {
                result_rings.push(ring);
            }
        }

        if !(0..arcs.len()).any(|i| kept[i] && !consumed[i]) {
            break;
        }
    }

    let leftover = (0..arcs.len()).filter(|&i| kept[i] && !consumed[i]).count();
    if leftover > 0 {
        // tangential or nearly-tangential input can leave arcs that no
        // cycle can absorb; they are dropped and the operation returns
        // what could be assembled
        debug!(leftover, "dropping unresolved arcs after repair pass");
    }

    Region::new(result_rings)
}

fn build_graph(
    vert_count: usize,
    arcs: &[Arc],
    ends: &[(usize, usize)],
    kept: &[bool],
    consumed: &[bool],
) -> Digraph<Vec<usize>> {
    let mut graph: Digraph<Vec<usize>> = Digraph::new(vert_count);
    for id in 0..arcs.len() {
        if kept[id] && !consumed[id] {
            graph.link(ends[id].0, ends[id].1, vec![id], |set, inc| set.extend(inc));
        }
    }
    graph
}

/// Cartesian product of the parallel-arc sets along a cycle.
fn combinations(sets: &[&Vec<usize>]) -> Vec<Vec<usize>> {
    let mut result: Vec<Vec<usize>> = vec![Vec::new()];
    for set in sets {
        let mut next = Vec::with_capacity(result.len() * set.len());
        for combo in &result {
            for &id in set.iter() {
                let mut c = combo.clone();
                c.push(id);
                next.push(c);
            }
        }
        result = next;
    }
    result
}

/// Find paths of arcs that reconnect the kept graph's dangling
/// vertices, using unused arcs forward and kept arcs in reverse (a
/// reversed kept arc on a path retracts it).
fn repair<R: Rng>(
    graph: &Digraph<Vec<usize>>,
    arcs: &[Arc],
    ends: &[(usize, usize)],
    unused: &[usize],
    rng: &mut R,
) -> Vec<Vec<usize>> {
    let n = graph.vertex_count();
    let shorter = |existing: &mut usize, incoming: usize| {
        if arcs[incoming].length < arcs[*existing].length {
            *existing = incoming;
        }
    };

    let mut search: Digraph<usize> = Digraph::new(n);
    for &id in unused {
        search.link(ends[id].0, ends[id].1, id, shorter);
    }
    for v in 0..n {
        for (w, set) in graph.out_edges(v) {
            let id = *set
                .iter()
                .min_by(|x, y| arcs[**x].length.total_cmp(&arcs[**y].length))
                .unwrap();
            search.link(*w, v, id, shorter);
        }
    }

    // dangling: vertices of the kept graph missing one direction
    let sources: Vec<usize> = (0..n)
        .filter(|&v| graph.touches(v) && graph.out_degree(v) == 0)
        .collect();
    let sinks: Vec<usize> = (0..n)
        .filter(|&v| graph.touches(v) && graph.in_degree(v) == 0)
        .collect();

    let weight = |id: &usize| arcs[*id].length;

    // greedy: repeatedly connect the globally closest source/sink pair
    let mut curr_sources = sources.clone();
    let mut curr_sinks = sinks.clone();
    let mut result: Vec<Vec<usize>> = Vec::new();
    while !curr_sources.is_empty() && !curr_sinks.is_empty() {
        let path = search.shortest_path(&curr_sources, |v| sinks.contains(&v), weight);
        match path {
            Some(p) if curr_sinks.contains(p.last().unwrap()) => {
                curr_sources.retain(|v| v != p.first().unwrap());
                curr_sinks.retain(|v| v != p.last().unwrap());
                result.push(path_arcs(&search, &p));
            }
            // the search reached an already-claimed sink: greedy is not
            // enough, fall through to ordered pairing
            _ => break,
        }
    }
    if curr_sources.is_empty() || curr_sinks.is_empty() {
        return result;
    }

    let mut best: Option<(f64, Vec<Vec<usize>>)> = None;
    for ordering in orderings(&sources, rng) {
        if let Some(paths) = greedy_pairing(&search, &ordering, &sinks, weight) {
            let total: f64 = paths
                .iter()
                .flat_map(|p| p.iter())
                .map(|&id| arcs[id].length)
                .sum();
            if best.as_ref().map_or(true, |(b, _)| total < *b) {
                best = Some((total, paths));
            }
        }
    }
    match best {
        Some((_, paths)) => paths,
        None => {
            debug!("repair pairing failed for every ordering; keeping partial repair");
            result
        }
    }
}

/// Pair each source, in the given order, with its nearest unclaimed
/// sink; `None` when any source cannot reach one.
fn greedy_pairing(
    search: &Digraph<usize>,
    ordered_sources: &[usize],
    sinks: &[usize],
    weight: impl Fn(&usize) -> f64 + Copy,
) -> Option<Vec<Vec<usize>>> {
    let mut remaining: Vec<usize> = sinks.to_vec();
    let mut result = Vec::new();
    for &v in ordered_sources {
        let path = search.shortest_path(&[v], |x| remaining.contains(&x), weight)?;
        remaining.retain(|x| x != path.last().unwrap());
        result.push(path_arcs(search, &path));
    }
    Some(result)
}

fn path_arcs(search: &Digraph<usize>, path: &[usize]) -> Vec<usize> {
    path.windows(2)
        .filter_map(|w| search.edge(w[0], w[1]).copied())
        .collect()
}

/// Orderings to try for repair pairing: exhaustive for small sets,
/// bounded random samples beyond.
fn orderings<R: Rng>(values: &[usize], rng: &mut R) -> Vec<Vec<usize>> {
    if values.len() <= EXHAUSTIVE_PERMUTATION_LIMIT {
        let mut result = Vec::new();
        let mut scratch = values.to_vec();
        permute(&mut scratch, 0, &mut result);
        result
    } else {
        (0..MAX_PERMUTATION_SAMPLES)
            .map(|_| {
                let mut sample = values.to_vec();
                sample.shuffle(rng);
                sample
            })
            .collect()
    }
}

fn permute(values: &mut Vec<usize>, k: usize, result: &mut Vec<Vec<usize>>) {
    if k == values.len() {
        result.push(values.clone());
        return;
    }
    for i in k..values.len() {
        values.swap(k, i);
        permute(values, k + 1, result);
        values.swap(k, i);
    }
}

#[cfg(test)]
mod tests {
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

    fn circle_at(x: f64, y: f64) -> Region {
        let k = 4.0 / 3.0 * (2.0_f64.sqrt() - 1.0);
        Ring::new(vec![
            Curve::cubic((x + 1.0, y), (x + 1.0, y + k), (x + k, y + 1.0), (x, y + 1.0)),
            Curve::cubic((x, y + 1.0), (x - k, y + 1.0), (x - 1.0, y + k), (x - 1.0, y)),
            Curve::cubic((x - 1.0, y), (x - 1.0, y - k), (x - k, y - 1.0), (x, y - 1.0)),
            Curve::cubic((x, y - 1.0), (x + k, y - 1.0), (x + 1.0, y - k), (x + 1.0, y)),
        ])
        .unwrap()
        .region()
    }

    const AREA_EPSILON: f64 = 1e-4;

    #[test]
    fn union_of_overlapping_squares() {
        let a = square_at(0.0, 0.0, 2.0);
        let b = square_at(1.0, 1.0, 2.0);
        let u = a.union(&b);
        assert_eq!(u.rings().len(), 1);
        assert!((u.area() - 7.0).abs() < AREA_EPSILON, "area {}", u.area());
        assert!(u.contains(Point::new(0.5, 0.5)));
        assert!(u.contains(Point::new(2.5, 2.5)));
        assert!(!u.contains(Point::new(2.5, 0.5)));
    }

    #[test]
    fn intersection_of_overlapping_squares() {
        let a = square_at(0.0, 0.0, 2.0);
        let b = square_at(1.0, 1.0, 2.0);
        let i = a.intersection(&b);
        assert_eq!(i.rings().len(), 1);
        assert!((i.area() - 1.0).abs() < AREA_EPSILON);
        assert!(i.contains(Point::new(1.5, 1.5)));
        assert!(!i.contains(Point::new(0.5, 0.5)));
    }

    #[test]
    fn difference_of_overlapping_squares() {
        let a = square_at(0.0, 0.0, 2.0);
        let b = square_at(1.0, 1.0, 2.0);
        let d = a.difference(&b);
        assert!((d.area() - 3.0).abs() < AREA_EPSILON);
        assert!(d.contains(Point::new(0.5, 0.5)));
        assert!(!d.contains(Point::new(1.5, 1.5)));
    }

    #[test]
    fn self_operations() {
        let a = square_at(0.0, 0.0, 2.0);
        assert!((a.union(&a).area() - a.area()).abs() < AREA_EPSILON);
        assert!((a.intersection(&a).area() - a.area()).abs() < AREA_EPSILON);
        assert!(a.difference(&a).area().abs() < AREA_EPSILON);
    }

    #[test]
    fn union_of_disjoint_squares_keeps_both() {
        let a = square_at(0.0, 0.0, 1.0);
        let b = square_at(3.0, 0.0, 1.0);
        let u = a.union(&b);
        assert_eq!(u.rings().len(), 2);
        assert!((u.area() - 2.0).abs() < AREA_EPSILON);

        let i = a.intersection(&b);
        assert!(i.rings().is_empty());
        assert!(i.area().abs() < AREA_EPSILON);
    }

    #[test]
    fn difference_carves_a_hole() {
        let outer = square_at(0.0, 0.0, 3.0);
        let inner = square_at(1.0, 1.0, 1.0);
        let d = outer.difference(&inner);
        assert_eq!(d.rings().len(), 2);
        assert!((d.area() - 8.0).abs() < AREA_EPSILON);
        assert!(d.contains(Point::new(0.5, 0.5)));
        assert!(!d.contains(Point::new(1.5, 1.5)));
        // exactly one ring is a clockwise hole
        let holes = d.rings().iter().filter(|r| r.is_clockwise()).count();
        assert_eq!(holes, 1);
    }

    #[test]
    fn union_absorbs_contained_region() {
        let outer = square_at(0.0, 0.0, 3.0);
        let inner = square_at(1.0, 1.0, 1.0);
        let u = outer.union(&inner);
        assert_eq!(u.rings().len(), 1);
        assert!((u.area() - 9.0).abs() < AREA_EPSILON);
    }

    #[test]
    fn inclusion_exclusion_square_circle() {
        let a = square_at(0.0, 0.0, 2.0);
        let b = circle_at(2.0, 1.0);
        let union = a.union(&b).area();
        let inter = a.intersection(&b).area();
        assert!(
            (union - (a.area() + b.area() - inter)).abs() < AREA_EPSILON,
            "union {union}, inter {inter}"
        );

        // difference and intersection partition a
        let diff = a.difference(&b).area();
        assert!((diff + inter - a.area()).abs() < AREA_EPSILON);
    }

    #[test]
    fn curved_boolean_membership() {
        let a = square_at(0.0, 0.0, 2.0);
        let b = circle_at(2.0, 1.0);
        let d = a.difference(&b);
        // a point well inside the removed lobe
        assert!(!d.contains(Point::new(1.8, 1.0)));
        // a point of the square far from the circle
        assert!(d.contains(Point::new(0.2, 0.2)));
    }

    #[test]
    fn repeated_operations_are_deterministic() {
        let a = square_at(0.0, 0.0, 2.0);
        let b = circle_at(2.0, 1.0);
        let first = a.union(&b);
        for _ in 0..3 {
            let again = a.union(&b);
            assert_eq!(first.rings().len(), again.rings().len());
            assert!((first.area() - again.area()).abs() < 1e-12);
        }
    }

    #[test]
    fn shared_edge_union() {
        // two squares sharing the edge x = 1
        let a = square_at(0.0, 0.0, 1.0);
        let b = square_at(1.0, 0.0, 1.0);
        let u = a.union(&b);
        assert!((u.area() - 2.0).abs() < AREA_EPSILON);
        assert!(u.contains(Point::new(0.5, 0.5)));
        assert!(u.contains(Point::new(1.5, 0.5)));
        assert!(u.contains(Point::new(1.0, 0.5)));
    }

    #[test]
    fn shared_edge_difference() {
        let a = square_at(0.0, 0.0, 1.0);
        let b = square_at(1.0, 0.0, 1.0);
        let d = a.difference(&b);
        assert!((d.area() - 1.0).abs() < AREA_EPSILON);
        assert!(d.contains(Point::new(0.5, 0.5)));
        assert!(!d.contains(Point::new(1.5, 0.5)));
    }
}
