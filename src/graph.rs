// Copyright 2026 the Regio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small directed multigraph over integer vertex handles.
//!
//! The boolean recombination works on graphs whose vertices are
//! canonical split points and whose edges are arcs. Vertices and edge
//! payloads are plain indices into arenas owned by the caller, which
//! keeps runs reproducible (no address-dependent iteration order) and
//! makes test failures printable.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A directed graph with at most one edge per ordered vertex pair;
/// parallel edges are merged into the payload by the caller-supplied
/// merge function.
#[derive(Debug)]
pub(crate) struct Digraph<E> {
    out: Vec<Vec<(usize, E)>>,
}

impl<E> Digraph<E> {
    pub fn new(vertices: usize) -> Self {
        Digraph {
            out: (0..vertices).map(|_| Vec::new()).collect(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.out.len()
    }

    /// Add an edge, merging with an existing payload on the same
    /// ordered pair.
    pub fn link(&mut self, from: usize, to: usize, payload: E, merge: impl FnOnce(&mut E, E)) {
        let edges = &mut self.out[from];
        match edges.iter_mut().find(|(v, _)| *v == to) {
            Some((_, existing)) => merge(existing, payload),
            None => edges.push((to, payload)),
        }
    }

    pub fn edge(&self, from: usize, to: usize) -> Option<&E> {
        self.out[from]
            .iter()
            .find(|(v, _)| *v == to)
            .map(|(_, e)| e)
    }

    pub fn out_edges(&self, v: usize) -> &[(usize, E)] {
        &self.out[v]
    }

    pub fn out_degree(&self, v: usize) -> usize {
        self.out[v].len()
    }

    pub fn in_degree(&self, v: usize) -> usize {
        self.out
            .iter()
            .map(|edges| edges.iter().filter(|(to, _)| *to == v).count())
            .sum()
    }

    /// Whether the vertex carries any edge at all.
    pub fn touches(&self, v: usize) -> bool {
        self.out_degree(v) > 0 || self.in_degree(v) > 0
    }

    /// Every simple cycle, as a vertex list whose last element repeats
    /// the first. Self-loops are single-vertex cycles.
    ///
    /// Each cycle is found exactly once, rooted at its least vertex.
    /// The arc graphs this runs on are small, so a straightforward
    /// rooted DFS is used; `MAX_CYCLES` is a runaway guard, not a
    /// tuning knob.
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        const MAX_CYCLES: usize = 4096;

        let n = self.out.len();
        let mut result = Vec::new();
        let mut on_path = vec![false; n];
        for start in 0..n {
            if result.len() >= MAX_CYCLES {
                break;
            }
            let mut path = vec![start];
            on_path[start] = true;
            self.cycle_dfs(start, start, &mut path, &mut on_path, &mut result, MAX_CYCLES);
            on_path[start] = false;
        }
        result
    }

    fn cycle_dfs(
        &self,
        start: usize,
        v: usize,
        path: &mut Vec<usize>,
        on_path: &mut [bool],
        result: &mut Vec<Vec<usize>>,
        max_cycles: usize,
    ) {
        for &(w, _) in &self.out[v] {
            if result.len() >= max_cycles {
                return;
            }
            if w == start {
                let mut cycle = path.clone();
                cycle.push(start);
                result.push(cycle);
            } else if w > start && !on_path[w] {
                path.push(w);
                on_path[w] = true;
                self.cycle_dfs(start, w, path, on_path, result, max_cycles);
                path.pop();
                on_path[w] = false;
            }
        }
    }

    /// Dijkstra from any of `sources` to the nearest vertex satisfying
    /// `is_target`, returning the vertex path (which may be a single
    /// vertex when a source is itself a target).
    pub fn shortest_path(
        &self,
        sources: &[usize],
        is_target: impl Fn(usize) -> bool,
        weight: impl Fn(&E) -> f64,
    ) -> Option<Vec<usize>> {
        #[derive(PartialEq)]
        struct Candidate {
            dist: f64,
            v: usize,
        }
        impl Eq for Candidate {}
        impl PartialOrd for Candidate {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }
        impl Ord for Candidate {
            fn cmp(&self, other: &Self) -> Ordering {
                // reversed for a min-heap, ties broken by vertex for
                // determinism
                other
                    .dist
                    .total_cmp(&self.dist)
                    .then(other.v.cmp(&self.v))
            }
        }

        let n = self.out.len();
        let mut dist = vec![f64::INFINITY; n];
        let mut prev = vec![usize::MAX; n];
        let mut heap = BinaryHeap::new();
        for &s in sources {
            dist[s] = 0.0;
            heap.push(Candidate { dist: 0.0, v: s });
        }

        while let Some(Candidate { dist: d, v }) = heap.pop() {
            if d > dist[v] {
                continue;
            }
            if is_target(v) {
                let mut path = vec![v];
                let mut cur = v;
                while prev[cur] != usize::MAX {
                    cur = prev[cur];
                    path.push(cur);
                }
                path.reverse();
                return Some(path);
            }
            for (w, e) in &self.out[v] {
                let nd = d + weight(e);
                if nd < dist[*w] {
                    dist[*w] = nd;
                    prev[*w] = v;
                    heap.push(Candidate { dist: nd, v: *w });
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::Digraph;

    fn keep_first(_existing: &mut usize, _incoming: usize) {}

    #[test]
    fn parallel_edges_merge() {
        let mut g: Digraph<usize> = Digraph::new(2);
        g.link(0, 1, 7, keep_first);
        g.link(0, 1, 9, keep_first);
        assert_eq!(g.out_degree(0), 1);
        assert_eq!(*g.edge(0, 1).unwrap(), 7);
    }

    #[test]
    fn degrees() {
        let mut g: Digraph<usize> = Digraph::new(4);
        g.link(0, 1, 0, keep_first);
        g.link(2, 1, 0, keep_first);
        assert_eq!(g.in_degree(1), 2);
        assert_eq!(g.out_degree(1), 0);
        assert!(g.touches(2));
        assert!(!g.touches(3));
    }

    #[test]
    fn finds_simple_cycles_once() {
        let mut g: Digraph<usize> = Digraph::new(4);
        // two triangles sharing the edge 0 -> 1
        g.link(0, 1, 0, keep_first);
        g.link(1, 2, 0, keep_first);
        g.link(2, 0, 0, keep_first);
        g.link(1, 3, 0, keep_first);
        g.link(3, 0, 0, keep_first);
        let mut cycles = g.cycles();
        cycles.sort();
        assert_eq!(cycles, vec![vec![0, 1, 2, 0], vec![0, 1, 3, 0]]);
    }

    #[test]
    fn finds_self_loop() {
        let mut g: Digraph<usize> = Digraph::new(2);
        g.link(1, 1, 0, keep_first);
        assert_eq!(g.cycles(), vec![vec![1, 1]]);
    }

    #[test]
    fn shortest_path_prefers_light_edges() {
        let mut g: Digraph<f64> = Digraph::new(4);
        let keep = |_: &mut f64, _: f64| {};
        g.link(0, 1, 1.0, keep);
        g.link(1, 3, 1.0, keep);
        g.link(0, 2, 0.5, keep);
        g.link(2, 3, 0.5, keep);
        let path = g
            .shortest_path(&[0], |v| v == 3, |w| *w)
            .unwrap();
        assert_eq!(path, vec![0, 2, 3]);
    }

    #[test]
    fn shortest_path_unreachable() {
        let g: Digraph<f64> = Digraph::new(2);
        assert!(g.shortest_path(&[0], |v| v == 1, |w| *w).is_none());
    }
}
