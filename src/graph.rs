//! The input graph model (spec.md §3) and the graph→NFA construction
//! (spec.md §4.3).

use std::collections::{BTreeSet, HashSet};

use crate::automaton::labeled::Automaton;
use crate::automaton::nfa::{EdgeLabel, Transition};
use crate::errors::Error;

/// A directed, edge-labeled multigraph. Vertices are `0..num_vertices`;
/// parallel edges with distinct labels are permitted (spec.md §3).
#[derive(Debug, Clone, Default)]
pub struct Graph {
    num_vertices: usize,
    edges: Vec<(u32, String, u32)>,
}

impl Graph {
    /// Creates an empty graph over `num_vertices` vertices.
    #[must_use]
    pub fn new(num_vertices: usize) -> Self {
        Self {
            num_vertices,
            edges: Vec::new(),
        }
    }

    /// Adds a labeled edge `from --label--> to`.
    ///
    /// # Panics
    ///
    /// Panics if `from` or `to` are not valid vertex indices — callers
    /// construct the graph themselves and are expected to stay within
    /// bounds; this is not a user-facing input boundary.
    pub fn add_edge(&mut self, from: u32, label: impl Into<String>, to: u32) {
        assert!((from as usize) < self.num_vertices);
        assert!((to as usize) < self.num_vertices);
        self.edges.push((from, label.into(), to));
    }

    /// Number of vertices.
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// All edges as `(from, label, to)` triples.
    #[must_use]
    pub fn edges(&self) -> &[(u32, String, u32)] {
        &self.edges
    }

    /// Basic statistics about the graph (node/edge counts, label set),
    /// mirroring the original implementation's `GraphInfo` helper.
    #[must_use]
    pub fn info(&self) -> GraphInfo {
        let labels: BTreeSet<String> = self.edges.iter().map(|(_, l, _)| l.clone()).collect();
        GraphInfo {
            nodes_count: self.num_vertices,
            edges_count: self.edges.len(),
            labels,
        }
    }

    /// Builds the NFA `A = (Q, Σ, δ, S, F)` with `Q = V`, `δ` the graph's
    /// edges, and `S`/`F` defaulting to all of `V` when omitted
    /// (spec.md §4.3, §9 "Start/final fallback in graph→NFA").
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStateSet`] if `start` or `final_` contain
    /// a vertex outside `0..num_vertices`.
    pub fn to_nfa(
        &self,
        start: Option<&BTreeSet<u32>>,
        final_: Option<&BTreeSet<u32>>,
    ) -> Result<Automaton, Error> {
        let all: BTreeSet<u32> = (0..self.num_vertices as u32).collect();
        let start_set = start.cloned().unwrap_or_else(|| all.clone());
        let final_set = final_.cloned().unwrap_or_else(|| all.clone());

        for &v in start_set.iter().chain(final_set.iter()) {
            if v as usize >= self.num_vertices {
                return Err(Error::InvalidStateSet(format!(
                    "vertex {v} is not in the graph (0..{})",
                    self.num_vertices
                )));
            }
        }

        let mut adjacency: Vec<Vec<Transition>> = vec![Vec::new(); self.num_vertices];
        for (from, label, to) in &self.edges {
            adjacency[*from as usize].push(Transition {
                to: *to,
                label: EdgeLabel::Sym(label.clone()),
            });
        }

        Ok(Automaton {
            num_states: self.num_vertices,
            start: start_set,
            final_states: final_set,
            adjacency,
        })
    }
}

/// Node/edge counts and label set for a [`Graph`], mirroring the
/// original implementation's `GraphInfo` (spec.md §4 supplement).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphInfo {
    pub nodes_count: usize,
    pub edges_count: usize,
    pub labels: BTreeSet<String>,
}

/// Generates a graph made of two cycles sharing vertex 0, one labeled
/// with `labels.0` and the other with `labels.1` — the fixture used by
/// spec.md §8 scenario S1 (and by the original implementation's own
/// test suite, `graphs.py::generate_two_cycles_graph`).
#[must_use]
pub fn two_cycles_graph(first_cycle_len: usize, second_cycle_len: usize, labels: (&str, &str)) -> Graph {
    let num_vertices = first_cycle_len + second_cycle_len + 1;
    let mut graph = Graph::new(num_vertices);

    let mut prev = 0u32;
    for i in 1..=first_cycle_len {
        graph.add_edge(prev, labels.0, i as u32);
        prev = i as u32;
    }
    graph.add_edge(prev, labels.0, 0);

    let mut prev = 0u32;
    for i in 0..second_cycle_len {
        let next = (first_cycle_len + 1 + i) as u32;
        graph.add_edge(prev, labels.1, next);
        prev = next;
    }
    graph.add_edge(prev, labels.1, 0);

    graph
}

/// The set of reachable vertices ignoring edge labels: used by the
/// label-agnostic transitive-closure testable property (spec.md §8,
/// invariant 3) and by nothing else in the query layer.
#[must_use]
pub fn label_agnostic_successors(graph: &Graph, from: u32) -> HashSet<u32> {
    let mut visited = HashSet::new();
    let mut stack = vec![from];
    while let Some(v) = stack.pop() {
        for (f, _, t) in graph.edges() {
            if *f == v && visited.insert(*t) {
                stack.push(*t);
            }
        }
    }
    visited
}
