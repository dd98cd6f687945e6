//! Sparse boolean matrices and the boolean-matrix automaton engine
//! (spec.md §3 "Sparse boolean matrix (SBM)" / "Boolean-matrix engine
//! state", §4.1, §9 "SBM backend").
//!
//! Per the SPEC_FULL.md design note, the backend is DOK-style: each
//! per-label matrix is a coordinate set of set bits. No CSR/bitset
//! finalize step is implemented — acceptable at the scale this crate
//! targets (see DESIGN.md).

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;

use crate::automaton::labeled::Automaton;
use crate::automaton::nfa::EdgeLabel;
use crate::grammar::symbols::VariableId;

/// An n×n boolean matrix stored as a coordinate set of set bits
/// (spec.md §3, invariant: no entry is stored `false`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SparseBoolMatrix {
    rows: usize,
    cols: usize,
    entries: BTreeSet<(u32, u32)>,
}

impl SparseBoolMatrix {
    /// An all-false `rows`×`cols` matrix.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            entries: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn get(&self, i: u32, j: u32) -> bool {
        self.entries.contains(&(i, j))
    }

    /// Sets bit `(i, j)`; returns whether it was previously unset.
    pub fn set(&mut self, i: u32, j: u32) -> bool {
        self.entries.insert((i, j))
    }

    #[must_use]
    pub fn entries(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.entries.iter().copied()
    }

    /// Boolean OR of two same-shaped matrices.
    #[must_use]
    pub fn or(&self, other: &Self) -> Self {
        assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        let mut entries = self.entries.clone();
        entries.extend(other.entries.iter().copied());
        Self {
            rows: self.rows,
            cols: self.cols,
            entries,
        }
    }

    /// Boolean matrix product: `self` is `rows`×`k`, `other` is `k`×`cols`.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        assert_eq!(self.cols, other.rows);
        // Group `other`'s rows for a cheap nested-loop join.
        let mut by_row: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for &(r, c) in &other.entries {
            by_row.entry(r).or_default().push(c);
        }
        let mut result = Self::zeros(self.rows, other.cols);
        for &(i, k) in &self.entries {
            if let Some(cols) = by_row.get(&k) {
                for &j in cols {
                    result.entries.insert((i, j));
                }
            }
        }
        result
    }

    /// Kronecker product: result has `self.rows * other.rows` rows and
    /// `self.cols * other.cols` columns; `(i1, j1) ⊗ (i2, j2)` maps to
    /// `(i1 * other.rows + i2, j1 * other.cols + j2)` (spec.md §4.1).
    #[must_use]
    pub fn kron(&self, other: &Self) -> Self {
        let rows = self.rows * other.rows;
        let cols = self.cols * other.cols;
        let mut entries = BTreeSet::new();
        for &(i1, j1) in &self.entries {
            for &(i2, j2) in &other.entries {
                let row = i1 * other.rows as u32 + i2;
                let col = j1 * other.cols as u32 + j2;
                entries.insert((row, col));
            }
        }
        Self {
            rows,
            cols,
            entries,
        }
    }

    /// Boolean transitive closure of a square matrix via path-doubling
    /// (`M ← M ∨ M·M` until stable, spec.md §4.1). Edge case: a 0×0
    /// matrix (no states) returns itself; the spec's "no labels" edge
    /// case is handled by callers before this is reached.
    #[must_use]
    pub fn transitive_closure(&self) -> Self {
        assert_eq!(self.rows, self.cols);
        let mut m = self.clone();
        loop {
            let squared = m.mul(&m);
            let next = m.or(&squared);
            if next.nnz() == m.nnz() {
                return next;
            }
            m = next;
        }
    }
}

/// The boolean-matrix view of an automaton: an SBM (per-label matrices)
/// plus the state indexing, start-index set and final-index set
/// (spec.md §3 "Boolean-matrix engine state", §4.1).
#[derive(Debug, Clone, Default)]
pub struct BoolMatrixEngine {
    num_states: usize,
    matrices: IndexMap<String, SparseBoolMatrix>,
    start: BTreeSet<u32>,
    final_states: BTreeSet<u32>,
    /// For RSM-derived engines: maps `(box-start-index, box-final-index)`
    /// to the nonterminal that box represents (spec.md §3, §4.8).
    pub box_pairs: BTreeMap<(u32, u32), VariableId>,
}

impl BoolMatrixEngine {
    /// Builds an engine from an [`Automaton`] (spec.md §4.1
    /// "Construction"): enumerates `δ`, allocating `M_σ` lazily on the
    /// first occurrence of `σ`.
    #[must_use]
    pub fn build_from_automaton(automaton: &Automaton) -> Self {
        let n = automaton.num_states;
        let mut matrices: IndexMap<String, SparseBoolMatrix> = IndexMap::new();
        for state in 0..n {
            for tr in automaton.transitions(state as u32) {
                if let EdgeLabel::Sym(label) = &tr.label {
                    let matrix = matrices
                        .entry(label.clone())
                        .or_insert_with(|| SparseBoolMatrix::zeros(n, n));
                    matrix.set(state as u32, tr.to);
                }
            }
        }
        Self {
            num_states: n,
            matrices,
            start: automaton.start.clone(),
            final_states: automaton.final_states.clone(),
            box_pairs: BTreeMap::new(),
        }
    }

    /// Reconstructs an [`Automaton`] whose transitions are the union of
    /// all label matrices (spec.md §4.1 `to_nfa`).
    #[must_use]
    pub fn to_automaton(&self) -> Automaton {
        let mut adjacency = vec![Vec::new(); self.num_states];
        for (label, matrix) in &self.matrices {
            for (i, j) in matrix.entries() {
                adjacency[i as usize].push(crate::automaton::nfa::Transition {
                    to: j,
                    label: EdgeLabel::Sym(label.clone()),
                });
            }
        }
        Automaton {
            num_states: self.num_states,
            start: self.start.clone(),
            final_states: self.final_states.clone(),
            adjacency,
        }
    }

    #[must_use]
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Adds a labeled edge, allocating its matrix lazily. Returns
    /// whether the edge was previously absent. Used by the tensor CFPQ
    /// kernel (spec.md §4.8) to grow `E_G` with grammar-discovered
    /// variable edges across fixed-point rounds.
    pub fn add_edge(&mut self, label: &str, from: u32, to: u32) -> bool {
        let n = self.num_states;
        let matrix = self
            .matrices
            .entry(label.to_string())
            .or_insert_with(|| SparseBoolMatrix::zeros(n, n));
        matrix.set(from, to)
    }

    /// Whether `label` names an edge `(from, to)` already present.
    #[must_use]
    pub fn has_edge(&self, label: &str, from: u32, to: u32) -> bool {
        self.matrices
            .get(label)
            .is_some_and(|m| m.get(from, to))
    }

    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.matrices.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn get_states(&self) -> std::ops::Range<u32> {
        0..self.num_states as u32
    }

    #[must_use]
    pub fn get_start_states(&self) -> &BTreeSet<u32> {
        &self.start
    }

    #[must_use]
    pub fn get_final_states(&self) -> &BTreeSet<u32> {
        &self.final_states
    }

    #[must_use]
    pub fn matrix_for(&self, label: &str) -> Option<&SparseBoolMatrix> {
        self.matrices.get(label)
    }

    /// Kronecker-product intersection of two engines (spec.md §4.1
    /// "Intersection"). Labels present on only one side are dropped:
    /// the product automaton recognizes `L(self) ∩ L(other)`. Result
    /// state `(i, j)` maps to index `i * other.num_states + j`.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let n2 = other.num_states;
        let mut matrices: IndexMap<String, SparseBoolMatrix> = IndexMap::new();
        for (label, m1) in &self.matrices {
            if let Some(m2) = other.matrices.get(label) {
                matrices.insert(label.clone(), m1.kron(m2));
            }
        }

        let start = cross_product(&self.start, &other.start, n2);
        let final_states = cross_product(&self.final_states, &other.final_states, n2);

        Self {
            num_states: self.num_states * n2,
            matrices,
            start,
            final_states,
            box_pairs: BTreeMap::new(),
        }
    }

    /// Transitive closure of the label-erased graph: `M = Σ_σ M_σ`,
    /// then `M ← M ∨ M·M` until stable (spec.md §4.1 "Transitive
    /// closure"). Edge case: an engine with no labels returns a 1×1
    /// all-false matrix.
    #[must_use]
    pub fn transitive_closure(&self) -> SparseBoolMatrix {
        if self.matrices.is_empty() {
            return SparseBoolMatrix::zeros(1, 1);
        }
        let mut iter = self.matrices.values();
        let mut union = iter.next().unwrap().clone();
        for m in iter {
            union = union.or(m);
        }
        union.transitive_closure()
    }

    /// Builds an engine whose state set is the disjoint union of all
    /// box DFA states (spec.md §4.1 "Build from RSM"): states are
    /// renamed `"<state>#<variable>"` to disambiguate, and box start/
    /// final states become start/final of the engine. Returns the
    /// engine together with the `box_pairs` map from
    /// `(box-start-index, box-final-index)` to the owning variable
    /// (spec.md §4.8 step 2).
    #[must_use]
    pub fn build_from_rsm(rsm: &crate::grammar::rsm::Rsm) -> Self {
        let mut offset = 0usize;
        let mut matrices: IndexMap<String, SparseBoolMatrix> = IndexMap::new();
        let mut start = BTreeSet::new();
        let mut final_states = BTreeSet::new();
        let mut box_pairs = BTreeMap::new();

        // First pass: compute the total state count so per-label
        // matrices can be allocated once at full size.
        let total: usize = rsm.boxes().map(|b| b.dfa.num_states).sum();
        for b in rsm.boxes() {
            let n = b.dfa.num_states;
            for state in 0..n {
                for (symbol_idx, dest) in b.dfa.trans[state].iter().enumerate() {
                    if let Some(to) = dest {
                        let label = b.dfa.alphabet[symbol_idx].clone();
                        let matrix = matrices
                            .entry(label)
                            .or_insert_with(|| SparseBoolMatrix::zeros(total, total));
                        matrix.set((state + offset) as u32, (*to as usize + offset) as u32);
                    }
                }
            }

            let box_start = (b.dfa.start as usize + offset) as u32;
            start.insert(box_start);
            for &accept in &b.dfa.accepts {
                let box_final = (accept as usize + offset) as u32;
                final_states.insert(box_final);
                box_pairs.insert((box_start, box_final), b.variable);
            }

            offset += n;
        }

        Self {
            num_states: total,
            matrices,
            start,
            final_states,
            box_pairs,
        }
    }
}

fn cross_product(a: &BTreeSet<u32>, b: &BTreeSet<u32>, n2: usize) -> BTreeSet<u32> {
    let mut result = BTreeSet::new();
    for &i in a {
        for &j in b {
            result.insert(i * n2 as u32 + j);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::min::regex_to_min_dfa;
    use crate::regex::Ast;

    #[test]
    fn test_kron_shape_and_bits() {
        let mut a = SparseBoolMatrix::zeros(2, 2);
        a.set(0, 1);
        let mut b = SparseBoolMatrix::zeros(2, 2);
        b.set(1, 0);
        let k = a.kron(&b);
        assert_eq!((k.rows(), k.cols()), (4, 4));
        // (0,1) x (1,0) -> row 0*2+1=1, col 1*2+0=2
        assert!(k.get(1, 2));
        assert_eq!(k.nnz(), 1);
    }

    #[test]
    fn test_transitive_closure_cycle() {
        // 0 -> 1 -> 2 -> 0
        let mut m = SparseBoolMatrix::zeros(3, 3);
        m.set(0, 1);
        m.set(1, 2);
        m.set(2, 0);
        let closure = m.transitive_closure();
        for i in 0..3 {
            for j in 0..3 {
                assert!(closure.get(i, j), "expected ({i},{j}) reachable");
            }
        }
    }

    #[test]
    fn test_transitive_closure_no_labels_is_1x1_false() {
        let dfa = regex_to_min_dfa(&Ast::parse_text("a").unwrap());
        // an engine with an empty alphabet has no matrices at all
        let automaton: crate::automaton::labeled::Automaton = (&dfa).into();
        let mut engine = BoolMatrixEngine::build_from_automaton(&automaton);
        engine.matrices.clear();
        let closure = engine.transitive_closure();
        assert_eq!((closure.rows(), closure.cols()), (1, 1));
        assert_eq!(closure.nnz(), 0);
    }

    #[test]
    fn test_intersect_drops_labels_present_on_one_side_only() {
        let a_only = Ast::parse_text("a").unwrap();
        let b_only = Ast::parse_text("b").unwrap();
        let dfa_a: crate::automaton::labeled::Automaton =
            (&regex_to_min_dfa(&a_only)).into();
        let dfa_b: crate::automaton::labeled::Automaton =
            (&regex_to_min_dfa(&b_only)).into();
        let e1 = BoolMatrixEngine::build_from_automaton(&dfa_a);
        let e2 = BoolMatrixEngine::build_from_automaton(&dfa_b);
        let product = e1.intersect(&e2);
        assert!(product.labels().is_empty());
    }
}
