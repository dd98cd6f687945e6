//! CFPQ via the boolean-matrix fixed point (spec.md §4.7): one n×n
//! matrix per variable, closed under the CNF productions with boolean
//! matrix add/multiply.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::cfpq::common::{binary_productions, resolve_start_var, resolve_vertex_sets};
use crate::errors::Error;
use crate::grammar::{Cfg, Symbol, VariableId};
use crate::graph::Graph;
use crate::sbm::SparseBoolMatrix;

/// Evaluates a context-free path query via the per-variable
/// boolean-matrix fixed point (spec.md §4.7).
///
/// # Errors
///
/// Propagates [`Error::InvalidGrammar`] from an unparseable `cfg_text`
/// or an unknown `start_var`, and [`Error::InvalidStateSet`] from an
/// out-of-range vertex in `start`/`final_`.
pub fn matrix_cfpq(
    graph: &Graph,
    cfg_text: &str,
    start: Option<&BTreeSet<u32>>,
    final_: Option<&BTreeSet<u32>>,
    start_var: Option<&str>,
) -> Result<BTreeSet<(u32, u32)>, Error> {
    let cfg = Cfg::parse(cfg_text)?;
    let wcnf = cfg.to_wcnf();
    let start_variable = resolve_start_var(&cfg, start_var)?;
    let (start_set, final_set) = resolve_vertex_sets(graph.num_vertices(), start, final_)?;

    let matrices = matrix_fixed_point(graph, &wcnf);
    let empty = SparseBoolMatrix::zeros(graph.num_vertices(), graph.num_vertices());
    let t = matrices.get(&start_variable).unwrap_or(&empty);

    let mut result = BTreeSet::new();
    for (u, v) in t.entries() {
        if start_set.contains(&u) && final_set.contains(&v) {
            result.insert((u, v));
        }
    }
    Ok(result)
}

/// Builds one boolean matrix per variable and closes it under the
/// grammar's binary productions (spec.md §4.7). Split out so the
/// testable agreement property (spec.md §8 invariant 6) can compare
/// kernels directly.
#[must_use]
pub fn matrix_fixed_point(graph: &Graph, wcnf: &Cfg) -> IndexMap<VariableId, SparseBoolMatrix> {
    let n = graph.num_vertices();
    let mut matrices: IndexMap<VariableId, SparseBoolMatrix> = IndexMap::new();
    for v in wcnf.variables() {
        matrices.insert(v, SparseBoolMatrix::zeros(n, n));
    }

    for p in &wcnf.productions {
        match p.body.as_slice() {
            [] => {
                let m = matrices.entry(p.head).or_insert_with(|| SparseBoolMatrix::zeros(n, n));
                for v in 0..n as u32 {
                    m.set(v, v);
                }
            }
            [Symbol::Term(t)] => {
                let m = matrices.entry(p.head).or_insert_with(|| SparseBoolMatrix::zeros(n, n));
                for &(u, ref label, v) in graph.edges() {
                    if label == t {
                        m.set(u, v);
                    }
                }
            }
            _ => {}
        }
    }

    let binary = binary_productions(wcnf);

    loop {
        let mut changed = false;
        for &(c, a, b) in &binary {
            let product = matrices[&a].mul(&matrices[&b]);
            let merged = matrices[&c].or(&product);
            if merged.nnz() != matrices[&c].nnz() {
                matrices.insert(c, merged);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    matrices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_cfpq_balanced_parentheses_style_grammar() {
        let mut g = Graph::new(3);
        g.add_edge(0, "a", 1);
        g.add_edge(1, "b", 2);
        let cfg_text = "S -> A S B S | epsilon\nA -> a\nB -> b";

        let result = matrix_cfpq(&g, cfg_text, None, None, None).unwrap();
        let expected: BTreeSet<(u32, u32)> =
            BTreeSet::from([(0, 0), (1, 1), (2, 2), (0, 2)]);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_matrix_cfpq_agrees_with_hellings_on_cycle() {
        let mut g = Graph::new(3);
        g.add_edge(0, "a", 1);
        g.add_edge(1, "a", 2);
        g.add_edge(2, "a", 0);
        let cfg_text = "A -> a A | epsilon";

        let matrix_result = matrix_cfpq(&g, cfg_text, None, None, Some("A")).unwrap();
        let hellings_result =
            crate::cfpq::hellings::hellings_cfpq(&g, cfg_text, None, None, Some("A")).unwrap();
        assert_eq!(matrix_result, hellings_result);
    }
}
