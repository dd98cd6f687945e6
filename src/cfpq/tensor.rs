//! CFPQ via the tensor-product fixed point over a Recursive State
//! Machine (spec.md §4.8).

use std::collections::BTreeSet;

use crate::cfpq::common::{resolve_start_var, resolve_vertex_sets};
use crate::errors::Error;
use crate::grammar::{Cfg, Ecfg, Rsm};
use crate::graph::Graph;
use crate::sbm::BoolMatrixEngine;

/// Evaluates a context-free path query by repeatedly intersecting the
/// graph's boolean-matrix engine with the grammar's RSM engine,
/// feeding newly discovered variable derivations back as graph edges
/// until no new edge is added (spec.md §4.8).
///
/// # Errors
///
/// Propagates [`Error::InvalidGrammar`] from an unparseable `cfg_text`
/// or an unknown `start_var`, and [`Error::InvalidStateSet`] from an
/// out-of-range vertex in `start`/`final_`.
pub fn tensor_cfpq(
    graph: &Graph,
    cfg_text: &str,
    start: Option<&BTreeSet<u32>>,
    final_: Option<&BTreeSet<u32>>,
    start_var: Option<&str>,
) -> Result<BTreeSet<(u32, u32)>, Error> {
    let cfg = Cfg::parse(cfg_text)?;
    let start_variable = resolve_start_var(&cfg, start_var)?;
    let (start_set, final_set) = resolve_vertex_sets(graph.num_vertices(), start, final_)?;

    let ecfg = Ecfg::from_cfg(&cfg);
    let rsm = Rsm::from_ecfg(&ecfg);
    let e_r = BoolMatrixEngine::build_from_rsm(&rsm);

    let graph_automaton = graph.to_nfa(None, None)?;
    let mut e_g = BoolMatrixEngine::build_from_automaton(&graph_automaton);

    // spec.md §4.8 step 3: E_G's labels are edge labels ∪ an ε-diagonal
    // for every variable with an ε-accepting box. Without this, a
    // nullable variable's `(u, u)` pairs are only reachable through a
    // positive-length product cycle, which generally doesn't exist.
    for b in rsm.boxes() {
        if b.dfa.accepts_epsilon() {
            let label = rsm.interner.name(b.variable);
            for v in 0..graph.num_vertices() as u32 {
                e_g.add_edge(label, v, v);
            }
        }
    }

    saturate_graph_engine(&mut e_g, &e_r, &rsm);

    let start_label = rsm.interner.name(start_variable).to_string();
    let mut result = BTreeSet::new();
    if let Some(matrix) = e_g.matrix_for(&start_label) {
        for (u, v) in matrix.entries() {
            if start_set.contains(&u) && final_set.contains(&v) {
                result.insert((u, v));
            }
        }
    }
    Ok(result)
}

/// The tensor fixed point itself (spec.md §4.8 step 4): repeatedly
/// intersects `e_g` with `e_r`, closes the product, and feeds newly
/// discovered `(u, variable, v)` derivations back into `e_g` as edges,
/// until a round adds nothing. Split out so the testable agreement
/// property (spec.md §8 invariant 6) can drive it directly.
pub fn saturate_graph_engine(e_g: &mut BoolMatrixEngine, e_r: &BoolMatrixEngine, rsm: &Rsm) {
    let n_r = e_r.num_states() as u32;
    loop {
        let product = e_g.intersect(e_r);
        let closure = product.transitive_closure();
        let mut added_any = false;

        for (p, q) in closure.entries() {
            if !product.get_start_states().contains(&p)
                || !product.get_final_states().contains(&q)
            {
                continue;
            }
            let u = p / n_r;
            let i = p % n_r;
            let v = q / n_r;
            let j = q % n_r;
            if let Some(&variable) = e_r.box_pairs.get(&(i, j)) {
                let label = rsm.interner.name(variable);
                if e_g.add_edge(label, u, v) {
                    added_any = true;
                }
            }
        }

        if !added_any {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_cfpq_balanced_parentheses_style_grammar() {
        let mut g = Graph::new(3);
        g.add_edge(0, "a", 1);
        g.add_edge(1, "b", 2);
        let cfg_text = "S -> A S B S | epsilon\nA -> a\nB -> b";

        let result = tensor_cfpq(&g, cfg_text, None, None, None).unwrap();
        let expected: BTreeSet<(u32, u32)> =
            BTreeSet::from([(0, 0), (1, 1), (2, 2), (0, 2)]);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_tensor_cfpq_agrees_with_hellings_on_cycle() {
        let mut g = Graph::new(3);
        g.add_edge(0, "a", 1);
        g.add_edge(1, "a", 2);
        g.add_edge(2, "a", 0);
        let cfg_text = "A -> a A | epsilon";

        let tensor_result = tensor_cfpq(&g, cfg_text, None, None, Some("A")).unwrap();
        let hellings_result =
            crate::cfpq::hellings::hellings_cfpq(&g, cfg_text, None, None, Some("A")).unwrap();
        assert_eq!(tensor_result, hellings_result);
    }

    #[test]
    fn test_tensor_cfpq_b_variable_is_empty_on_a_only_cycle() {
        let mut g = Graph::new(3);
        g.add_edge(0, "a", 1);
        g.add_edge(1, "a", 2);
        g.add_edge(2, "a", 0);
        let cfg_text = "A -> a A | epsilon\nB -> b B | b";

        let result = tensor_cfpq(&g, cfg_text, None, None, Some("B")).unwrap();
        assert!(result.is_empty());
    }
}
