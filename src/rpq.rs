//! Regular path query solver (spec.md §4.4).

use std::collections::BTreeSet;

use crate::automaton::labeled::Automaton;
use crate::automaton::min::regex_to_min_dfa;
use crate::errors::Error;
use crate::graph::Graph;
use crate::regex::Ast;
use crate::sbm::BoolMatrixEngine;

/// Evaluates a regular expression against `graph`, returning the set of
/// `(u, v)` vertex pairs such that some path from `u` to `v` has a
/// labeling in `L(regex)` (spec.md §4.4).
///
/// `start`/`final_` default to all vertices when omitted (spec.md §9
/// "Start/final fallback in graph→NFA").
///
/// # Errors
///
/// Propagates [`Error::InvalidRegex`] from a malformed `regex_text` and
/// [`Error::InvalidStateSet`] from an out-of-range vertex in `start` or
/// `final_`.
pub fn rpq(
    graph: &Graph,
    regex_text: &str,
    start: Option<&BTreeSet<u32>>,
    final_: Option<&BTreeSet<u32>>,
) -> Result<BTreeSet<(u32, u32)>, Error> {
    let graph_automaton = graph.to_nfa(start, final_)?;
    let graph_engine = BoolMatrixEngine::build_from_automaton(&graph_automaton);

    let ast = Ast::parse_text(regex_text)?;
    let query_dfa = regex_to_min_dfa(&ast);
    let query_automaton: Automaton = (&query_dfa).into();
    let query_engine = BoolMatrixEngine::build_from_automaton(&query_automaton);

    Ok(rpq_from_engines(&graph_engine, &query_engine))
}

/// The engine-level core of [`rpq`], split out so the tensor CFPQ
/// kernel (spec.md §4.8) and tests can drive it directly.
///
/// Per spec.md §9's resolved ambiguity, vertices are decoded using the
/// dimension of the *right-hand* operand of the Kronecker product
/// (`query_engine.num_states()`), not the left-hand graph engine.
#[must_use]
pub fn rpq_from_engines(
    graph_engine: &BoolMatrixEngine,
    query_engine: &BoolMatrixEngine,
) -> BTreeSet<(u32, u32)> {
    let product = graph_engine.intersect(query_engine);
    let closure = product.transitive_closure();
    let n_query = query_engine.num_states() as u32;

    let mut result = BTreeSet::new();
    for (p, q) in closure.entries() {
        if product.get_start_states().contains(&p) && product.get_final_states().contains(&q) {
            result.insert((p / n_query, q / n_query));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::two_cycles_graph;

    #[test]
    fn test_s1_two_cycle_rpq_scenario() {
        // spec.md §8 S1: two cycles sharing vertex 0, a-cycle of 3
        // nodes, b-cycle of 2 nodes; rpq(G, "a*|b") = {(i,j)|0<=i,j<=3}
        // ∪ {(0,4),(4,5),(5,0)}.
        let g = two_cycles_graph(3, 2, ("a", "b"));
        let result = rpq(&g, "a*|b", None, None).unwrap();

        let mut expected: BTreeSet<(u32, u32)> = BTreeSet::new();
        for i in 0..=3u32 {
            for j in 0..=3u32 {
                expected.insert((i, j));
            }
        }
        expected.insert((0, 4));
        expected.insert((4, 5));
        expected.insert((5, 0));

        assert_eq!(result, expected);
    }

    #[test]
    fn test_rpq_respects_start_final_filters() {
        let g = two_cycles_graph(3, 2, ("a", "b"));
        let start = BTreeSet::from([0u32]);
        let final_ = BTreeSet::from([2u32]);
        let result = rpq(&g, "a*|b", Some(&start), Some(&final_)).unwrap();
        assert_eq!(result, BTreeSet::from([(0, 2)]));
    }

    #[test]
    fn test_rpq_invalid_regex_errors() {
        let g = two_cycles_graph(1, 1, ("a", "b"));
        assert!(rpq(&g, "(a", None, None).is_err());
    }
}
