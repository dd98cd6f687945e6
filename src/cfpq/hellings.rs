//! CFPQ via the Hellings-style worklist fixed point (spec.md §4.6).

use std::collections::{BTreeSet, VecDeque};

use crate::cfpq::common::{binary_productions, resolve_start_var, resolve_vertex_sets};
use crate::errors::Error;
use crate::grammar::{Cfg, Symbol, VariableId};
use crate::graph::Graph;

/// Evaluates a context-free path query via the Hellings worklist
/// fixed point (spec.md §4.6).
///
/// # Errors
///
/// Propagates [`Error::InvalidGrammar`] from an unparseable `cfg_text`
/// or an unknown `start_var`, and [`Error::InvalidStateSet`] from an
/// out-of-range vertex in `start`/`final_`.
pub fn hellings_cfpq(
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

    let relation = hellings_relation(graph, &wcnf);

    let mut result = BTreeSet::new();
    for &(a, u, v) in &relation {
        if a == start_variable && start_set.contains(&u) && final_set.contains(&v) {
            result.insert((u, v));
        }
    }
    Ok(result)
}

/// The worklist fixed point itself (spec.md §4.6 steps 2–3), returning
/// every derived `(variable, u, v)` triple. Split out so the testable
/// agreement property (spec.md §8 invariant 6) can compare it directly
/// against the other two kernels without re-filtering by start/final.
#[must_use]
pub fn hellings_relation(graph: &Graph, wcnf: &Cfg) -> BTreeSet<(VariableId, u32, u32)> {
    let n = graph.num_vertices();
    let mut relation: BTreeSet<(VariableId, u32, u32)> = BTreeSet::new();
    let mut worklist: VecDeque<(VariableId, u32, u32)> = VecDeque::new();

    let mut push = |relation: &mut BTreeSet<(VariableId, u32, u32)>,
                    worklist: &mut VecDeque<(VariableId, u32, u32)>,
                    triple: (VariableId, u32, u32)| {
        if relation.insert(triple) {
            worklist.push_back(triple);
        }
    };

    for p in &wcnf.productions {
        match p.body.as_slice() {
            [] => {
                for v in 0..n as u32 {
                    push(&mut relation, &mut worklist, (p.head, v, v));
                }
            }
            [Symbol::Term(t)] => {
                for &(u, ref label, v) in graph.edges() {
                    if label == t {
                        push(&mut relation, &mut worklist, (p.head, u, v));
                    }
                }
            }
            _ => {}
        }
    }

    let binary = binary_productions(wcnf);

    while let Some((a, u, v)) = worklist.pop_front() {
        let right_of_v: Vec<(VariableId, u32)> = relation
            .iter()
            .filter(|(_, from, _)| *from == v)
            .map(|(b, _, w)| (*b, *w))
            .collect();
        for (b, w) in right_of_v {
            for &(c, pa, pb) in &binary {
                if pa == a && pb == b {
                    push(&mut relation, &mut worklist, (c, u, w));
                }
            }
        }

        let left_of_u: Vec<(VariableId, u32)> = relation
            .iter()
            .filter(|(_, _, to)| *to == u)
            .map(|(b, from, _)| (*b, *from))
            .collect();
        for (b, w) in left_of_u {
            for &(c, pa, pb) in &binary {
                if pa == b && pb == a {
                    push(&mut relation, &mut worklist, (c, w, v));
                }
            }
        }
    }

    relation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn cycle3_graph() -> Graph {
        let mut g = Graph::new(3);
        g.add_edge(0, "a", 1);
        g.add_edge(1, "a", 2);
        g.add_edge(2, "a", 0);
        g
    }

    #[test]
    fn test_s2_cycle_cfpq_scenario() {
        // spec.md §8 S2: A -> a A | epsilon; B -> b B | b. On a 3-cycle
        // labeled "a", A returns all pairs, B returns the empty set.
        let g = cycle3_graph();
        let cfg_text = "A -> a A | epsilon\nB -> b B | b";

        let a_result = hellings_cfpq(&g, cfg_text, None, None, Some("A")).unwrap();
        let mut expected: BTreeSet<(u32, u32)> = BTreeSet::new();
        for i in 0..3u32 {
            for j in 0..3u32 {
                expected.insert((i, j));
            }
        }
        assert_eq!(a_result, expected);

        let b_result = hellings_cfpq(&g, cfg_text, None, None, Some("B")).unwrap();
        assert!(b_result.is_empty());
    }

    #[test]
    fn test_balanced_parentheses_style_grammar() {
        // spec.md §8 S3's grammar shape: S -> A S B S | epsilon;
        // A -> a; B -> b. On a straight-line "a" then "b" path, S
        // derives epsilon at every vertex (reflexively) and derives
        // "ab" from 0 to 2 (A·S(ε)·B·S(ε)).
        let mut g = Graph::new(3);
        g.add_edge(0, "a", 1);
        g.add_edge(1, "b", 2);
        let cfg_text = "S -> A S B S | epsilon\nA -> a\nB -> b";

        let result = hellings_cfpq(&g, cfg_text, None, None, None).unwrap();
        let expected: BTreeSet<(u32, u32)> =
            BTreeSet::from([(0, 0), (1, 1), (2, 2), (0, 2)]);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_unknown_start_var_errors() {
        let g = cycle3_graph();
        assert!(hellings_cfpq(&g, "A -> a A | epsilon", None, None, Some("Z")).is_err());
    }
}
