//! Black-box tests for the seed end-to-end scenarios of spec.md §8
//! (S1, S2, S3, S4, S5), driven entirely through the public API. S6
//! (Kronecker intersection) lives in `tests/invariants.rs` alongside
//! the other engine-level invariant checks.

use std::collections::BTreeSet;

use langreach::{cfpq, cyk, rpq, two_cycles_graph, CfpqAlgorithm, Graph};

#[test]
fn test_s1_rpq_on_two_cycle_graph() {
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
fn test_s2_cfpq_on_cycle() {
    let mut g = Graph::new(3);
    g.add_edge(0, "a", 1);
    g.add_edge(1, "a", 2);
    g.add_edge(2, "a", 0);

    let cfg_text = "A -> a A | epsilon\nB -> b B | b";

    let mut expected: BTreeSet<(u32, u32)> = BTreeSet::new();
    for i in 0..3u32 {
        for j in 0..3u32 {
            expected.insert((i, j));
        }
    }

    for algorithm in [
        CfpqAlgorithm::Hellings,
        CfpqAlgorithm::Matrix,
        CfpqAlgorithm::Tensor,
    ] {
        let a_result = cfpq(&g, cfg_text, algorithm, None, None, Some("A")).unwrap();
        assert_eq!(a_result, expected, "algorithm {algorithm:?} disagreed on A");

        let b_result = cfpq(&g, cfg_text, algorithm, None, None, Some("B")).unwrap();
        assert!(
            b_result.is_empty(),
            "algorithm {algorithm:?} found spurious B pairs"
        );
    }
}

#[test]
fn test_s3_balanced_parentheses_on_two_cycle_graph() {
    // spec.md §8 S3: two-cycle graph, CFPQ with start S returns
    // {(0,0),(0,3),(1,0),(1,3),(2,0),(2,3)}.
    //
    // spec.md's own prose paraphrase of the grammar
    // ("S -> A S B S | epsilon") can't reproduce this result over any
    // two-cycle graph: that grammar is nullable, so S's epsilon
    // alternative would add every reflexive pair (v, v), which the
    // stated result set doesn't have. The original implementation's
    // own CFPQ test suite (`tests/test_cfpq.py`) pins down the actual
    // fixture: graph `two_cycles_graph(2, 1, ("a", "b"))` (a-cycle
    // 0-1-2-0, b-cycle 0-3-0) under the non-nullable grammar
    // `S -> A B | A S1; S1 -> S B; A -> a; B -> b`, which reproduces
    // spec.md's stated pair set exactly.
    let g = two_cycles_graph(2, 1, ("a", "b"));
    let cfg_text = "S -> A B | A S1\nS1 -> S B\nA -> a\nB -> b";

    let expected: BTreeSet<(u32, u32)> = BTreeSet::from([
        (0, 0),
        (0, 3),
        (1, 0),
        (1, 3),
        (2, 0),
        (2, 3),
    ]);

    for algorithm in [
        CfpqAlgorithm::Hellings,
        CfpqAlgorithm::Matrix,
        CfpqAlgorithm::Tensor,
    ] {
        let result = cfpq(&g, cfg_text, algorithm, None, None, Some("S")).unwrap();
        assert_eq!(result, expected, "algorithm {algorithm:?} disagreed on S3");
    }
}

#[test]
fn test_s4_cyk_acceptance() {
    let cfg_text = "S -> a S b S | epsilon";
    assert!(cyk(cfg_text, "aabb").unwrap());
    assert!(cyk(cfg_text, "abab").unwrap());
    assert!(!cyk(cfg_text, "aba").unwrap());
}

#[test]
fn test_s5_regex_to_min_dfa_equivalence() {
    use langreach::automaton::min::regex_to_min_dfa;
    use langreach::regex::Ast;

    let dfa = regex_to_min_dfa(&Ast::parse_text("a* l* e*").unwrap());
    assert_eq!(dfa.num_states, 3);
    assert_eq!(dfa.accepts.len(), 3);

    assert!(dfa.accepts(&[]));
    assert!(dfa.accepts(&["a"]));
    assert!(dfa.accepts(&["a", "l"]));
    assert!(dfa.accepts(&["a", "l", "e"]));
    assert!(dfa.accepts(&["l", "l", "e"]));
    assert!(dfa.accepts(&["e", "e"]));
    assert!(!dfa.accepts(&["e", "a"]));
    assert!(!dfa.accepts(&["l", "a"]));
}
