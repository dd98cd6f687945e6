//! Black-box tests for the universal invariants of spec.md §8 not
//! already exercised by the seed-scenario tests.

use langreach::automaton::labeled::Automaton;
use langreach::automaton::min::regex_to_min_dfa;
use langreach::cyk;
use langreach::grammar::cfg::is_wcnf;
use langreach::grammar::{Cfg, Ecfg, Rsm};
use langreach::graph::label_agnostic_successors;
use langreach::regex::Ast;
use langreach::sbm::BoolMatrixEngine;
use langreach::Graph;

#[test]
fn test_invariant_2_intersection_recognizes_language_intersection() {
    // L1 = (a|b)*a, L2 = (a|b)*b. Their intersection is empty: no word
    // can end in both 'a' and 'b'.
    let dfa1 = regex_to_min_dfa(&Ast::parse_text("(a|b)*a").unwrap());
    let dfa2 = regex_to_min_dfa(&Ast::parse_text("(a|b)*b").unwrap());
    let a1: Automaton = (&dfa1).into();
    let a2: Automaton = (&dfa2).into();
    let e1 = BoolMatrixEngine::build_from_automaton(&a1);
    let e2 = BoolMatrixEngine::build_from_automaton(&a2);
    let product = e1.intersect(&e2);
    let product_automaton = product.to_automaton();

    for word in [
        vec![],
        vec!["a"],
        vec!["b"],
        vec!["a", "b"],
        vec!["b", "a"],
        vec!["a", "a", "b"],
        vec!["b", "b", "a"],
    ] {
        assert!(
            !accepts_product(&product_automaton, &word),
            "intersection should be empty, but accepted {word:?}"
        );
    }
}

#[test]
fn test_invariant_2_intersection_of_overlapping_languages() {
    // L1 = a*b, L2 = ab* -> intersection is exactly {"ab"}.
    let dfa1 = regex_to_min_dfa(&Ast::parse_text("a*b").unwrap());
    let dfa2 = regex_to_min_dfa(&Ast::parse_text("ab*").unwrap());
    let a1: Automaton = (&dfa1).into();
    let a2: Automaton = (&dfa2).into();
    let e1 = BoolMatrixEngine::build_from_automaton(&a1);
    let e2 = BoolMatrixEngine::build_from_automaton(&a2);
    let product = e1.intersect(&e2);
    let product_automaton = product.to_automaton();

    assert!(accepts_product(&product_automaton, &["a", "b"]));
    assert!(!accepts_product(&product_automaton, &["a", "a", "b"]));
    assert!(!accepts_product(&product_automaton, &["a", "b", "b"]));
}

fn accepts_product(automaton: &Automaton, word: &[&str]) -> bool {
    use std::collections::BTreeSet;
    let mut current: BTreeSet<u32> = automaton.start.clone();
    for symbol in word {
        let mut next = BTreeSet::new();
        for &state in &current {
            for tr in automaton.transitions(state) {
                if let langreach::automaton::nfa::EdgeLabel::Sym(s) = &tr.label {
                    if s == symbol {
                        next.insert(tr.to);
                    }
                }
            }
        }
        current = next;
        if current.is_empty() {
            return false;
        }
    }
    current.iter().any(|s| automaton.final_states.contains(s))
}

#[test]
fn test_invariant_4_to_wcnf_is_wcnf_and_preserves_language() {
    let cfg = Cfg::parse("S -> A S B S | epsilon\nA -> a\nB -> b").unwrap();
    let wcnf = cfg.to_wcnf();
    assert!(is_wcnf(&wcnf, &cfg));
    assert!(wcnf.generates_epsilon());
}

#[test]
fn test_invariant_8_ecfg_to_rsm_one_box_per_variable() {
    let cfg = Cfg::parse("S -> a S b | epsilon\nA -> a | b").unwrap();
    let ecfg = Ecfg::from_cfg(&cfg);
    let rsm = Rsm::from_ecfg(&ecfg);

    assert_eq!(rsm.boxes().count(), cfg.variables().len());

    let a_id = cfg.interner.get("A").unwrap();
    let a_box = rsm.box_for(a_id).unwrap();
    assert!(a_box.dfa.accepts(&["a"]));
    assert!(a_box.dfa.accepts(&["b"]));
    assert!(!a_box.dfa.accepts(&["c"]));
}

#[test]
fn test_invariant_3_transitive_closure_matches_label_agnostic_reachability() {
    let mut g = Graph::new(4);
    g.add_edge(0, "a", 1);
    g.add_edge(1, "b", 2);
    g.add_edge(2, "a", 3);
    // no edge back to 0: 3 has no outgoing edge.

    let automaton = g.to_nfa(None, None).unwrap();
    let engine = BoolMatrixEngine::build_from_automaton(&automaton);
    let closure = engine.transitive_closure();

    for u in 0..4u32 {
        let successors = label_agnostic_successors(&g, u);
        for v in 0..4u32 {
            let reachable_len_1 = successors.contains(&v);
            // transitive_closure reports paths of length >= 1 along any
            // single label's matrix; a direct edge is always length 1.
            if reachable_len_1 {
                assert!(
                    closure.get(u, v),
                    "closure should contain direct edge ({u},{v})"
                );
            }
        }
    }
    // 0 -a-> 1 -b-> 2 -a-> 3 is a length-3 path with no single matching label,
    // but the closure is taken over the automaton's own transitions (a
    // product over all labels combined via `or`), so it still reports the
    // multi-hop pairs reachable by *some* sequence of edges.
    assert!(closure.get(0, 3));
}

#[test]
fn test_invariant_6_cfpq_algorithms_agree_on_every_pair() {
    use langreach::{cfpq, CfpqAlgorithm};

    let mut g = Graph::new(3);
    g.add_edge(0, "a", 1);
    g.add_edge(1, "a", 2);
    g.add_edge(2, "a", 0);
    let cfg_text = "A -> a A | epsilon";

    let hellings = cfpq(&g, cfg_text, CfpqAlgorithm::Hellings, None, None, Some("A")).unwrap();
    let matrix = cfpq(&g, cfg_text, CfpqAlgorithm::Matrix, None, None, Some("A")).unwrap();
    let tensor = cfpq(&g, cfg_text, CfpqAlgorithm::Tensor, None, None, Some("A")).unwrap();

    assert_eq!(hellings, matrix);
    assert_eq!(matrix, tensor);
}

#[test]
fn test_invariant_7_cyk_empty_word_matches_generates_epsilon() {
    let nullable = "S -> a S b | epsilon";
    let non_nullable = "S -> a S b | a b";

    assert!(cyk(nullable, "").unwrap());
    assert!(!cyk(non_nullable, "").unwrap());

    assert_eq!(
        cyk(nullable, "").unwrap(),
        Cfg::parse(nullable).unwrap().generates_epsilon()
    );
    assert_eq!(
        cyk(non_nullable, "").unwrap(),
        Cfg::parse(non_nullable).unwrap().generates_epsilon()
    );
}

#[test]
fn test_s6_kronecker_intersection_matches_hand_built_product() {
    // L1 over {a,b}: a*b (accepts "b", "ab", "aab", ...).
    // L2 over {b,c}: bc* (accepts "b", "bc", "bcc", ...).
    // Both contain 'b'; the only word in both languages is the single
    // symbol "b" (a*b needs >= 0 a's then one b with nothing after; bc*
    // needs exactly one b then any number of c's - the overlap is "b").
    let dfa1 = regex_to_min_dfa(&Ast::parse_text("a*b").unwrap());
    let dfa2 = regex_to_min_dfa(&Ast::parse_text("bc*").unwrap());
    let a1: Automaton = (&dfa1).into();
    let a2: Automaton = (&dfa2).into();
    let e1 = BoolMatrixEngine::build_from_automaton(&a1);
    let e2 = BoolMatrixEngine::build_from_automaton(&a2);
    let product = e1.intersect(&e2).to_automaton();

    assert!(accepts_product(&product, &["b"]));
    assert!(!accepts_product(&product, &[]));
    assert!(!accepts_product(&product, &["a", "b"]));
    assert!(!accepts_product(&product, &["b", "c"]));
}
