//! Recursive State Machine: a collection of "boxed" DFAs keyed by
//! nonterminal (spec.md §3 "RSM", §4.5 "ECFG → RSM").

use crate::automaton::dfa::Dfa;
use crate::automaton::min::regex_to_min_dfa;
use crate::grammar::ecfg::Ecfg;
use crate::grammar::symbols::{Interner, VariableId};

/// A box pairs a variable with the minimal DFA of its ECFG body.
#[derive(Debug, Clone)]
pub struct RsmBox {
    pub variable: VariableId,
    pub dfa: Dfa,
}

impl PartialEq for RsmBox {
    /// Box equality is variable-equality AND DFA language-equivalence
    /// (spec.md §3 "RSM" invariant).
    fn eq(&self, other: &Self) -> bool {
        self.variable == other.variable && self.dfa.is_equivalent_to(&other.dfa)
    }
}

/// A Recursive State Machine: a start variable and a finite collection
/// of boxes (spec.md §3).
#[derive(Debug, Clone)]
pub struct Rsm {
    pub start_var: VariableId,
    boxes: Vec<RsmBox>,
    pub interner: Interner,
}

impl Rsm {
    /// Builds an RSM from an ECFG: for each production `A -> r`, build a
    /// box `(A, min_dfa(r))` (spec.md §4.5 "ECFG → RSM", §4.8 step 1).
    #[must_use]
    pub fn from_ecfg(ecfg: &Ecfg) -> Rsm {
        let mut boxes = Vec::with_capacity(ecfg.bodies.len());
        for (&variable, ast) in &ecfg.bodies {
            let dfa = regex_to_min_dfa(ast);
            boxes.push(RsmBox { variable, dfa });
        }
        boxes.sort_by_key(|b| b.variable);
        Rsm {
            start_var: ecfg.start,
            boxes,
            interner: ecfg.interner.clone(),
        }
    }

    pub fn boxes(&self) -> impl Iterator<Item = &RsmBox> {
        self.boxes.iter()
    }

    #[must_use]
    pub fn box_for(&self, variable: VariableId) -> Option<&RsmBox> {
        self.boxes.iter().find(|b| b.variable == variable)
    }
}
