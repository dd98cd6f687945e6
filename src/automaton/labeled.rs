use std::collections::BTreeSet;

use crate::automaton::dfa::Dfa;
use crate::automaton::nfa::{EdgeLabel, Nfa, StateId, Transition};

/// A general NFA `A = (Q, Σ, δ, S, F)` with explicit start and final
/// *sets* (spec.md §3) — unlike [`Nfa`], which (as produced by Thompson
/// construction for the regex front end) always has a single start
/// state. `Automaton` is what [`graph_to_nfa`](crate::graph) and the
/// boolean-matrix-engine's RSM builder (spec.md §4.1, §4.8) construct:
/// both need arbitrary start/final vertex sets.
#[derive(Debug, Clone)]
pub struct Automaton {
    /// Number of states; states are `0..num_states`.
    pub num_states: usize,
    /// Start states.
    pub start: BTreeSet<StateId>,
    /// Final (accepting) states.
    pub final_states: BTreeSet<StateId>,
    /// Adjacency lists.
    pub adjacency: Vec<Vec<Transition>>,
}

impl Automaton {
    /// Outgoing transitions from `state`.
    pub fn transitions(&self, state: StateId) -> &[Transition] {
        &self.adjacency[state as usize]
    }
}

impl From<&Nfa> for Automaton {
    fn from(nfa: &Nfa) -> Self {
        Automaton {
            num_states: nfa.num_states,
            start: BTreeSet::from([nfa.start]),
            final_states: nfa.accepts.iter().copied().collect(),
            adjacency: nfa.adjacency.clone(),
        }
    }
}

impl From<&Dfa> for Automaton {
    fn from(dfa: &Dfa) -> Self {
        let mut adjacency: Vec<Vec<Transition>> = vec![Vec::new(); dfa.num_states];
        for (state, row) in dfa.trans.iter().enumerate() {
            for (symbol_idx, dest) in row.iter().enumerate() {
                if let Some(to) = dest {
                    adjacency[state].push(Transition {
                        to: *to,
                        label: EdgeLabel::Sym(dfa.alphabet[symbol_idx].clone()),
                    });
                }
            }
        }
        Automaton {
            num_states: dfa.num_states,
            start: BTreeSet::from([dfa.start]),
            final_states: dfa.accepts.iter().copied().collect(),
            adjacency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::min::regex_to_min_dfa;
    use crate::regex::Ast;

    #[test]
    fn test_automaton_from_min_dfa_preserves_acceptance() {
        let dfa = regex_to_min_dfa(&Ast::parse_text("a*").unwrap());
        let automaton: Automaton = (&dfa).into();
        assert_eq!(automaton.num_states, dfa.num_states);
        assert_eq!(automaton.final_states.len(), dfa.accepts.len());
    }
}
