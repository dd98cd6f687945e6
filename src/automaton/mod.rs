//! Finite-automaton model: NFA, DFA, subset construction and
//! minimization (spec.md §3, §4.2).

pub mod dfa;
pub mod labeled;
pub mod min;
pub mod nfa;

pub use dfa::{determinize, Dfa};
pub use labeled::Automaton;
pub use min::{minimize, regex_to_min_dfa};
pub use nfa::{EdgeLabel, Nfa, StateId, Transition};
