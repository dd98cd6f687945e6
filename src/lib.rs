//! `langreach` — a language-constrained reachability engine.
//!
//! Given a directed edge-labeled multigraph and a regular or
//! context-free language, this crate computes the set of vertex pairs
//! `(u, v)` such that some path from `u` to `v` has a labeling in the
//! language (spec.md §1). Three coupled kernels do the work:
//!
//! - a boolean-matrix automaton engine ([`sbm`]) computing automaton
//!   intersection (via Kronecker product) and transitive closure;
//! - a regular path query solver ([`rpq`]);
//! - a context-free path query solver ([`cfpq`]) with three
//!   interchangeable algorithmic variants (Hellings, matrix, tensor).
//!
//! The crate is a pure library: each query entry point owns its
//! engines and discards them on return (spec.md §5); it performs no
//! I/O and emits no logs. The `langreach-cli` binary wires up
//! `tracing` around these entry points for observability.

pub mod automaton;
pub mod cfpq;
pub mod cyk;
pub mod errors;
pub mod grammar;
pub mod graph;
pub mod io;
pub mod regex;
pub mod rpq;
pub mod sbm;

pub use cfpq::{cfpq, hellings_cfpq, matrix_cfpq, tensor_cfpq, CfpqAlgorithm};
pub use cyk::cyk;
pub use errors::Error;
pub use graph::{two_cycles_graph, Graph, GraphInfo};
pub use rpq::rpq;

/// Minimizes two regexes' DFAs and compares language equivalence
/// (spec.md §8, testable property 1; SPEC_FULL.md §4 `regex_utils.py`
/// supplement).
///
/// # Errors
///
/// Returns [`Error::InvalidRegex`] if either regex fails to parse.
pub fn regex_equivalent(a: &str, b: &str) -> Result<bool, Error> {
    let ast_a = regex::Ast::parse_text(a)?;
    let ast_b = regex::Ast::parse_text(b)?;
    let dfa_a = automaton::min::regex_to_min_dfa(&ast_a);
    let dfa_b = automaton::min::regex_to_min_dfa(&ast_b);
    Ok(dfa_a.is_equivalent_to(&dfa_b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_equivalent_true_for_reordered_alternation() {
        assert!(regex_equivalent("a|b", "b|a").unwrap());
    }

    #[test]
    fn test_regex_equivalent_false_for_different_languages() {
        assert!(!regex_equivalent("a*", "a").unwrap());
    }
}
