//! Shared helpers for the three CFPQ kernels (spec.md §4.6–§4.8):
//! start/final vertex-set resolution and start-variable resolution.

use std::collections::BTreeSet;

use crate::errors::Error;
use crate::grammar::{Cfg, VariableId};

/// Resolves `start`/`final_` against `num_vertices`, defaulting to all
/// vertices when omitted (spec.md §9 "Start/final fallback").
///
/// # Errors
///
/// Returns [`Error::InvalidStateSet`] if a vertex in either set is out
/// of range.
pub fn resolve_vertex_sets(
    num_vertices: usize,
    start: Option<&BTreeSet<u32>>,
    final_: Option<&BTreeSet<u32>>,
) -> Result<(BTreeSet<u32>, BTreeSet<u32>), Error> {
    let all: BTreeSet<u32> = (0..num_vertices as u32).collect();
    let start_set = start.cloned().unwrap_or_else(|| all.clone());
    let final_set = final_.cloned().unwrap_or_else(|| all.clone());
    for &v in start_set.iter().chain(final_set.iter()) {
        if v as usize >= num_vertices {
            return Err(Error::InvalidStateSet(format!(
                "vertex {v} is not in the graph (0..{num_vertices})"
            )));
        }
    }
    Ok((start_set, final_set))
}

/// Resolves the start variable name against `cfg`'s interner, defaulting
/// to the grammar's own start symbol (spec.md §6 entry points:
/// `start_var?`).
///
/// # Errors
///
/// Returns [`Error::InvalidGrammar`] if `start_var` names a variable
/// absent from the grammar.
pub fn resolve_start_var(cfg: &Cfg, start_var: Option<&str>) -> Result<VariableId, Error> {
    match start_var {
        None => Ok(cfg.start),
        Some(name) => cfg
            .interner
            .get(name)
            .ok_or_else(|| Error::InvalidGrammar(format!("unknown start variable '{name}'"))),
    }
}

/// Binary (`C -> A B`) productions as `(head, left, right)` triples.
#[must_use]
pub fn binary_productions(cfg: &Cfg) -> Vec<(VariableId, VariableId, VariableId)> {
    cfg.productions
        .iter()
        .filter_map(|p| match p.body.as_slice() {
            [crate::grammar::Symbol::Var(a), crate::grammar::Symbol::Var(b)] => {
                Some((p.head, *a, *b))
            }
            _ => None,
        })
        .collect()
}
