//! Interned nonterminal symbol table (spec.md §9 "Nonterminal
//! identity"): the source uses string interning via `Variable`
//! wrappers; here that becomes a small integer id so the matrix-
//! indexed CFPQ kernel (§4.7) can use `VariableId` directly as a
//! `Vec`/array index.

use std::collections::HashMap;

/// A small integer id for a grammar nonterminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId(pub u32);

/// Bidirectional `String <-> VariableId` table.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    names: Vec<String>,
    ids: HashMap<String, VariableId>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `name`, returning its existing id or allocating a new one.
    pub fn intern(&mut self, name: &str) -> VariableId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = VariableId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<VariableId> {
        self.ids.get(name).copied()
    }

    #[must_use]
    pub fn name(&self, id: VariableId) -> &str {
        &self.names[id.0 as usize]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = VariableId> + '_ {
        (0..self.names.len() as u32).map(VariableId)
    }
}

/// Variables begin with an uppercase letter; terminals begin with a
/// non-uppercase character (spec.md §6 "Grammar text format").
#[must_use]
pub fn is_variable_name(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase)
}
