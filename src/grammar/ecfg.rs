//! Extended context-free grammars: exactly one regex body per variable
//! (spec.md §3 "ECFG", §4.5 "CFG → ECFG", §6 "ECFG text format").

use std::collections::HashMap;

use crate::errors::Error;
use crate::grammar::cfg::{Cfg, Symbol};
use crate::grammar::symbols::{is_variable_name, Interner, VariableId};
use crate::regex::Ast;

/// An extended CFG: a start symbol and exactly one regex body per
/// variable.
#[derive(Debug, Clone)]
pub struct Ecfg {
    pub start: VariableId,
    pub bodies: HashMap<VariableId, Ast>,
    pub interner: Interner,
}

impl Ecfg {
    /// Builds an ECFG from a CFG by unioning the regex corresponding to
    /// each body with the given head; an empty body becomes the
    /// epsilon regex (spec.md §4.5 "CFG → ECFG").
    #[must_use]
    pub fn from_cfg(cfg: &Cfg) -> Ecfg {
        let mut bodies: HashMap<VariableId, Ast> = HashMap::new();
        for head in cfg.variables() {
            bodies.insert(head, Ast::Epsilon);
            // overwritten below if productions exist; Epsilon as a
            // placeholder means "no productions for this head".
        }
        let mut has_production: HashMap<VariableId, bool> = HashMap::new();
        for p in &cfg.productions {
            let body_ast = symbols_to_ast(&p.body, &cfg.interner);
            let entry = bodies.entry(p.head).or_insert(Ast::Epsilon);
            if *has_production.get(&p.head).unwrap_or(&false) {
                *entry = Ast::alt(entry.clone(), body_ast);
            } else {
                *entry = body_ast;
                has_production.insert(p.head, true);
            }
        }

        Ecfg {
            start: cfg.start,
            bodies,
            interner: cfg.interner.clone(),
        }
    }

    /// Parses the ECFG text format of spec.md §6 / §4.5: one rule per
    /// line, `HEAD -> REGEX`, exactly one rule per head.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidECFGFormat`] when a non-blank line has
    /// zero or more than one `->`, or a variable has more than one
    /// rule.
    pub fn parse(text: &str) -> Result<Ecfg, Error> {
        let mut interner = Interner::new();
        let mut bodies: HashMap<VariableId, Ast> = HashMap::new();
        let mut start = None;

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let arrow_count = line.matches("->").count();
            if arrow_count != 1 {
                return Err(Error::InvalidECFGFormat(format!(
                    "expected exactly one '->' in line: {line}"
                )));
            }
            let mut parts = line.splitn(2, "->");
            let head_text = parts.next().unwrap().trim();
            let body_text = parts.next().unwrap().trim();

            if !is_variable_name(head_text) {
                return Err(Error::InvalidECFGFormat(format!(
                    "head '{head_text}' must start with an uppercase letter"
                )));
            }
            let head = interner.intern(head_text);
            if bodies.contains_key(&head) {
                return Err(Error::InvalidECFGFormat(format!(
                    "variable '{head_text}' has more than one rule"
                )));
            }
            if start.is_none() {
                start = Some(head);
            }

            let ast = Ast::parse_grammar_body(body_text)?;
            bodies.insert(head, ast);
        }

        let start = start.ok_or_else(|| {
            Error::InvalidECFGFormat("ECFG text has no rules".to_string())
        })?;

        Ok(Ecfg {
            start,
            bodies,
            interner,
        })
    }
}

/// Translates a production body into a regex AST. Variable symbols
/// become atoms spelled as the variable's own name — distinct from any
/// terminal atom by the uppercase-initial invariant of spec.md §6, so
/// RSM box alphabets (spec.md §3 "variable V with a minimal DFA whose
/// alphabet ranges over terminals ∪ variables") need no separate
/// encoding.
fn symbols_to_ast(body: &[Symbol], interner: &Interner) -> Ast {
    if body.is_empty() {
        return Ast::Epsilon;
    }
    let mut iter = body.iter();
    let mut acc = symbol_to_ast(iter.next().unwrap(), interner);
    for sym in iter {
        acc = Ast::concat(acc, symbol_to_ast(sym, interner));
    }
    acc
}

fn symbol_to_ast(symbol: &Symbol, interner: &Interner) -> Ast {
    match symbol {
        Symbol::Var(v) => Ast::Atom(interner.name(*v).to_string()),
        Symbol::Term(t) => Ast::Atom(t.clone()),
    }
}
