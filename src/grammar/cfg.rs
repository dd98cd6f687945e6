//! Context-free grammars: text parsing, normal-form transforms
//! (spec.md §3 "CFG", §4.5 "Weak CNF", §4.9 CYK uses the same weak
//! CNF directly per SPEC_FULL.md §4).

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::errors::Error;
use crate::grammar::symbols::{is_variable_name, Interner, VariableId};

const EPSILON_SPELLINGS: [&str; 5] = ["epsilon", "$", "ε", "ϵ", "Є"];

fn is_epsilon_word(word: &str) -> bool {
    EPSILON_SPELLINGS.contains(&word)
}

/// A symbol appearing in a production body: either a nonterminal or a
/// terminal token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Var(VariableId),
    Term(String),
}

/// One production `head -> body` (an empty body means `head -> ε`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub head: VariableId,
    pub body: Vec<Symbol>,
}

/// A context-free grammar: a start symbol and a set of productions
/// (spec.md §3). Variables are interned for small-integer identity
/// (spec.md §9).
#[derive(Debug, Clone)]
pub struct Cfg {
    pub start: VariableId,
    pub productions: Vec<Production>,
    pub interner: Interner,
}

/// Default start symbol when a grammar text doesn't specify one
/// (spec.md §6).
pub const DEFAULT_START: &str = "S";

impl Cfg {
    /// Parses the grammar text format of spec.md §6:
    /// `HEAD -> BODY1 | BODY2 | … | BODYn`, one or more lines, variables
    /// uppercase-initial, terminals otherwise, tokens whitespace
    /// separated, epsilon spelled as any of `epsilon`, `$`, `ε`, `ϵ`, `Є`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGrammar`] for lines missing `->`, or for
    /// a head token that is not a valid (uppercase-initial) variable
    /// name.
    pub fn parse(text: &str) -> Result<Cfg, Error> {
        let mut interner = Interner::new();
        let start = interner.intern(DEFAULT_START);
        let mut productions = Vec::new();

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, "->");
            let head_text = parts
                .next()
                .ok_or_else(|| Error::InvalidGrammar(format!("missing '->' in line: {line}")))?
                .trim();
            let rest = parts
                .next()
                .ok_or_else(|| Error::InvalidGrammar(format!("missing '->' in line: {line}")))?;

            if !is_variable_name(head_text) {
                return Err(Error::InvalidGrammar(format!(
                    "production head '{head_text}' must start with an uppercase letter"
                )));
            }
            let head = interner.intern(head_text);

            for alt in rest.split('|') {
                let body = parse_body(alt, &mut interner)?;
                productions.push(Production { head, body });
            }
        }

        Ok(Cfg {
            start,
            productions,
            interner,
        })
    }

    /// All variables that appear as the head of at least one production,
    /// plus the start symbol.
    #[must_use]
    pub fn variables(&self) -> BTreeSet<VariableId> {
        let mut vars: BTreeSet<VariableId> = self.productions.iter().map(|p| p.head).collect();
        vars.insert(self.start);
        vars
    }

    /// Whether the grammar generates the empty string (used by CYK's
    /// empty-word special case, spec.md §4.9). Distinct from
    /// [`generating_set`]'s "can derive some terminal string": a
    /// variable with only `A -> a b` can derive a terminal string
    /// without ever deriving ε.
    #[must_use]
    pub fn generates_epsilon(&self) -> bool {
        nullable_set(self).contains(&self.start)
    }

    /// Removes useless symbols: first non-generating symbols, then
    /// unreachable symbols (spec.md §4.5 "remove useless symbols,
    /// eliminate unit productions, remove useless symbols again").
    #[must_use]
    pub fn remove_useless_symbols(&self) -> Cfg {
        let generating = generating_set(self);
        let is_generating = |s: &Symbol| match s {
            Symbol::Term(_) => true,
            Symbol::Var(v) => generating.get(v).copied().unwrap_or(false),
        };
        let kept: Vec<Production> = self
            .productions
            .iter()
            .filter(|p| {
                generating.get(&p.head).copied().unwrap_or(false)
                    && p.body.iter().all(is_generating)
            })
            .cloned()
            .collect();

        let mut cfg = Cfg {
            start: self.start,
            productions: kept,
            interner: self.interner.clone(),
        };

        let reachable = reachable_set(&cfg);
        cfg.productions
            .retain(|p| reachable.contains(&p.head));
        cfg
    }

    /// Eliminates unit productions `A -> B` (single-variable bodies),
    /// per spec.md §4.5: transitively replaces each unit pair `(A, B)`
    /// with `A`'s copies of `B`'s non-unit productions.
    #[must_use]
    pub fn eliminate_unit_productions(&self) -> Cfg {
        let vars: Vec<VariableId> = self.variables().into_iter().collect();
        let mut unit_closure: HashMap<VariableId, HashSet<VariableId>> = HashMap::new();
        for &v in &vars {
            unit_closure.entry(v).or_default().insert(v);
        }

        let direct_units: Vec<(VariableId, VariableId)> = self
            .productions
            .iter()
            .filter_map(|p| match p.body.as_slice() {
                [Symbol::Var(b)] => Some((p.head, *b)),
                _ => None,
            })
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for &(a, b) in &direct_units {
                let reachable_from_b: Vec<VariableId> =
                    unit_closure.get(&b).cloned().unwrap_or_default().into_iter().collect();
                let entry = unit_closure.entry(a).or_default();
                for c in reachable_from_b {
                    if entry.insert(c) {
                        changed = true;
                    }
                }
            }
        }

        let non_unit: Vec<&Production> = self
            .productions
            .iter()
            .filter(|p| !matches!(p.body.as_slice(), [Symbol::Var(_)]))
            .collect();

        let mut productions = Vec::new();
        for &a in &vars {
            let Some(closure) = unit_closure.get(&a) else {
                continue;
            };
            for &b in closure {
                for p in &non_unit {
                    if p.head == b {
                        productions.push(Production {
                            head: a,
                            body: p.body.clone(),
                        });
                    }
                }
            }
        }

        Cfg {
            start: self.start,
            productions,
            interner: self.interner.clone(),
        }
    }

    /// Converts this grammar to weak Chomsky normal form: every
    /// production is `A -> BC`, `A -> a`, or `A -> ε` (spec.md §4.5,
    /// §3 "Weak CNF invariant"). Reachable ε-productions are preserved.
    #[must_use]
    pub fn to_wcnf(&self) -> Cfg {
        let cfg = self.remove_useless_symbols();
        let cfg = cfg.eliminate_unit_productions();
        let mut cfg = cfg.remove_useless_symbols();

        // Introduce a fresh variable per distinct terminal so that
        // mixed bodies (length >= 2 with a terminal) become all-variable
        // before binarization.
        let mut term_vars: HashMap<String, VariableId> = HashMap::new();
        let mut extra = Vec::new();
        let mut fresh = FreshNamer::new(&mut cfg.interner);

        let mut decomposed = Vec::new();
        for p in &cfg.productions {
            match p.body.len() {
                0 => decomposed.push(p.clone()),
                1 => decomposed.push(p.clone()),
                _ => {
                    let mut symbols = Vec::with_capacity(p.body.len());
                    for s in &p.body {
                        match s {
                            Symbol::Var(v) => symbols.push(*v),
                            Symbol::Term(t) => {
                                let v = *term_vars.entry(t.clone()).or_insert_with(|| {
                                    let id = fresh.next("T");
                                    extra.push(Production {
                                        head: id,
                                        body: vec![Symbol::Term(t.clone())],
                                    });
                                    id
                                });
                                symbols.push(v);
                            }
                        }
                    }
                    decomposed.push(Production {
                        head: p.head,
                        body: symbols.into_iter().map(Symbol::Var).collect(),
                    });
                }
            }
        }
        decomposed.extend(extra);

        // Binarize bodies of length > 2 via fresh "head_k" chains.
        let mut binary = Vec::new();
        for p in decomposed {
            if p.body.len() <= 2 {
                binary.push(p);
                continue;
            }
            let vars: Vec<VariableId> = p
                .body
                .iter()
                .map(|s| match s {
                    Symbol::Var(v) => *v,
                    Symbol::Term(_) => unreachable!("terminals already lifted above"),
                })
                .collect();

            let mut current_head = p.head;
            for i in 0..vars.len() - 2 {
                let next = fresh.next("X");
                binary.push(Production {
                    head: current_head,
                    body: vec![Symbol::Var(vars[i]), Symbol::Var(next)],
                });
                current_head = next;
            }
            binary.push(Production {
                head: current_head,
                body: vec![
                    Symbol::Var(vars[vars.len() - 2]),
                    Symbol::Var(vars[vars.len() - 1]),
                ],
            });
        }

        cfg.productions = binary;
        cfg
    }
}

struct FreshNamer<'a> {
    interner: &'a mut Interner,
    counter: u32,
}

impl<'a> FreshNamer<'a> {
    fn new(interner: &'a mut Interner) -> Self {
        Self {
            interner,
            counter: 0,
        }
    }

    fn next(&mut self, prefix: &str) -> VariableId {
        loop {
            let name = format!("{prefix}#{}", self.counter);
            self.counter += 1;
            if self.interner.get(&name).is_none() {
                return self.interner.intern(&name);
            }
        }
    }
}

fn parse_body(alt: &str, interner: &mut Interner) -> Result<Vec<Symbol>, Error> {
    let tokens: Vec<&str> = alt.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    if tokens.len() == 1 && is_epsilon_word(tokens[0]) {
        return Ok(Vec::new());
    }
    let mut body = Vec::with_capacity(tokens.len());
    for tok in tokens {
        if is_epsilon_word(tok) {
            continue;
        }
        if is_variable_name(tok) {
            body.push(Symbol::Var(interner.intern(tok)));
        } else {
            body.push(Symbol::Term(tok.to_string()));
        }
    }
    Ok(body)
}

/// Fixed-point computation of which variables can derive some
/// terminal string (possibly ε).
fn generating_set(cfg: &Cfg) -> HashMap<VariableId, bool> {
    let mut generating: HashMap<VariableId, bool> =
        cfg.variables().into_iter().map(|v| (v, false)).collect();
    let mut changed = true;
    while changed {
        changed = false;
        for p in &cfg.productions {
            if generating.get(&p.head).copied().unwrap_or(false) {
                continue;
            }
            let all_generating = p.body.iter().all(|s| match s {
                Symbol::Term(_) => true,
                Symbol::Var(v) => generating.get(v).copied().unwrap_or(false),
            });
            if all_generating {
                generating.insert(p.head, true);
                changed = true;
            }
        }
    }
    generating
}

/// Fixed-point computation of which variables can derive exactly the
/// empty string: a variable is nullable if it has an empty-body
/// production, or a production whose entire body is nullable
/// variables (a terminal anywhere in the body rules the production out,
/// since a terminal can never vanish).
fn nullable_set(cfg: &Cfg) -> HashSet<VariableId> {
    let mut nullable: HashSet<VariableId> = HashSet::new();
    let mut changed = true;
    while changed {
        changed = false;
        for p in &cfg.productions {
            if nullable.contains(&p.head) {
                continue;
            }
            let all_nullable_vars = p.body.iter().all(|s| match s {
                Symbol::Term(_) => false,
                Symbol::Var(v) => nullable.contains(v),
            });
            if all_nullable_vars {
                nullable.insert(p.head);
                changed = true;
            }
        }
    }
    nullable
}

/// BFS over production bodies from the start symbol.
fn reachable_set(cfg: &Cfg) -> HashSet<VariableId> {
    let mut reachable = HashSet::new();
    reachable.insert(cfg.start);
    let mut stack = vec![cfg.start];
    while let Some(v) = stack.pop() {
        for p in &cfg.productions {
            if p.head != v {
                continue;
            }
            for s in &p.body {
                if let Symbol::Var(u) = s {
                    if reachable.insert(*u) {
                        stack.push(*u);
                    }
                }
            }
        }
    }
    reachable
}

/// Checks that `cfg_nf` is in weak Chomsky normal form *relative to*
/// `cfg_old`, the pre-transform grammar it was derived from (spec.md
/// §4.5, §3 "Weak CNF invariant": "Reachable ε-productions must be
/// preserved (invariant checked by `is_wcnf`)"). Two conditions must
/// both hold:
///
/// 1. every production of `cfg_nf` matches `A -> BC`, `A -> a`, or
///    `A -> ε`;
/// 2. every ε-production of `cfg_old` whose head is still reachable in
///    `cfg_nf` survives as an ε-production of `cfg_nf` (ported from
///    `cfg_utils.py`'s `__check_epsilons`, which `is_wcnf(cfg_nf,
///    cfg_old)` calls for exactly this reason).
///
/// A single-argument checker can only ever see the transformed grammar,
/// so it is structurally unable to tell whether `to_wcnf` silently
/// dropped a reachable ε-production — hence the second grammar.
#[must_use]
pub fn is_wcnf(cfg_nf: &Cfg, cfg_old: &Cfg) -> bool {
    let shape_ok = cfg_nf.productions.iter().all(|p| match p.body.as_slice() {
        [] => true,
        [Symbol::Term(_)] => true,
        [Symbol::Var(_), Symbol::Var(_)] => true,
        _ => false,
    });
    shape_ok && check_epsilons(cfg_nf, cfg_old)
}

/// Ported from `cfg_utils.py`'s `__check_epsilons`: every ε-production
/// of `cfg_old` headed by a variable reachable in `cfg_nf` (i.e. a
/// variable name `cfg_nf` still has productions for) must appear as an
/// ε-production of `cfg_nf`. Matched by variable *name* rather than
/// `VariableId`, since `cfg_old` and `cfg_nf` may carry independently
/// grown interners.
fn check_epsilons(cfg_nf: &Cfg, cfg_old: &Cfg) -> bool {
    let reachable_names: HashSet<&str> = cfg_nf
        .variables()
        .iter()
        .map(|&v| cfg_nf.interner.name(v))
        .collect();

    let old_epsilon_heads: HashSet<&str> = cfg_old
        .productions
        .iter()
        .filter(|p| p.body.is_empty())
        .map(|p| cfg_old.interner.name(p.head))
        .filter(|name| reachable_names.contains(name))
        .collect();

    let nf_epsilon_heads: HashSet<&str> = cfg_nf
        .productions
        .iter()
        .filter(|p| p.body.is_empty())
        .map(|p| cfg_nf.interner.name(p.head))
        .collect();

    old_epsilon_heads.iter().all(|name| nf_epsilon_heads.contains(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_grammar() {
        let cfg = Cfg::parse("S -> a S b S | epsilon").unwrap();
        assert_eq!(cfg.productions.len(), 2);
        assert_eq!(cfg.interner.name(cfg.start), "S");
    }

    #[test]
    fn test_parse_rejects_lowercase_head() {
        assert!(Cfg::parse("s -> a").is_err());
    }

    #[test]
    fn test_to_wcnf_is_wcnf_and_preserves_epsilon() {
        let cfg = Cfg::parse("S -> A S B S | epsilon\nA -> a\nB -> b").unwrap();
        let wcnf = cfg.to_wcnf();
        assert!(is_wcnf(&wcnf, &cfg));
        assert!(wcnf.generates_epsilon());
    }

    #[test]
    fn test_to_wcnf_binarizes_long_bodies() {
        let cfg = Cfg::parse("S -> a a a a").unwrap();
        let wcnf = cfg.to_wcnf();
        assert!(is_wcnf(&wcnf, &cfg));
        assert!(!wcnf.generates_epsilon());
    }

    #[test]
    fn test_is_wcnf_rejects_dropped_reachable_epsilon() {
        // A reachable ε-production (`A -> epsilon`) dropped from the
        // "normal form" grammar must fail is_wcnf even though the
        // remaining productions are shape-valid.
        let cfg_old = Cfg::parse("S -> A B\nA -> a\nA -> epsilon\nB -> b").unwrap();
        let a = cfg_old.interner.get("A").unwrap();
        let b = cfg_old.interner.get("B").unwrap();
        let s = cfg_old.start;
        let broken_nf = Cfg {
            start: s,
            productions: vec![
                Production {
                    head: s,
                    body: vec![Symbol::Var(a), Symbol::Var(b)],
                },
                Production {
                    head: a,
                    body: vec![Symbol::Term("a".into())],
                },
                Production {
                    head: b,
                    body: vec![Symbol::Term("b".into())],
                },
            ],
            interner: cfg_old.interner.clone(),
        };
        assert!(!is_wcnf(&broken_nf, &cfg_old));
    }

    #[test]
    fn test_generates_epsilon_false_for_grammar_that_only_derives_nonempty_strings() {
        // S derives "ab" (a non-empty terminal string) but never ε: a
        // grammar can be "generating" without being nullable.
        let cfg = Cfg::parse("S -> a S b | a b").unwrap();
        assert!(!cfg.generates_epsilon());
        assert!(!cfg.to_wcnf().generates_epsilon());
    }

    #[test]
    fn test_eliminate_unit_productions_copies_bodies() {
        let cfg = Cfg::parse("S -> A\nA -> a").unwrap();
        let no_units = cfg.eliminate_unit_productions();
        let s = no_units.start;
        assert!(no_units
            .productions
            .iter()
            .any(|p| p.head == s && p.body == vec![Symbol::Term("a".into())]));
    }
}
