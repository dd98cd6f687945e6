use std::collections::HashSet;

use crate::regex::Ast;

/// Identifier type for automaton states (spec.md §3).
pub type StateId = u32;

/// Labels describing the kind of transition between states.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeLabel {
    /// Epsilon transition that consumes no input.
    Eps,
    /// Consumes a specific symbol.
    Sym(String),
}

/// Transition stored in adjacency lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Destination state.
    pub to: StateId,
    /// Transition label.
    pub label: EdgeLabel,
}

/// A Thompson-constructed nondeterministic finite automaton over `String`
/// symbols (spec.md §3 NFA, §4.2).
#[derive(Debug, Clone)]
pub struct Nfa {
    /// Number of states; states are `0..num_states`.
    pub num_states: usize,
    /// Start state.
    pub start: StateId,
    /// Accepting states, unique and sorted.
    pub accepts: Vec<StateId>,
    /// Adjacency lists for efficient traversal.
    pub adjacency: Vec<Vec<Transition>>,
}

impl Nfa {
    /// Returns the outgoing transitions from the given state.
    pub fn transitions(&self, state: StateId) -> &[Transition] {
        &self.adjacency[state as usize]
    }

    /// Computes the alphabet used in this NFA, sorted.
    #[must_use]
    pub fn alphabet(&self) -> Vec<String> {
        let mut symbols: HashSet<&str> = HashSet::new();
        for row in &self.adjacency {
            for tr in row {
                if let EdgeLabel::Sym(s) = &tr.label {
                    symbols.insert(s.as_str());
                }
            }
        }
        let mut symbols: Vec<String> = symbols.into_iter().map(str::to_string).collect();
        symbols.sort_unstable();
        symbols
    }

    /// Builds an [`Nfa`] from a regex AST using Thompson's construction.
    #[must_use]
    pub fn build(ast: &Ast) -> Nfa {
        let mut builder = Builder::default();
        let fragment = builder.build(ast.clone());
        builder.finalize(fragment.start, fragment.accepts)
    }

    /// Computes the epsilon closure of a set of states.
    #[must_use]
    pub fn epsilon_closure(&self, seed: &HashSet<StateId>) -> HashSet<StateId> {
        let mut closure = seed.clone();
        let mut stack: Vec<StateId> = seed.iter().copied().collect();
        while let Some(state) = stack.pop() {
            for tr in self.transitions(state) {
                if tr.label == EdgeLabel::Eps && closure.insert(tr.to) {
                    stack.push(tr.to);
                }
            }
        }
        closure
    }

    /// Moves a set of states across a single symbol (no epsilon closure
    /// applied to the result).
    #[must_use]
    pub fn move_on(&self, states: &HashSet<StateId>, symbol: &str) -> HashSet<StateId> {
        let mut frontier = HashSet::new();
        for &state in states {
            for tr in self.transitions(state) {
                if let EdgeLabel::Sym(s) = &tr.label {
                    if s == symbol {
                        frontier.insert(tr.to);
                    }
                }
            }
        }
        frontier
    }

    /// Simulates the NFA over a sequence of symbols.
    #[must_use]
    pub fn accepts(&self, word: &[&str]) -> bool {
        let mut current = HashSet::new();
        current.insert(self.start);
        current = self.epsilon_closure(&current);
        for symbol in word {
            let moved = self.move_on(&current, symbol);
            current = self.epsilon_closure(&moved);
            if current.is_empty() {
                return false;
            }
        }
        current.iter().any(|state| self.accepts.contains(state))
    }
}

#[derive(Default)]
struct Builder {
    adjacency: Vec<Vec<Transition>>,
}

#[derive(Debug, Clone)]
struct Fragment {
    start: StateId,
    accepts: Vec<StateId>,
}

impl Builder {
    fn new_state(&mut self) -> StateId {
        let id = self.adjacency.len() as StateId;
        self.adjacency.push(Vec::new());
        id
    }

    fn add_edge(&mut self, from: StateId, to: StateId, label: EdgeLabel) {
        self.adjacency[from as usize].push(Transition { to, label });
    }

    fn build(&mut self, ast: Ast) -> Fragment {
        match ast {
            Ast::Epsilon => self.build_epsilon(),
            Ast::Atom(s) => self.build_atom(s),
            Ast::Concat(lhs, rhs) => self.build_concat(*lhs, *rhs),
            Ast::Alt(lhs, rhs) => self.build_alternation(*lhs, *rhs),
            Ast::Star(inner) => self.build_star(*inner),
        }
    }

    fn build_epsilon(&mut self) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        self.add_edge(start, accept, EdgeLabel::Eps);
        Fragment {
            start,
            accepts: vec![accept],
        }
    }

    fn build_atom(&mut self, symbol: String) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        self.add_edge(start, accept, EdgeLabel::Sym(symbol));
        Fragment {
            start,
            accepts: vec![accept],
        }
    }

    fn build_concat(&mut self, lhs: Ast, rhs: Ast) -> Fragment {
        let left = self.build(lhs);
        let right = self.build(rhs);
        for accept in &left.accepts {
            self.add_edge(*accept, right.start, EdgeLabel::Eps);
        }
        Fragment {
            start: left.start,
            accepts: right.accepts,
        }
    }

    fn build_alternation(&mut self, lhs: Ast, rhs: Ast) -> Fragment {
        let left = self.build(lhs);
        let right = self.build(rhs);

        let start = self.new_state();
        let accept = self.new_state();

        self.add_edge(start, left.start, EdgeLabel::Eps);
        self.add_edge(start, right.start, EdgeLabel::Eps);

        for state in left.accepts.iter().chain(right.accepts.iter()) {
            self.add_edge(*state, accept, EdgeLabel::Eps);
        }

        Fragment {
            start,
            accepts: vec![accept],
        }
    }

    fn build_star(&mut self, inner: Ast) -> Fragment {
        let frag = self.build(inner);

        let start = self.new_state();
        let accept = self.new_state();

        self.add_edge(start, frag.start, EdgeLabel::Eps);
        self.add_edge(start, accept, EdgeLabel::Eps);

        for state in frag.accepts {
            self.add_edge(state, frag.start, EdgeLabel::Eps);
            self.add_edge(state, accept, EdgeLabel::Eps);
        }

        Fragment {
            start,
            accepts: vec![accept],
        }
    }

    fn finalize(self, start: StateId, accepts: Vec<StateId>) -> Nfa {
        let mut accepts = accepts;
        accepts.sort_unstable();
        accepts.dedup();

        Nfa {
            num_states: self.adjacency.len(),
            start,
            accepts,
            adjacency: self.adjacency,
        }
    }
}
