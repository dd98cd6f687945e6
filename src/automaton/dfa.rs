use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;

use crate::automaton::nfa::{Nfa, StateId};

/// Deterministic finite automaton produced from subset construction
/// (spec.md §3 DFA, §4.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    /// Number of states; states are `0..num_states`.
    pub num_states: usize,
    /// Start state identifier.
    pub start: StateId,
    /// Accepting state identifiers.
    pub accepts: Vec<StateId>,
    /// Alphabet, indexing the columns of `trans`.
    pub alphabet: Vec<String>,
    /// Transition table indexed by state then alphabet position.
    /// `None` indicates a transition into a dead state.
    pub trans: Vec<Vec<Option<StateId>>>,
}

impl Dfa {
    /// Simulates the DFA over a sequence of symbols.
    #[must_use]
    pub fn accepts(&self, word: &[&str]) -> bool {
        let mut state = self.start;
        for symbol in word {
            let Some(idx) = self.alphabet.iter().position(|s| s == symbol) else {
                return false;
            };
            match self.trans[state as usize][idx] {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.accepts.contains(&state)
    }

    /// Whether this DFA accepts the empty string.
    #[must_use]
    pub fn accepts_epsilon(&self) -> bool {
        self.accepts.contains(&self.start)
    }

    /// Language equivalence via product-automaton walk: two DFAs
    /// recognize the same language iff no reachable pair of states
    /// disagrees on acceptance (spec.md §8, testable property 1).
    #[must_use]
    pub fn is_equivalent_to(&self, other: &Dfa) -> bool {
        let mut alphabet: Vec<String> = self
            .alphabet
            .iter()
            .chain(other.alphabet.iter())
            .cloned()
            .collect();
        alphabet.sort_unstable();
        alphabet.dedup();

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back((self.start, other.start));
        visited.insert((self.start, other.start));

        while let Some((a, b)) = queue.pop_front() {
            if self.accepts.contains(&a) != other.accepts.contains(&b) {
                return false;
            }
            for symbol in &alphabet {
                let next_a = step(self, a, symbol);
                let next_b = step(other, b, symbol);
                match (next_a, next_b) {
                    (None, None) => {}
                    (Some(_), None) | (None, Some(_)) => return false,
                    (Some(na), Some(nb)) => {
                        if visited.insert((na, nb)) {
                            queue.push_back((na, nb));
                        }
                    }
                }
            }
        }
        true
    }
}

fn step(dfa: &Dfa, state: StateId, symbol: &str) -> Option<StateId> {
    let idx = dfa.alphabet.iter().position(|s| s == symbol)?;
    dfa.trans[state as usize][idx]
}

/// Determinizes an NFA into a [`Dfa`] using subset construction.
#[must_use]
pub fn determinize(nfa: &Nfa) -> Dfa {
    Determinizer::new(nfa).run()
}

fn set_to_key(set: HashSet<StateId>) -> Vec<StateId> {
    let mut vec: Vec<StateId> = set.into_iter().collect();
    vec.sort_unstable();
    vec
}

struct Determinizer<'a> {
    nfa: &'a Nfa,
    alphabet: Vec<String>,
    map: IndexMap<Vec<StateId>, StateId>,
    queue: VecDeque<Vec<StateId>>,
    transitions: Vec<Vec<Option<StateId>>>,
}

impl<'a> Determinizer<'a> {
    fn new(nfa: &'a Nfa) -> Self {
        let alphabet = nfa.alphabet();
        let mut map = IndexMap::new();
        let mut queue = VecDeque::new();

        let mut seed = HashSet::new();
        seed.insert(nfa.start);
        let closure = nfa.epsilon_closure(&seed);
        let start_key = set_to_key(closure);

        map.insert(start_key.clone(), 0);
        queue.push_back(start_key);

        Self {
            nfa,
            alphabet,
            map,
            queue,
            transitions: Vec::new(),
        }
    }

    fn run(mut self) -> Dfa {
        while let Some(key) = self.queue.pop_front() {
            let state_id = self.map[&key];
            self.ensure_capacity(state_id as usize + 1);
            let subset: HashSet<StateId> = key.iter().copied().collect();

            for symbol_idx in 0..self.alphabet.len() {
                let symbol = self.alphabet[symbol_idx].clone();
                let next = self.advance_subset(&subset, &symbol);
                self.transitions[state_id as usize][symbol_idx] = next;
            }
        }

        let accepts = self.collect_accepting();
        Dfa {
            num_states: self.map.len(),
            start: 0,
            accepts,
            alphabet: self.alphabet,
            trans: self.transitions,
        }
    }

    fn ensure_capacity(&mut self, len: usize) {
        while self.transitions.len() < len {
            self.transitions.push(vec![None; self.alphabet.len()]);
        }
    }

    fn advance_subset(&mut self, subset: &HashSet<StateId>, symbol: &str) -> Option<StateId> {
        let moved = self.nfa.move_on(subset, symbol);
        if moved.is_empty() {
            return None;
        }
        let closure = self.nfa.epsilon_closure(&moved);
        Some(self.lookup_or_insert(closure))
    }

    fn lookup_or_insert(&mut self, subset: HashSet<StateId>) -> StateId {
        let key = set_to_key(subset);
        if let Some(id) = self.map.get(&key) {
            *id
        } else {
            let new_id = self.map.len() as StateId;
            self.map.insert(key.clone(), new_id);
            self.queue.push_back(key);
            new_id
        }
    }

    fn collect_accepting(&self) -> Vec<StateId> {
        self.map
            .iter()
            .filter_map(|(subset, id)| {
                let accepting = subset.iter().any(|state| self.nfa.accepts.contains(state));
                accepting.then_some(*id)
            })
            .collect()
    }
}
