//! CYK membership testing (spec.md §4.9): dynamic-programming CFG
//! membership, not reachability.

use std::collections::BTreeSet;

use crate::errors::Error;
use crate::grammar::{Cfg, Symbol, VariableId};

/// Tests whether `word` is generated by the grammar in `cfg_text`
/// (spec.md §4.9, §6 `cyk(cfg_text, word)`).
///
/// `word` is tokenized one Unicode character per terminal, matching the
/// single-character terminal convention of spec.md §8 scenario S4
/// (`"aabb"`, `"abab"`, `"aba"`).
///
/// # Errors
///
/// Propagates [`Error::InvalidGrammar`] from an unparseable `cfg_text`.
pub fn cyk(cfg_text: &str, word: &str) -> Result<bool, Error> {
    let cfg = Cfg::parse(cfg_text)?;
    let wcnf = cfg.to_wcnf();

    if word.is_empty() {
        return Ok(wcnf.generates_epsilon());
    }

    let symbols: Vec<String> = word.chars().map(|c| c.to_string()).collect();
    let n = symbols.len();

    // dp[i][j]: variables deriving word[i..=j] (upper-triangular by
    // span size, spec.md §4.9).
    let mut dp: Vec<Vec<BTreeSet<VariableId>>> = vec![vec![BTreeSet::new(); n]; n];

    for (i, sym) in symbols.iter().enumerate() {
        for p in &wcnf.productions {
            if let [Symbol::Term(t)] = p.body.as_slice() {
                if t == sym {
                    dp[i][i].insert(p.head);
                }
            }
        }
    }

    for len in 2..=n {
        for i in 0..=n - len {
            let j = i + len - 1;
            let mut derived = BTreeSet::new();
            for k in i..j {
                for p in &wcnf.productions {
                    if let [Symbol::Var(b), Symbol::Var(c)] = p.body.as_slice() {
                        if dp[i][k].contains(b) && dp[k + 1][j].contains(c) {
                            derived.insert(p.head);
                        }
                    }
                }
            }
            dp[i][j] = derived;
        }
    }

    Ok(dp[0][n - 1].contains(&wcnf.start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_s4_cyk_acceptance_scenario() {
        // spec.md §8 S4: S -> a S b S | epsilon.
        let cfg_text = "S -> a S b S | epsilon";
        assert!(cyk(cfg_text, "aabb").unwrap());
        assert!(cyk(cfg_text, "abab").unwrap());
        assert!(!cyk(cfg_text, "aba").unwrap());
    }

    #[test]
    fn test_cyk_empty_word_matches_generates_epsilon() {
        assert!(cyk("S -> epsilon", "").unwrap());
        assert!(!cyk("S -> a", "").unwrap());
    }

    #[test]
    fn test_cyk_invalid_grammar_errors() {
        assert!(cyk("s -> a", "a").is_err());
    }
}
