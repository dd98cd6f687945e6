use crate::errors::LexError;
use crate::regex::tokens::{Token, TokenKind};

/// The five epsilon spellings accepted by the grammar/regex text formats
/// (spec.md §6).
const EPSILON_SPELLINGS: [&str; 5] = ["epsilon", "$", "ε", "ϵ", "Є"];

fn is_epsilon_word(word: &str) -> bool {
    EPSILON_SPELLINGS.contains(&word)
}

/// Lexes plain regex text (spec.md §6 "Regex syntax"): union `|`,
/// concatenation by juxtaposition or `.`, Kleene star `*`, parentheses,
/// epsilon as `$`. Each character is its own atom.
///
/// # Errors
///
/// Returns a [`LexError`] on a dangling `\` escape.
pub fn lex_chars(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut iter = input.char_indices().peekable();

    while let Some((idx, ch)) = iter.next() {
        let column = idx + 1;
        if ch.is_whitespace() || ch == '.' {
            // '.' is the explicit concatenation operator; juxtaposition
            // already expresses concatenation, so it carries no token.
            continue;
        }
        let kind = match ch {
            '\\' => {
                let (_, next) = iter
                    .next()
                    .ok_or_else(|| LexError::new(column, "dangling escape"))?;
                TokenKind::Atom(next.to_string())
            }
            '|' => TokenKind::Or,
            '*' => TokenKind::Star,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '$' => TokenKind::Epsilon,
            _ => TokenKind::Atom(ch.to_string()),
        };
        tokens.push(Token::new(kind, column));
    }

    tokens.push(Token::new(TokenKind::Eos, input.len() + 1));
    Ok(tokens)
}

/// Lexes an ECFG production body or CFG production body (spec.md §4.5,
/// §6): a regex over terminals and variables. Atoms are maximal runs of
/// word characters; `|`, `*`, `(`, `)` are recognized whether they stand
/// alone (whitespace-separated) or are glued to neighboring atoms.
pub fn lex_words(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (idx, ch) = chars[i];
        let column = idx + 1;

        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        let kind = match ch {
            '|' => {
                i += 1;
                TokenKind::Or
            }
            '*' => {
                i += 1;
                TokenKind::Star
            }
            '(' => {
                i += 1;
                TokenKind::LParen
            }
            ')' => {
                i += 1;
                TokenKind::RParen
            }
            _ => {
                let start = i;
                while i < chars.len() {
                    let (_, c) = chars[i];
                    if c.is_whitespace() || matches!(c, '|' | '*' | '(' | ')') {
                        break;
                    }
                    i += 1;
                }
                let word: String = chars[start..i].iter().map(|(_, c)| *c).collect();
                if is_epsilon_word(&word) {
                    TokenKind::Epsilon
                } else {
                    TokenKind::Atom(word)
                }
            }
        };
        tokens.push(Token::new(kind, column));
    }

    tokens.push(Token::new(TokenKind::Eos, input.len() + 1));
    Ok(tokens)
}
