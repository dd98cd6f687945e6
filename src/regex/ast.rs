use std::fmt::{self, Display, Formatter};

use crate::errors::{Error, LexError, ParseError};
use crate::regex::lexer::{lex_chars, lex_words};
use crate::regex::parser::parse;

/// An abstract syntax tree for a regular expression over `String` atoms.
///
/// A single AST shape serves both the plain-text regex syntax of
/// [`rpq`](crate::rpq::rpq) (atoms are single characters) and the ECFG
/// production-body syntax (atoms are whitespace-delimited terminal or
/// variable tokens) — see DESIGN.md for why both are unified on `String`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// The empty-string language.
    Epsilon,
    /// A literal atom.
    Atom(String),
    /// Concatenation of two expressions.
    Concat(Box<Ast>, Box<Ast>),
    /// Alternation between two expressions.
    Alt(Box<Ast>, Box<Ast>),
    /// Zero-or-more repetition.
    Star(Box<Ast>),
}

impl Ast {
    #[must_use]
    pub fn concat(lhs: Ast, rhs: Ast) -> Ast {
        Ast::Concat(Box::new(lhs), Box::new(rhs))
    }

    #[must_use]
    pub fn alt(lhs: Ast, rhs: Ast) -> Ast {
        Ast::Alt(Box::new(lhs), Box::new(rhs))
    }

    #[must_use]
    pub fn star(inner: Ast) -> Ast {
        Ast::Star(Box::new(inner))
    }

    /// Parses plain regex text (char atoms) into an [`Ast`].
    pub fn parse_text(input: &str) -> Result<Ast, RegexBuildError> {
        let tokens = lex_chars(input)?;
        Ok(parse(&tokens)?)
    }

    /// Parses an ECFG/CFG production body (word atoms) into an [`Ast`].
    pub fn parse_grammar_body(input: &str) -> Result<Ast, RegexBuildError> {
        let tokens = lex_words(input)?;
        Ok(parse(&tokens)?)
    }
}

impl Display for Ast {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Ast::Epsilon => write!(f, "ε"),
            Ast::Atom(s) => write!(f, "{s}"),
            Ast::Concat(l, r) => write!(f, "({l}{r})"),
            Ast::Alt(l, r) => write!(f, "({l}|{r})"),
            Ast::Star(inner) => write!(f, "({inner})*"),
        }
    }
}

/// Error produced while building an [`Ast`] from text: either a lexical
/// or a parse failure.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RegexBuildError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl From<RegexBuildError> for Error {
    fn from(err: RegexBuildError) -> Self {
        Error::InvalidRegex(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_concat() {
        let ast = Ast::parse_text("ab").unwrap();
        assert_eq!(
            ast,
            Ast::Concat(
                Box::new(Ast::Atom("a".into())),
                Box::new(Ast::Atom("b".into()))
            )
        );
    }

    #[test]
    fn test_parse_text_star_and_alt() {
        let ast = Ast::parse_text("a*|b").unwrap();
        assert_eq!(
            ast,
            Ast::Alt(
                Box::new(Ast::Star(Box::new(Ast::Atom("a".into())))),
                Box::new(Ast::Atom("b".into())),
            )
        );
    }

    #[test]
    fn test_parse_grammar_body_variable() {
        let ast = Ast::parse_grammar_body("a S | $").unwrap();
        assert_eq!(
            ast,
            Ast::Alt(
                Box::new(Ast::Concat(
                    Box::new(Ast::Atom("a".into())),
                    Box::new(Ast::Atom("S".into())),
                )),
                Box::new(Ast::Epsilon),
            )
        );
    }
}
