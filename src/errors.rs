use std::fmt::{self, Display, Formatter};

use thiserror::Error;

/// Lexical error raised while tokenizing a regular expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message} at column {column}")]
pub struct LexError {
    /// Column at which the error occurred (1-indexed).
    pub column: usize,
    /// Human-readable error message.
    pub message: String,
}

impl LexError {
    #[must_use]
    pub fn new(column: usize, message: impl Into<String>) -> Self {
        Self {
            column,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEos,
    #[error("unexpected token {found}")]
    UnexpectedToken { found: String },
    #[error("missing closing parenthesis")]
    MissingRParen,
    #[error("illegal postfix operator usage")]
    MisplacedPostfix,
    #[error("empty alternative")]
    EmptyAlternative,
}

/// Parser error annotated with the offending column and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Column at which the parser reported the error.
    pub column: usize,
    /// Detailed categorization of the error.
    pub kind: ParseErrorKind,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} at column {}", self.kind, self.column)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    #[must_use]
    pub fn new(column: usize, kind: ParseErrorKind) -> Self {
        Self { column, kind }
    }
}

/// Errors surfaced by the engine to its callers (spec.md §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Missing/empty/non-`.txt` grammar file.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Unparseable CFG production-rule text.
    #[error("invalid grammar: {0}")]
    InvalidGrammar(String),

    /// Multiple `->` on an ECFG line, or a variable with more than one rule.
    #[error("invalid ECFG format: {0}")]
    InvalidECFGFormat(String),

    /// Malformed regular expression.
    #[error("invalid regex: {0}")]
    InvalidRegex(String),

    /// A requested start/final vertex is not a member of the graph.
    #[error("invalid state set: {0}")]
    InvalidStateSet(String),

    /// A query operation was applied to an incompatible operand.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
}

impl From<LexError> for Error {
    fn from(err: LexError) -> Self {
        Error::InvalidRegex(err.to_string())
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::InvalidRegex(err.to_string())
    }
}
