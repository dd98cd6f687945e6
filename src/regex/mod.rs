//! Regular-expression front end: lexer, parser and AST shared by the
//! plain-text RPQ regex syntax and the ECFG production-body syntax
//! (spec.md §4.2, §4.5).

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod tokens;

pub use ast::{Ast, RegexBuildError};
