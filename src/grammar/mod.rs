//! Grammar model: CFG, ECFG, RSM and the interned symbol table
//! (spec.md §3, §4.5, §4.8).

pub mod cfg;
pub mod ecfg;
pub mod rsm;
pub mod symbols;

pub use cfg::{is_wcnf, Cfg, Production, Symbol};
pub use ecfg::Ecfg;
pub use rsm::{Rsm, RsmBox};
pub use symbols::{Interner, VariableId};
