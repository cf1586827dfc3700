//! AST node types for the WHILE and FUN dialects, shared by their parsers
//! and evaluators.

pub mod fun_lang;
mod ops;
pub mod while_lang;

pub use ops::{AOp, CmpOp, LogOp};
