//! Brzozowski-derivative regular expressions: the engine the lexer is built
//! on. Owns the data model (`Rexp`, `Val`, `RectFun`) and the five core
//! operations (`nullable`, `der`, `simp`, `inj`, `mkeps`), plus the
//! whole-string lex loop that chains them together.

mod algebra;
mod lex;
mod rectfun;
mod rexp;
mod val;

pub use algebra::{der, inj, mkeps, nullable, simp};
pub use lex::{lex_bytes, LexFailure};
pub use rectfun::{apply, RectFun, RectifyError};
pub use rexp::Rexp;
pub use val::Val;

#[cfg(test)]
mod proptests;
