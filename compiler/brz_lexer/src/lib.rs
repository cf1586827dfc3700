//! Token vocabularies and `Recd`-tagged regexes for the WHILE and FUN
//! dialects, built on [`brz_regex`]'s derivative lexer.

mod fun_lang;
mod token;
mod while_lang;

pub use token::{FunTokenKind, Token, WhileTokenKind};

/// Lex a WHILE source file.
pub fn lex_while(src: &str) -> Result<Vec<Token<WhileTokenKind>>, brz_diagnostic::BrzError> {
    while_lang::lex(src)
}

/// Lex a FUN source file.
pub fn lex_fun(src: &str) -> Result<Vec<Token<FunTokenKind>>, brz_diagnostic::BrzError> {
    fun_lang::lex(src)
}
