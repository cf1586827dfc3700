//! Recursive-descent parsers for the WHILE and FUN dialects, built on a
//! shared token [`Cursor`].

mod cursor;
pub mod fun_lang;
pub mod while_lang;

pub use cursor::Cursor;

/// Parse a WHILE program's tokens into a block of statements.
pub fn parse_while(
    tokens: &[brz_lexer::Token<brz_lexer::WhileTokenKind>],
) -> Result<brz_ast::while_lang::Block, brz_diagnostic::BrzError> {
    while_lang::parse(tokens)
}

/// Parse a FUN program's tokens into a declaration list.
pub fn parse_fun(
    tokens: &[brz_lexer::Token<brz_lexer::FunTokenKind>],
) -> Result<brz_ast::fun_lang::Program, brz_diagnostic::BrzError> {
    fun_lang::parse(tokens)
}
