//! Library surface behind the `brzc` binary: lex, parse, and evaluate a
//! WHILE or FUN source string, independent of file lookup and CLI parsing.
//!
//! Split out so integration tests can drive whole programs end to end
//! without spawning the binary or touching the filesystem.

use brz_diagnostic::BrzError;
use brz_eval::Environment;
use std::io::{BufRead, Write};
use tracing::debug_span;

/// Lex, parse, and run a WHILE program, reading `read` statements from
/// `input` and writing all program output to `output`.
pub fn run_while_source(source: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<(), BrzError> {
    let tokens = debug_span!("lex", dialect = "while").in_scope(|| brz_lexer::lex_while(source))?;
    let block = debug_span!("parse", dialect = "while").in_scope(|| brz_parse::parse_while(&tokens))?;
    let env = Environment::new();
    debug_span!("eval", dialect = "while").in_scope(|| brz_eval::run_while(&block, &env, input, output))
}

/// Lex, parse, and run a FUN program, writing all program output to
/// `output`. Returns `Main`'s result.
pub fn run_fun_source(source: &str, output: &mut impl Write) -> Result<brz_eval::Value, BrzError> {
    let tokens = debug_span!("lex", dialect = "fun").in_scope(|| brz_lexer::lex_fun(source))?;
    let program = debug_span!("parse", dialect = "fun").in_scope(|| brz_parse::parse_fun(&tokens))?;
    debug_span!("eval", dialect = "fun").in_scope(|| brz_eval::run_fun(&program, output))
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn while_source_runs_to_completion() {
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        run_while_source("write 1 + 2", &mut input, &mut output).expect("run should succeed");
        assert_eq!(output, b"3");
    }

    #[test]
    fn fun_source_returns_mains_value() {
        let mut output = Vec::new();
        let result = run_fun_source("3 + 4", &mut output).expect("run should succeed");
        assert!(matches!(result, brz_eval::Value::Int(7)));
    }
}
