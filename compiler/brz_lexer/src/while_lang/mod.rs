//! Lexing entry point for WHILE.

mod regex;

use crate::token::{Token, WhileTokenKind};
use brz_diagnostic::{BrzError, Span};
use brz_regex::lex_bytes;
use regex::language_regex;
use tracing::debug;

/// Lex a WHILE source file into tokens, discarding whitespace and comments.
pub fn lex(src: &str) -> Result<Vec<Token<WhileTokenKind>>, BrzError> {
    let bytes = src.as_bytes();
    let value = lex_bytes(language_regex(), bytes)
        .map_err(|failure| BrzError::lex(failure.offset, failure.byte))?;

    let mut tokens = Vec::new();
    let mut offset = 0u32;
    for (tag, lexeme) in value.env() {
        let len = lexeme.len() as u32;
        let span = Span::new(offset, offset + len);
        offset += len;
        let lexeme = String::from_utf8_lossy(&lexeme).into_owned();
        if let Some(kind) = to_token_kind(&tag, lexeme, span)? {
            tokens.push(Token::new(kind, span));
        }
    }
    debug!(count = tokens.len(), "lexed WHILE source");
    Ok(tokens)
}

fn to_token_kind(tag: &str, lexeme: String, span: Span) -> Result<Option<WhileTokenKind>, BrzError> {
    let kind = match tag {
        "k" => WhileTokenKind::Keyword(lexeme),
        "o" => WhileTokenKind::Op(lexeme),
        "str" => WhileTokenKind::Str(unquote(&lexeme)),
        "p" => WhileTokenKind::Paren(lexeme),
        "s" => WhileTokenKind::Semi,
        "i" => WhileTokenKind::Id(lexeme),
        "n" => WhileTokenKind::Num(
            lexeme
                .parse()
                .map_err(|_| BrzError::parse(0, "a well-formed integer literal", span))?,
        ),
        "w" | "c" => return Ok(None),
        _ => unreachable!("language_regex only tags k/o/str/p/s/i/n/w/c"),
    };
    Ok(Some(kind))
}

/// Strip the surrounding `"` quotes a `STRING_REGEX` match always carries.
fn unquote(lexeme: &str) -> String {
    lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme)
        .to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn lexes_a_small_program() {
        let tokens = lex("while a == 0 {\n    a := a + 1\n};").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| &t.kind).collect();
        assert!(matches!(kinds[0], WhileTokenKind::Keyword(k) if k == "while"));
        assert!(matches!(kinds[1], WhileTokenKind::Id(id) if id == "a"));
        assert!(matches!(kinds[2], WhileTokenKind::Op(op) if op == "=="));
    }

    #[test]
    fn strings_are_unquoted() {
        let tokens = lex("write \"hi\";").unwrap();
        let str_tok = tokens.iter().find(|t| matches!(t.kind, WhileTokenKind::Str(_))).unwrap();
        assert!(matches!(&str_tok.kind, WhileTokenKind::Str(s) if s == "hi"));
    }

    #[test]
    fn unlexable_byte_reports_its_offset() {
        let err = lex("a := @").unwrap_err();
        assert_eq!(format!("{err}"), "lex error at byte offset 5: unexpected byte 0x40");
    }
}
