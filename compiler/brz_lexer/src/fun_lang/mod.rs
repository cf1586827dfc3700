//! Lexing entry point for FUN.

mod regex;

use crate::token::{FunTokenKind, Token};
use brz_diagnostic::{BrzError, Span};
use brz_regex::lex_bytes;
use regex::language_regex;
use tracing::debug;

/// Lex a FUN source file into tokens, discarding whitespace and comments.
pub fn lex(src: &str) -> Result<Vec<Token<FunTokenKind>>, BrzError> {
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
        if let Some(kind) = to_token_kind(&tag, &lexeme, span)? {
            tokens.push(Token::new(kind, span));
        }
    }
    debug!(count = tokens.len(), "lexed FUN source");
    Ok(tokens)
}

fn to_token_kind(tag: &str, lexeme: &str, span: Span) -> Result<Option<FunTokenKind>, BrzError> {
    let kind = match tag {
        "k" => FunTokenKind::Keyword(lexeme.to_owned()),
        "i" => FunTokenKind::Id(lexeme.to_owned()),
        "t" => FunTokenKind::Type(lexeme.to_owned()),
        "ct" => FunTokenKind::Const(lexeme.to_owned()),
        "cr" => FunTokenKind::Char(decode_char_literal(lexeme)),
        "o" => FunTokenKind::Op(lexeme.to_owned()),
        "str" => FunTokenKind::Str(unquote(lexeme)),
        "int" => FunTokenKind::Int(
            lexeme
                .parse()
                .map_err(|_| BrzError::parse(0, "a well-formed integer literal", span))?,
        ),
        "d" => FunTokenKind::Double(
            lexeme
                .parse()
                .map_err(|_| BrzError::parse(0, "a well-formed double literal", span))?,
        ),
        "s" => FunTokenKind::Semi,
        "cl" => FunTokenKind::Colon,
        "c" => FunTokenKind::Comma,
        "pl" => FunTokenKind::LParen,
        "pr" => FunTokenKind::RParen,
        "bl" => FunTokenKind::LBrace,
        "br" => FunTokenKind::RBrace,
        "w" => return Ok(None),
        _ => unreachable!("language_regex only tags k/i/t/ct/cr/o/str/int/d/s/cl/c/pl/pr/bl/br/w"),
    };
    Ok(Some(kind))
}

/// Decode a `'x'` or `'\n'` char literal (quotes included) to its integer
/// code. `'\n'` is special-cased to 10; every other one-character literal
/// decodes to the ASCII code of the byte between the quotes.
fn decode_char_literal(lexeme: &str) -> i32 {
    if lexeme == "'\\n'" {
        10
    } else {
        i32::from(lexeme.as_bytes()[1])
    }
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
    fn lexes_a_small_def() {
        let tokens = lex("def add(x: Int, y: Int): Int = x + y;").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| &t.kind).collect();
        assert!(matches!(kinds[0], FunTokenKind::Keyword(k) if k == "def"));
        assert!(matches!(kinds[1], FunTokenKind::Id(id) if id == "add"));
        assert!(matches!(kinds[2], FunTokenKind::LParen));
    }

    #[test]
    fn char_literal_newline_decodes_to_ten() {
        let tokens = lex("'\\n'").unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0].kind, FunTokenKind::Char(10)));
    }

    #[test]
    fn char_literal_plain_decodes_to_ascii_code() {
        let tokens = lex("'a'").unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0].kind, FunTokenKind::Char(c) if c == i32::from(b'a')));
    }

    #[test]
    fn constants_are_uppercase_started() {
        let tokens = lex("val X = 1;").unwrap();
        assert!(matches!(tokens[1].kind, FunTokenKind::Const(ref s) if s == "X"));
    }
}
