//! The FUN language regex, grounded on `SYM_REGEX`/`UPPERCASE_REGEX`/
//! `DIGIT_REGEX`/`CONST_REGEX`/`ID_REGEX`/`INT_REGEX`/`DOUBLE_REGEX`/
//! `KEYWORDS_REGEX`/`TYPE_REGEX`/`OPERATORS_REGEX`/`STRING_REGEX`/
//! `CHAR_LITERAL_REGEX`/`COMMENT_REGEX`/`FUN_REGEX` in the distilled lexer
//! source, unlike WHILE's split of lowercase identifiers from uppercase
//! constants.

use brz_regex::Rexp;
use std::rc::Rc;

const KEYWORDS: [&str; 5] = ["if", "then", "else", "def", "val"];
const TYPES: [&str; 3] = ["Int", "Double", "Void"];
const OPERATORS: [&str; 11] = ["+", "-", "*", "/", "%", "=", "==", "!=", "<", ">", "<="];
const GE: &str = ">=";

fn sym() -> Rc<Rexp> {
    Rexp::range(*b"abcdefghijklmnopqrstuvwxyzT_")
}

fn upper() -> Rc<Rexp> {
    Rexp::range(*b"ABCDEFGHIJKLMNOPQRSTUVWXYZ")
}

fn digit() -> Rc<Rexp> {
    Rexp::range(*b"0123456789")
}

fn keywords_regex() -> Rc<Rexp> {
    Rexp::alt_many(&KEYWORDS.iter().map(|k| Rexp::string(k)).collect::<Vec<_>>())
}

fn type_regex() -> Rc<Rexp> {
    Rexp::alt_many(&TYPES.iter().map(|t| Rexp::string(t)).collect::<Vec<_>>())
}

fn const_regex() -> Rc<Rexp> {
    let tail = Rexp::alt(sym(), digit());
    Rexp::seq(upper(), Rexp::star(tail))
}

fn id_regex() -> Rc<Rexp> {
    let tail = Rexp::alt(sym(), digit());
    Rexp::seq(sym(), Rexp::star(tail))
}

// Unsigned, unlike the distilled grammar's `INT_REGEX`: a leading `-` is
// not part of the literal, it is the subtraction/negation operator. A
// signed literal regex would win maximal munch over a preceding `-` token
// whenever a digit follows (`n-1` would lex as `Var("n")`, `Int(-1)` with
// no operator at all, swallowing subtraction), which breaks recursive
// calls like `f(n-1)` written without spaces.
fn int_regex() -> Rc<Rexp> {
    let zero = Rexp::char(b'0');
    let nonzero = Rexp::seq(Rexp::range(*b"123456789"), Rexp::star(digit()));
    Rexp::alt(zero, nonzero)
}

fn double_regex() -> Rc<Rexp> {
    let sign = Rexp::optional(Rexp::char(b'-'));
    let int_part = Rexp::seq(sign, Rexp::alt(Rexp::char(b'0'), int_regex()));
    let frac = Rexp::seq(Rexp::char(b'.'), Rexp::plus(digit()));
    Rexp::seq(int_part, frac)
}

fn operators_regex() -> Rc<Rexp> {
    let mut alts: Vec<Rc<Rexp>> = OPERATORS.iter().map(|op| Rexp::string(op)).collect();
    alts.push(Rexp::string(GE));
    Rexp::alt_many(&alts)
}

fn whitespace_regex() -> Rc<Rexp> {
    Rexp::range(*b" \n\t\r")
}

/// Every byte a string, comment, or char-literal body may be drawn from,
/// excluding the double-quote itself and the two-character `\n` escape
/// (added separately).
fn all_regex() -> Rc<Rexp> {
    Rexp::alt_many(&[
        sym(),
        digit(),
        upper(),
        operators_regex(),
        Rexp::char(b' '),
        Rexp::char(b':'),
        Rexp::char(b';'),
        Rexp::char(b','),
        Rexp::char(b'('),
        Rexp::char(b')'),
        Rexp::char(b'{'),
        Rexp::char(b'}'),
    ])
}

fn newline_escape() -> Rc<Rexp> {
    Rexp::seq(Rexp::char(b'\\'), Rexp::char(b'n'))
}

fn string_regex() -> Rc<Rexp> {
    let quote = Rexp::char(b'"');
    let body = Rexp::alt(all_regex(), newline_escape());
    Rexp::seq(quote.clone(), Rexp::seq(Rexp::star(body), quote))
}

fn char_literal_regex() -> Rc<Rexp> {
    let quote = Rexp::char(b'\'');
    let body = Rexp::alt_many(&[sym(), upper(), digit(), operators_regex(), whitespace_regex(), Rexp::char(b','), newline_escape()]);
    Rexp::seq(quote.clone(), Rexp::seq(body, quote))
}

fn comment_regex() -> Rc<Rexp> {
    let all2 = Rexp::alt(all_regex(), Rexp::char(b'\n'));
    let block = Rexp::seq(
        Rexp::string("/*"),
        Rexp::seq(Rexp::star(all2), Rexp::string("*/")),
    );
    let line = Rexp::seq(Rexp::string("//"), Rexp::seq(Rexp::star(all_regex()), Rexp::char(b'\n')));
    Rexp::alt(block, line)
}

/// The whole-language regex. Order follows `FUN_REGEX`: keyword before
/// identifier before type before constant, so e.g. `if` lexes as a keyword
/// rather than an identifier, and `Int` as a type rather than a constant.
pub fn language_regex() -> Rc<Rexp> {
    let comments_or_ws = Rexp::alt(comment_regex(), whitespace_regex());
    let alts = [
        Rexp::recd("k", keywords_regex()),
        Rexp::recd("i", id_regex()),
        Rexp::recd("t", type_regex()),
        Rexp::recd("ct", const_regex()),
        Rexp::recd("str", string_regex()),
        Rexp::recd("o", operators_regex()),
        Rexp::recd("int", int_regex()),
        Rexp::recd("d", double_regex()),
        Rexp::recd("s", Rexp::char(b';')),
        Rexp::recd("cl", Rexp::char(b':')),
        Rexp::recd("cr", char_literal_regex()),
        Rexp::recd("c", Rexp::char(b',')),
        Rexp::recd("pl", Rexp::char(b'(')),
        Rexp::recd("pr", Rexp::char(b')')),
        Rexp::recd("bl", Rexp::char(b'{')),
        Rexp::recd("br", Rexp::char(b'}')),
        Rexp::recd("w", comments_or_ws),
    ];
    Rexp::star(Rexp::alt_many(&alts))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use brz_regex::lex_bytes;

    #[test]
    fn keywords_win_over_identifiers() {
        let v = lex_bytes(language_regex(), b"ifx").unwrap();
        let pairs = v.env();
        assert_eq!(pairs.len(), 1);
        assert_eq!(&*pairs[0].0, "i");
    }

    #[test]
    fn type_names_win_over_constants() {
        let v = lex_bytes(language_regex(), b"Int").unwrap();
        let pairs = v.env();
        assert_eq!(pairs.len(), 1);
        assert_eq!(&*pairs[0].0, "t");
    }

    #[test]
    fn char_literal_newline_escape_lexes_whole() {
        let v = lex_bytes(language_regex(), b"'\\n'").unwrap();
        let pairs = v.env();
        assert_eq!(pairs.len(), 1);
        assert_eq!(&*pairs[0].0, "cr");
        assert_eq!(pairs[0].1, b"'\\n'");
    }

    #[test]
    fn block_comment_may_span_lines() {
        let v = lex_bytes(language_regex(), b"/* a\nb */x").unwrap();
        let pairs = v.env();
        let kinds: Vec<&str> = pairs.iter().map(|(k, _)| &**k).collect();
        assert_eq!(kinds, ["w", "i"]);
    }
}
