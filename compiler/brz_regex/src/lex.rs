//! The derivative-based lex loop (spec §4.4), expressed as a loop over
//! successive `(regex, byte, rectfun)` states rather than the naturally
//! recursive `lex_simp` the algorithm is usually presented as — lexing an
//! `n`-byte source file must not recurse `n` deep.

use crate::algebra::{der, inj, mkeps, nullable, simp};
use crate::rectfun::{apply, RectFun};
use crate::rexp::Rexp;
use crate::val::Val;
use std::rc::Rc;

/// A byte the language regex could not continue matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexFailure {
    /// Byte offset of the failure.
    pub offset: u32,
    /// The offending byte, or `None` if the failure is end-of-input without
    /// the regex having become nullable.
    pub byte: Option<u8>,
}

/// Match `r` against the whole of `s`, returning the structured value (still
/// tagged with every `Recd` the regex passed through — use [`Val::env`] to
/// pull out the ordered `(tag, lexeme)` pairs).
pub fn lex_bytes(r0: Rc<Rexp>, s: &[u8]) -> Result<Val, LexFailure> {
    let mut steps: Vec<(Rc<Rexp>, u8, RectFun)> = Vec::with_capacity(s.len());
    let mut current = r0;

    for (i, &c) in s.iter().enumerate() {
        let r_before = current.clone();
        let derived = der(c, &current);
        let (simplified, f) = simp(&derived);
        if matches!(*simplified, Rexp::Zero) {
            return Err(LexFailure {
                offset: i as u32,
                byte: Some(c),
            });
        }
        current = simplified;
        steps.push((r_before, c, f));
    }

    if !nullable(&current) {
        return Err(LexFailure {
            offset: s.len() as u32,
            byte: None,
        });
    }

    let mut value = mkeps(&current);
    for (r, c, f) in steps.into_iter().rev() {
        value = match apply(&f, value) {
            Ok(rectified) => inj(&r, c, rectified),
            Err(_) => unreachable!("simp never hands back a rectfun that fails on its own output"),
        };
    }
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn matches_a_literal_string() {
        let r = Rexp::string("ab");
        let v = lex_bytes(r, b"ab").unwrap();
        assert_eq!(v.flatten(), b"ab");
    }

    #[test]
    fn fails_with_the_offset_of_the_dead_byte() {
        let r = Rexp::string("ab");
        let err = lex_bytes(r, b"ax").unwrap_err();
        assert_eq!(err.offset, 1);
        assert_eq!(err.byte, Some(b'x'));
    }

    #[test]
    fn fails_at_end_of_input_when_not_yet_nullable() {
        let r = Rexp::string("ab");
        let err = lex_bytes(r, b"a").unwrap_err();
        assert_eq!(err.offset, 1);
        assert_eq!(err.byte, None);
    }

    #[test]
    fn star_of_recd_collects_every_iteration_in_env() {
        let token = Rexp::recd("i", Rexp::char(b'a'));
        let r = Rexp::star(token);
        let v = lex_bytes(r, b"aaa").unwrap();
        assert_eq!(v.env().len(), 3);
    }
}
