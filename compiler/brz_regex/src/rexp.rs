//! Tagged regular expressions.
//!
//! Every variant is shared via `Rc` so taking a derivative never deep-clones
//! the untouched parts of the tree.

use std::rc::Rc;

/// A tagged regular expression.
///
/// Structural equality matches the spec: two nodes are equal iff their tags
/// match and their children are recursively equal. `Range` is canonicalised
/// (sorted, deduplicated) at construction time so slice equality already
/// gives bag equality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rexp {
    Zero,
    One,
    Char(u8),
    Range(Rc<[u8]>),
    Alt(Rc<Rexp>, Rc<Rexp>),
    Seq(Rc<Rexp>, Rc<Rexp>),
    Star(Rc<Rexp>),
    Plus(Rc<Rexp>),
    Optional(Rc<Rexp>),
    NTimes(Rc<Rexp>, u32),
    Recd(Rc<str>, Rc<Rexp>),
}

impl Rexp {
    pub fn char(c: u8) -> Rc<Rexp> {
        Rc::new(Rexp::Char(c))
    }

    pub fn range(chars: impl AsRef<[u8]>) -> Rc<Rexp> {
        let mut cs: Vec<u8> = chars.as_ref().to_vec();
        cs.sort_unstable();
        cs.dedup();
        Rc::new(Rexp::Range(cs.into()))
    }

    pub fn alt(a: Rc<Rexp>, b: Rc<Rexp>) -> Rc<Rexp> {
        Rc::new(Rexp::Alt(a, b))
    }

    /// Build a right-nested alternation over a non-empty slice, in order, so
    /// that earlier entries win longest-common-prefix ties (keywords before
    /// identifiers relies on this ordering).
    pub fn alt_many(rs: &[Rc<Rexp>]) -> Rc<Rexp> {
        match rs {
            [] => Rc::new(Rexp::Zero),
            [only] => only.clone(),
            [head, rest @ ..] => Rexp::alt(head.clone(), Rexp::alt_many(rest)),
        }
    }

    pub fn seq(a: Rc<Rexp>, b: Rc<Rexp>) -> Rc<Rexp> {
        Rc::new(Rexp::Seq(a, b))
    }

    /// Right-nested sequence over a non-empty slice (used for keyword
    /// spellings like `w-h-i-l-e`).
    pub fn seq_many(rs: &[Rc<Rexp>]) -> Rc<Rexp> {
        match rs {
            [] => Rc::new(Rexp::One),
            [only] => only.clone(),
            [head, rest @ ..] => Rexp::seq(head.clone(), Rexp::seq_many(rest)),
        }
    }

    pub fn string(s: &str) -> Rc<Rexp> {
        let chars: Vec<Rc<Rexp>> = s.bytes().map(Rexp::char).collect();
        Rexp::seq_many(&chars)
    }

    pub fn star(r: Rc<Rexp>) -> Rc<Rexp> {
        Rc::new(Rexp::Star(r))
    }

    pub fn plus(r: Rc<Rexp>) -> Rc<Rexp> {
        Rc::new(Rexp::Plus(r))
    }

    pub fn optional(r: Rc<Rexp>) -> Rc<Rexp> {
        Rc::new(Rexp::Optional(r))
    }

    pub fn ntimes(r: Rc<Rexp>, n: u32) -> Rc<Rexp> {
        Rc::new(Rexp::NTimes(r, n))
    }

    pub fn recd(tag: impl Into<Rc<str>>, r: Rc<Rexp>) -> Rc<Rexp> {
        Rc::new(Rexp::Recd(tag.into(), r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_canonicalised_for_equality() {
        let a = Rexp::range(*b"cba");
        let b = Rexp::range(*b"abc");
        assert_eq!(a, b);
    }

    #[test]
    fn alt_many_nests_in_order() {
        let r = Rexp::alt_many(&[Rexp::char(b'a'), Rexp::char(b'b'), Rexp::char(b'c')]);
        assert_eq!(
            *r,
            Rexp::Alt(Rexp::char(b'a'), Rexp::alt(Rexp::char(b'b'), Rexp::char(b'c')))
        );
    }

    #[test]
    fn string_builds_right_nested_seq() {
        let r = Rexp::string("if");
        assert_eq!(*r, Rexp::Seq(Rexp::char(b'i'), Rexp::char(b'f')));
    }
}
