//! Match values produced by lexing: the structured witness that a regex
//! matched a particular string.

use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Val {
    Empty,
    Chr(u8),
    Sequ(Box<Val>, Box<Val>),
    Left(Box<Val>),
    Right(Box<Val>),
    Stars(Vec<Val>),
    Pls(Vec<Val>),
    Opt(Box<Val>),
    Ntms(Vec<Val>),
    Rec(Rc<str>, Box<Val>),
}

impl Val {
    pub fn sequ(v1: Val, v2: Val) -> Val {
        Val::Sequ(Box::new(v1), Box::new(v2))
    }

    pub fn left(v: Val) -> Val {
        Val::Left(Box::new(v))
    }

    pub fn right(v: Val) -> Val {
        Val::Right(Box::new(v))
    }

    pub fn opt(v: Val) -> Val {
        Val::Opt(Box::new(v))
    }

    pub fn rec(tag: impl Into<Rc<str>>, v: Val) -> Val {
        Val::Rec(tag.into(), Box::new(v))
    }

    /// The substring this value witnesses a match for.
    pub fn flatten(&self) -> Vec<u8> {
        match self {
            Val::Empty => Vec::new(),
            Val::Chr(c) => vec![*c],
            Val::Left(v) | Val::Right(v) | Val::Opt(v) => v.flatten(),
            Val::Sequ(v1, v2) => {
                let mut out = v1.flatten();
                out.extend(v2.flatten());
                out
            }
            Val::Stars(vs) | Val::Pls(vs) | Val::Ntms(vs) => {
                vs.iter().flat_map(Val::flatten).collect()
            }
            Val::Rec(_, v) => v.flatten(),
        }
    }

    /// The ordered `(tag, lexeme)` pairs recorded by every `Recd` this value
    /// passed through, innermost tag first at each level but left-to-right
    /// overall (matching the reference `env` function).
    pub fn env(&self) -> Vec<(Rc<str>, Vec<u8>)> {
        match self {
            Val::Empty | Val::Chr(_) => Vec::new(),
            Val::Left(v) | Val::Right(v) | Val::Opt(v) => v.env(),
            Val::Sequ(v1, v2) => {
                let mut out = v1.env();
                out.extend(v2.env());
                out
            }
            Val::Stars(vs) | Val::Pls(vs) | Val::Ntms(vs) => vs.iter().flat_map(Val::env).collect(),
            Val::Rec(tag, v) => {
                let mut out = vec![(tag.clone(), v.flatten())];
                out.extend(v.env());
                out
            }
        }
    }
}
