//! Rectification functions: a tagged-enum stand-in for the closures the
//! reference lexer builds, so `simp` never allocates a `dyn Fn` per byte.

use crate::val::Val;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RectFun {
    Id,
    Right(Rc<RectFun>),
    Left(Rc<RectFun>),
    Alt(Rc<RectFun>, Rc<RectFun>),
    Seq(Rc<RectFun>, Rc<RectFun>),
    SeqEmpty1(Rc<RectFun>, Rc<RectFun>),
    SeqEmpty2(Rc<RectFun>, Rc<RectFun>),
    Error,
    Recd(Rc<RectFun>),
}

/// Thrown only when `simp` has folded a `Seq` to `Zero` and the lex loop
/// somehow still tries to rectify a value against it; a simplified regex of
/// `Zero` never actually produces a value, so this is unreachable in
/// practice and exists to make that invariant explicit rather than panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RectifyError;

pub fn apply(f: &RectFun, v: Val) -> Result<Val, RectifyError> {
    match f {
        RectFun::Id => Ok(v),
        RectFun::Right(g) => Ok(Val::right(apply(g, v)?)),
        RectFun::Left(g) => Ok(Val::left(apply(g, v)?)),
        RectFun::Alt(g1, g2) => match v {
            Val::Left(inner) => Ok(Val::left(apply(g1, *inner)?)),
            Val::Right(inner) => Ok(Val::right(apply(g2, *inner)?)),
            _ => Err(RectifyError),
        },
        RectFun::Seq(g1, g2) => match v {
            Val::Sequ(v1, v2) => Ok(Val::sequ(apply(g1, *v1)?, apply(g2, *v2)?)),
            _ => Err(RectifyError),
        },
        RectFun::SeqEmpty1(g1, g2) => Ok(Val::sequ(apply(g1, Val::Empty)?, apply(g2, v)?)),
        RectFun::SeqEmpty2(g1, g2) => Ok(Val::sequ(apply(g1, v)?, apply(g2, Val::Empty)?)),
        RectFun::Error => Err(RectifyError),
        RectFun::Recd(g) => match v {
            Val::Rec(tag, inner) => Ok(Val::rec(tag, apply(g, *inner)?)),
            _ => Err(RectifyError),
        },
    }
}
