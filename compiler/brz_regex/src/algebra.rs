//! `nullable`, `der`, `simp`, `inj`, and `mkeps`: the five functions the
//! derivative-based lexer is built from.

use crate::rectfun::RectFun;
use crate::rexp::Rexp;
use crate::val::Val;
use std::rc::Rc;

/// Whether `r` matches the empty string.
pub fn nullable(r: &Rexp) -> bool {
    match r {
        Rexp::Zero => false,
        Rexp::One => true,
        Rexp::Char(_) => false,
        Rexp::Range(_) => false,
        Rexp::Alt(a, b) => nullable(a) || nullable(b),
        Rexp::Seq(a, b) => nullable(a) && nullable(b),
        Rexp::Star(_) => true,
        Rexp::Plus(r) => nullable(r),
        Rexp::Optional(_) => true,
        Rexp::NTimes(r, n) => *n == 0 || nullable(r),
        Rexp::Recd(_, r) => nullable(r),
    }
}

/// The derivative of `r` with respect to byte `c`: a regex matching every
/// suffix `w` such that `c·w` is in `L(r)`.
pub fn der(c: u8, r: &Rc<Rexp>) -> Rc<Rexp> {
    match r.as_ref() {
        Rexp::Zero | Rexp::One => Rc::new(Rexp::Zero),
        Rexp::Char(c2) => {
            if *c2 == c {
                Rc::new(Rexp::One)
            } else {
                Rc::new(Rexp::Zero)
            }
        }
        Rexp::Range(cs) => {
            if cs.contains(&c) {
                Rc::new(Rexp::One)
            } else {
                Rc::new(Rexp::Zero)
            }
        }
        Rexp::Alt(a, b) => Rexp::alt(der(c, a), der(c, b)),
        Rexp::Seq(a, b) => {
            if nullable(a) {
                Rexp::alt(Rexp::seq(der(c, a), b.clone()), der(c, b))
            } else {
                Rexp::seq(der(c, a), b.clone())
            }
        }
        Rexp::Star(inner) => Rexp::seq(der(c, inner), Rexp::star(inner.clone())),
        Rexp::Plus(inner) => Rexp::seq(der(c, inner), Rexp::star(inner.clone())),
        Rexp::Optional(inner) => der(c, inner),
        Rexp::NTimes(inner, n) => {
            if *n == 0 {
                Rc::new(Rexp::Zero)
            } else {
                Rexp::seq(der(c, inner), Rexp::ntimes(inner.clone(), n - 1))
            }
        }
        Rexp::Recd(_, inner) => der(c, inner),
    }
}

/// Simplify `r`, returning an equivalent regex and the rectification
/// function that lifts values matched against the simplified regex back to
/// values matched against `r`. Applied bottom-up.
pub fn simp(r: &Rc<Rexp>) -> (Rc<Rexp>, RectFun) {
    match r.as_ref() {
        Rexp::Alt(a, b) => {
            let (a_s, f_a) = simp(a);
            let (b_s, f_b) = simp(b);
            if matches!(*a_s, Rexp::Zero) {
                (b_s, RectFun::Right(Rc::new(f_b)))
            } else if matches!(*b_s, Rexp::Zero) {
                (a_s, RectFun::Left(Rc::new(f_a)))
            } else if a_s == b_s {
                (a_s, RectFun::Left(Rc::new(f_a)))
            } else {
                (
                    Rexp::alt(a_s, b_s),
                    RectFun::Alt(Rc::new(f_a), Rc::new(f_b)),
                )
            }
        }
        Rexp::Seq(a, b) => {
            let (a_s, f_a) = simp(a);
            let (b_s, f_b) = simp(b);
            if matches!(*a_s, Rexp::Zero) || matches!(*b_s, Rexp::Zero) {
                (Rc::new(Rexp::Zero), RectFun::Error)
            } else if matches!(*a_s, Rexp::One) {
                (b_s, RectFun::SeqEmpty1(Rc::new(f_a), Rc::new(f_b)))
            } else if matches!(*b_s, Rexp::One) {
                (a_s, RectFun::SeqEmpty2(Rc::new(f_a), Rc::new(f_b)))
            } else {
                (
                    Rexp::seq(a_s, b_s),
                    RectFun::Seq(Rc::new(f_a), Rc::new(f_b)),
                )
            }
        }
        _ => (r.clone(), RectFun::Id),
    }
}

/// The canonical empty-string match value. Requires `nullable(r)`.
pub fn mkeps(r: &Rexp) -> Val {
    match r {
        Rexp::One => Val::Empty,
        Rexp::Alt(a, b) => {
            if nullable(a) {
                Val::left(mkeps(a))
            } else {
                Val::right(mkeps(b))
            }
        }
        Rexp::Seq(a, b) => Val::sequ(mkeps(a), mkeps(b)),
        Rexp::Star(_) => Val::Stars(Vec::new()),
        Rexp::Plus(r) => Val::Pls(vec![mkeps(r)]),
        Rexp::Optional(_) => Val::opt(Val::Empty),
        Rexp::NTimes(r, n) => {
            if *n == 0 {
                Val::Ntms(Vec::new())
            } else {
                Val::Ntms(vec![mkeps(r)])
            }
        }
        Rexp::Recd(tag, r) => Val::rec(tag.clone(), mkeps(r)),
        Rexp::Zero | Rexp::Char(_) | Rexp::Range(_) => {
            unreachable!("mkeps called on a non-nullable regex")
        }
    }
}

/// Reconstruct a value for `r` from a value `v` matching `der(c, r)`, such
/// that `flatten(inj(r, c, v)) = c :: flatten(v)`.
pub fn inj(r: &Rexp, c: u8, v: Val) -> Val {
    match (r, v) {
        (Rexp::Star(inner), Val::Sequ(v1, v2)) => {
            let Val::Stars(mut rest) = *v2 else {
                unreachable!("Star's derivative always pairs with a Stars tail")
            };
            let mut vs = vec![inj(inner, c, *v1)];
            vs.append(&mut rest);
            Val::Stars(vs)
        }
        (Rexp::Seq(r1, _r2), Val::Sequ(v1, v2)) => Val::sequ(inj(r1, c, *v1), *v2),
        (Rexp::Seq(r1, _r2), Val::Left(inner)) => {
            // `der` wrapped a nullable-prefix Seq in Alt, so the Left value
            // is itself a Sequ pairing the derivative's match with the
            // original second factor.
            let Val::Sequ(v1, v2) = *inner else {
                unreachable!("nullable-prefix Seq derivative always yields a Sequ under Left")
            };
            Val::sequ(inj(r1, c, *v1), *v2)
        }
        (Rexp::Seq(r1, r2), Val::Right(inner)) => Val::sequ(mkeps(r1), inj(r2, c, *inner)),
        (Rexp::Alt(r1, _r2), Val::Left(inner)) => Val::left(inj(r1, c, *inner)),
        (Rexp::Alt(_r1, r2), Val::Right(inner)) => Val::right(inj(r2, c, *inner)),
        (Rexp::Char(_), _) | (Rexp::Range(_), _) => Val::Chr(c),
        (Rexp::Plus(inner), Val::Sequ(v1, v2)) => {
            let Val::Stars(mut rest) = *v2 else {
                unreachable!("Plus's derivative always pairs with a Stars tail")
            };
            let mut vs = vec![inj(inner, c, *v1)];
            vs.append(&mut rest);
            Val::Pls(vs)
        }
        (Rexp::Optional(inner), v) => Val::opt(inj(inner, c, v)),
        (Rexp::NTimes(inner, _n), Val::Sequ(v1, v2)) => {
            let Val::Ntms(mut rest) = *v2 else {
                unreachable!("NTimes's derivative always pairs with an Ntms tail")
            };
            let mut vs = vec![inj(inner, c, *v1)];
            vs.append(&mut rest);
            Val::Ntms(vs)
        }
        (Rexp::Recd(tag, inner), v) => Val::rec(tag.clone(), inj(inner, c, v)),
        (r, v) => unreachable!("inj: value {v:?} does not match the shape of der(c, {r:?})"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::rectfun::apply;

    #[test]
    fn nullable_matches_star_and_optional() {
        assert!(nullable(&Rexp::Star(Rexp::char(b'a'))));
        assert!(nullable(&Rexp::Optional(Rexp::char(b'a'))));
        assert!(!nullable(&Rexp::Char(b'a')));
    }

    #[test]
    fn ntimes_zero_is_nullable_regardless_of_body() {
        assert!(nullable(&Rexp::NTimes(Rexp::char(b'a'), 0)));
        assert!(!nullable(&Rexp::NTimes(Rexp::char(b'a'), 3)));
    }

    #[test]
    fn der_on_seq_with_nullable_prefix_wraps_in_alt() {
        let r = Rexp::seq(Rexp::optional(Rexp::char(b'a')), Rexp::char(b'b'));
        let d = der(b'b', &r);
        assert!(matches!(*d, Rexp::Alt(_, _)));
    }

    #[test]
    fn simp_collapses_zero_branch_of_alt() {
        let r = Rexp::alt(Rc::new(Rexp::Zero), Rexp::char(b'a'));
        let (simplified, _f) = simp(&r);
        assert_eq!(*simplified, Rexp::Char(b'a'));
    }

    #[test]
    fn simp_collapses_seq_with_zero_to_zero() {
        let r = Rexp::seq(Rc::new(Rexp::Zero), Rexp::char(b'a'));
        let (simplified, f) = simp(&r);
        assert_eq!(*simplified, Rexp::Zero);
        assert_eq!(f, RectFun::Error);
    }

    #[test]
    fn inject_then_flatten_round_trips_a_seq() {
        let r = Rexp::seq(Rexp::char(b'a'), Rexp::char(b'b'));
        let d1 = der(b'a', &r);
        let d2 = der(b'b', &d1);
        let m = mkeps(&d2);
        let i1 = inj(&d1, b'b', m);
        let i2 = inj(&r, b'a', i1);
        assert_eq!(i2.flatten(), b"ab");
    }

    #[test]
    fn apply_after_simp_recovers_an_original_value() {
        let r = Rexp::seq(Rexp::optional(Rexp::char(b'a')), Rexp::char(b'b'));
        let d = der(b'b', &r);
        let (simplified, f) = simp(&d);
        let v = mkeps(&simplified);
        let lifted = apply(&f, v).unwrap();
        let full = inj(&r, b'b', lifted);
        assert_eq!(full.flatten(), b"b");
    }
}
