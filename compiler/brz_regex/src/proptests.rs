//! Property tests for the regex laws in the spec's Testable Properties
//! section: nullability/derivative agreement, injection round-tripping,
//! rectification correctness, and `simp` idempotence.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::algebra::{der, inj, mkeps, nullable, simp};
use crate::rectfun::apply;
use crate::rexp::Rexp;
use crate::val::Val;
use proptest::prelude::*;
use std::rc::Rc;

/// Whether `r` matches `s`, by repeated derivative — the un-simplified
/// reference algorithm, used only to generate test oracles.
fn accepts(r: &Rc<Rexp>, s: &[u8]) -> bool {
    match s.split_first() {
        None => nullable(r),
        Some((&c, rest)) => accepts(&der(c, r), rest),
    }
}

/// A match value for `s` against `r`, built by the un-simplified `der`/`inj`
/// chain (no `simp`). Panics if `r` does not accept `s`.
fn match_value(r: &Rc<Rexp>, s: &[u8]) -> Val {
    match s.split_first() {
        None => mkeps(r),
        Some((&c, rest)) => {
            let d = der(c, r);
            let v_rest = match_value(&d, rest);
            inj(r, c, v_rest)
        }
    }
}

fn small_rexp() -> impl Strategy<Value = Rc<Rexp>> {
    let leaf = prop_oneof![
        Just(Rc::new(Rexp::One)),
        prop::sample::select(vec![b'a', b'b', b'c']).prop_map(Rexp::char),
    ];
    leaf.prop_recursive(4, 16, 4, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Rexp::alt(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Rexp::seq(a, b)),
            inner.clone().prop_map(Rexp::star),
            inner.prop_map(Rexp::optional),
        ]
    })
}

/// Strings drawn from the same tiny alphabet the regex generator uses, so a
/// nontrivial fraction of generated (r, s) pairs actually match.
fn small_string() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![b'a', b'b', b'c']), 0..6)
}

proptest! {
    #[test]
    fn nullable_agrees_with_accepting_the_empty_string(r in small_rexp()) {
        prop_assert_eq!(nullable(&r), accepts(&r, b""));
    }

    #[test]
    fn der_agrees_with_accepts_on_the_first_byte(r in small_rexp(), s in small_string()) {
        if let Some((&c, rest)) = s.split_first() {
            prop_assert_eq!(accepts(&r, &s), accepts(&der(c, &r), rest));
        }
    }

    #[test]
    fn injection_round_trips_flatten(r in small_rexp(), s in small_string()) {
        if accepts(&r, &s) {
            if let Some((&c, rest)) = s.split_first() {
                let d = der(c, &r);
                let v = match_value(&d, rest);
                let injected = inj(&r, c, v.clone());
                let mut expected = vec![c];
                expected.extend(v.flatten());
                prop_assert_eq!(injected.flatten(), expected);
            }
        }
    }

    #[test]
    fn simp_preserves_the_language(r in small_rexp(), s in small_string()) {
        let (simplified, _f) = simp(&r);
        prop_assert_eq!(accepts(&r, &s), accepts(&simplified, &s));
    }

    #[test]
    fn rectified_value_flattens_to_the_same_string(r in small_rexp(), s in small_string()) {
        if accepts(&r, &s) {
            let (simplified, f) = simp(&r);
            let v = match_value(&simplified, &s);
            let lifted = apply(&f, v).expect("rectfun built by simp always matches its own output shape");
            prop_assert_eq!(lifted.flatten(), s);
        }
    }

    #[test]
    fn simp_is_idempotent_up_to_equivalence(r in small_rexp()) {
        let (once, _) = simp(&r);
        let (twice, _) = simp(&once);
        prop_assert_eq!(once, twice);
    }
}
