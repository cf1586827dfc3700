//! The shared, interior-mutable environment both evaluators bind names in.
//!
//! Grounded on `ori_eval::environment::LocalScope<T>(Rc<RefCell<T>>)`'s
//! wrapper-type idiom: a `#[repr(transparent)]` handle around
//! `Rc<RefCell<_>>` so cloning the handle shares the underlying map rather
//! than copying it. This is what lets a [`Value::Closure`][crate::value::Value::Closure]
//! capture "the environment, as it will later be mutated" — the same
//! trick `Def`'s two-step `None`-then-`Closure` bind in
//! `fun_rpython_code/iterative_eval.py` relies on for mutual recursion
//! between sibling declarations.
//!
//! Calling a closure does *not* reuse this shared handle for the call
//! frame, though: `ClosureFunction.call` in the source does
//! `self.env.copy()` before binding parameters, an independent shallow
//! copy so the callee's parameter bindings are never visible to the
//! caller or to later calls of the same closure. [`Environment::branch`]
//! is that copy.

#![expect(clippy::disallowed_types, reason = "Rc is the implementation of Environment")]

use crate::value::Value;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// A shared, mutable name-to-value map.
#[derive(Debug, Clone)]
pub struct Environment(Rc<RefCell<FxHashMap<String, Value>>>);

impl Environment {
    pub fn new() -> Self {
        Environment(Rc::new(RefCell::new(FxHashMap::default())))
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().get(name).cloned()
    }

    /// Bind or rebind a name in place. Every handle sharing this
    /// environment's `Rc` observes the new binding immediately.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().insert(name.into(), value);
    }

    /// Branch an independent environment: a fresh map seeded with a copy of
    /// this one's bindings, plus `extra` layered on top. Mutating the
    /// result never affects `self`.
    pub fn branch(&self, extra: impl IntoIterator<Item = (String, Value)>) -> Environment {
        let mut map = self.0.borrow().clone();
        map.extend(extra);
        Environment(Rc::new(RefCell::new(map)))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}
