//! Stack safety utilities for deep recursion.
//!
//! The parser descends once per nesting level of parentheses, blocks, and
//! expressions; pathological input (thousands of nested parens) can exhaust
//! the host stack. Wrap recursive entry points with [`ensure_sufficient_stack`]
//! to grow the stack on demand instead.
//!
//! # Platform Support
//!
//! - **Native targets**: uses the `stacker` crate to grow the stack on demand.
//! - **WASM targets**: no-op passthrough (WASM has its own stack management).

/// Minimum stack space to keep available (100KB red zone).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
