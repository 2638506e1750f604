//! Stack growth for recursive type walks.
//!
//! Template matching and interface satisfaction recurse over user-written
//! type expressions and interface hierarchies, which have no depth limit.
//! On native targets `stacker` grows the stack on demand; on WASM the closure
//! runs directly.

#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 64 * 1024;

#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
