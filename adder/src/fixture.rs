//! Pass-through wrappers for test functions
//!
//! Wrapping a test body keeps it callable and changes nothing about what
//! it does.

/// Return `f` unchanged
#[inline]
pub fn decorator<F>(f: F) -> F {
    f
}

/// Build a wrapper that returns its argument unchanged.
///
/// `param` is accepted and ignored.
#[inline]
pub fn decorator_with_params<P, F>(_param: P) -> impl FnOnce(F) -> F {
    |f| f
}
