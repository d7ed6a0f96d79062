//! Stack safety for recursive expression walks.
//!
//! Evaluation, type checking, constant folding and rendering all recurse once
//! per level of expression nesting. A generated template can nest far deeper
//! than anything typed by hand, so every recursive step runs through
//! [`ensure_sufficient_stack`], which grows the stack before it runs out.
//!
//! - **Native targets**: `stacker` allocates a new segment when less than the
//!   red zone remains.
//! - **WASM targets**: plain passthrough.

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if the remaining space is below the red zone.
///
/// ```text
/// fn evaluate(&self, node: &Node) -> EvalResult {
///     ensure_sufficient_stack(|| match node {
///         // ... recursive evaluation ...
///     })
/// }
/// ```
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
mod tests {
    use super::*;

    fn nested_sum(depth: u64) -> u64 {
        ensure_sufficient_stack(|| if depth == 0 { 0 } else { nested_sum(depth - 1) + 1 })
    }

    #[test]
    fn shallow_nesting() {
        assert_eq!(nested_sum(10), 10);
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        // Far beyond what a default 8MB main-thread stack survives without growth.
        assert_eq!(nested_sum(100_000), 100_000);
    }

    #[test]
    fn passes_results_through() {
        let result: Result<i32, &str> = ensure_sufficient_stack(|| Ok(123));
        assert_eq!(result, Ok(123));
    }
}
