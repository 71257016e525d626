//! Circular dependency detection infrastructure.

use std::cell::RefCell;
use std::panic;

use crate::error::{DiError, DiResult};

// Thread-local resolution state for circular dependency detection
thread_local! {
    static RESOLUTION_TLS: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

/// Panic payload for circular dependency detection.
///
/// When a circular dependency is detected during service resolution,
/// this panic payload carries the complete dependency path for debugging.
/// It unwinds through user factory closures and is turned back into
/// `DiError::Circular` by the nearest enclosing resolution.
///
/// Example path: `["ServiceA", "ServiceB", "ServiceA"]`
#[derive(Debug)]
pub struct CircularPanic {
    /// The complete circular dependency path showing the cycle.
    pub path: Box<[&'static str]>,
}

impl CircularPanic {
    fn new(path: Vec<&'static str>) -> Self {
        CircularPanic { path: path.into_boxed_slice() }
    }
}

// Depth overflow travels the same way as a cycle.
struct DepthPanic(usize);

/// Guard for managing thread-local resolution stack
pub(crate) struct StackGuard {
    depth: usize,
}

impl StackGuard {
    pub(crate) fn new(name: &'static str, max_depth: usize) -> Self {
        let depth = RESOLUTION_TLS.with(|tls| {
            let mut stack = tls.borrow_mut();

            // Circular detection BEFORE pushing the new name
            if stack.iter().any(|&n| n == name) {
                let mut path = stack.clone();
                path.push(name);
                drop(stack);
                panic::panic_any(CircularPanic::new(path));
            }

            // A top-level resolution always has room, so the panic below is
            // raised only where an enclosing frame can catch it.
            if stack.len() >= max_depth.max(1) {
                let depth = stack.len();
                drop(stack);
                panic::panic_any(DepthPanic(depth));
            }

            stack.push(name);
            stack.len() - 1
        });

        Self { depth }
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        // Truncate rather than pop so an unwinding frame restores exactly the
        // stack it was entered with.
        RESOLUTION_TLS.with(|tls| tls.borrow_mut().truncate(self.depth));
    }
}

/// Execute a closure with circular dependency detection
pub(crate) fn with_circular_catch<T, F>(name: &'static str, max_depth: usize, f: F) -> DiResult<T>
where
    F: FnOnce() -> DiResult<T>,
{
    use std::panic::AssertUnwindSafe;

    let _guard = StackGuard::new(name, max_depth);

    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            if let Some(circular) = payload.downcast_ref::<CircularPanic>() {
                Err(DiError::Circular(circular.path.to_vec()))
            } else if let Some(DepthPanic(depth)) = payload.downcast_ref::<DepthPanic>() {
                Err(DiError::DepthExceeded(*depth))
            } else {
                // Re-panic for other types of panics
                panic::resume_unwind(payload);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_len() -> usize {
        RESOLUTION_TLS.with(|tls| tls.borrow().len())
    }

    #[test]
    fn test_nested_resolution_restores_stack() {
        let result = with_circular_catch("outer", 8, || {
            with_circular_catch("inner", 8, || Ok(stack_len()))
        });
        assert_eq!(result.unwrap(), 2);
        assert_eq!(stack_len(), 0);
    }

    #[test]
    fn test_cycle_becomes_error_and_stack_recovers() {
        let result: DiResult<()> = with_circular_catch("a", 8, || {
            let _ = with_circular_catch("b", 8, || with_circular_catch("a", 8, || Ok(())));
            Ok(())
        });
        // The inner "b" frame catches the cycle; "a" itself completes.
        assert!(result.is_ok());
        assert_eq!(stack_len(), 0);

        let direct: DiResult<()> = with_circular_catch("x", 8, || with_circular_catch("x", 8, || Ok(())));
        match direct {
            Err(DiError::Circular(path)) => assert_eq!(path, vec!["x", "x"]),
            other => panic!("expected circular error, got {:?}", other),
        }
        assert_eq!(stack_len(), 0);
    }

    #[test]
    fn test_depth_limit() {
        fn recurse(level: usize) -> DiResult<()> {
            const NAMES: [&str; 6] = ["l0", "l1", "l2", "l3", "l4", "l5"];
            with_circular_catch(NAMES[level], 3, || recurse(level + 1))
        }
        match recurse(0) {
            Err(DiError::DepthExceeded(depth)) => assert_eq!(depth, 3),
            other => panic!("expected depth error, got {:?}", other),
        }
        assert_eq!(stack_len(), 0);
    }
}
