//! Call depth tracking.
//!
//! Every Core IL function call pushes one frame. The depth limit turns
//! runaway recursion into a catchable `RecursionLimitError`, and the host
//! stack is grown on demand so that limit is always reached first.

use cil_value::errors::recursion_limit_exceeded;
use cil_value::EvalError;

/// Maximum number of nested Core IL calls.
pub const DEFAULT_RECURSION_LIMIT: usize = 100;

/// Live call stack: the names of the functions currently executing.
#[derive(Clone, Debug)]
pub(crate) struct CallStack {
    frames: Vec<String>,
    limit: usize,
}

impl CallStack {
    pub(crate) fn new(limit: usize) -> Self {
        CallStack {
            frames: Vec::new(),
            limit,
        }
    }

    /// Enter `name`. The frame is not pushed when the limit is reached.
    pub(crate) fn push(&mut self, name: &str) -> Result<(), EvalError> {
        if self.frames.len() >= self.limit {
            return Err(recursion_limit_exceeded(self.limit));
        }
        self.frames.push(name.to_string());
        Ok(())
    }

    pub(crate) fn pop(&mut self) {
        debug_assert!(!self.frames.is_empty(), "CallStack::pop on empty stack");
        self.frames.pop();
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }
}

/// Run a call body with at least a red zone of host stack available.
///
/// Uses `stacker` on native targets (100KB red zone, 1MB growth); WASM
/// manages its own stack.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    const RED_ZONE: usize = 100 * 1024;
    const GROWTH: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
