//! `InterpreterBuilder` for configuring output and the recursion limit.

use rustc_hash::FxHashMap;

use super::Interpreter;
use crate::call_stack::{CallStack, DEFAULT_RECURSION_LIMIT};
use crate::{stdout_handler, Environment, SharedPrintHandler};

/// Builder for [`Interpreter`].
///
/// ```text
/// let output = buffer_handler();
/// let mut interpreter = InterpreterBuilder::new()
///     .print_handler(output.clone())
///     .recursion_limit(50)
///     .build();
/// ```
#[derive(Default)]
pub struct InterpreterBuilder {
    print_handler: Option<SharedPrintHandler>,
    recursion_limit: Option<usize>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where `Print` writes. Defaults to stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Maximum call depth before a `RecursionLimitError`.
    #[must_use]
    pub fn recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = Some(limit);
        self
    }

    pub fn build<'a>(self) -> Interpreter<'a> {
        Interpreter {
            env: Environment::new(),
            functions: FxHashMap::default(),
            call_stack: CallStack::new(self.recursion_limit.unwrap_or(DEFAULT_RECURSION_LIMIT)),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
        }
    }
}
