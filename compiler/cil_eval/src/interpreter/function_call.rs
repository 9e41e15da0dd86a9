//! Calling user functions.

use cil_value::errors::{arity_mismatch, malformed, undefined_function};
use cil_value::{EvalResult, Value};

use super::Interpreter;
use crate::call_stack::ensure_sufficient_stack;
use crate::exec::Flow;

impl Interpreter<'_> {
    /// Call `name` with already-evaluated arguments.
    ///
    /// Arguments are bound in a fresh frame; collections among them stay
    /// aliased with the caller's. Falling off the end returns Null. Errors
    /// leaving the call record `name` in their backtrace.
    #[tracing::instrument(level = "trace", skip_all, fields(name = %name))]
    pub(super) fn call_function(&mut self, name: &str, args: Vec<Value>) -> EvalResult {
        let Some(&func) = self.functions.get(name) else {
            return Err(undefined_function(name));
        };
        if func.params.len() != args.len() {
            return Err(arity_mismatch(name, func.params.len(), args.len()));
        }

        self.call_stack.push(name)?;
        self.env
            .push_frame(func.params.iter().cloned().zip(args));
        let result = ensure_sufficient_stack(|| self.exec_block(&func.body));
        self.env.pop_frame();
        self.call_stack.pop();

        match result {
            Ok(Flow::Return(value)) => Ok(value),
            Ok(Flow::Normal) => Ok(Value::Null),
            Ok(Flow::Break | Flow::Continue) => {
                Err(malformed(format!("loop control escaped function '{name}'")).with_frame(name))
            }
            Err(err) => Err(err.with_frame(name)),
        }
    }
}
