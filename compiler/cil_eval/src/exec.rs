//! Statement outcomes.
//!
//! Non-local control is an ordinary return value. Each statement reports
//! how it finished, and loops, calls and `TryCatch` match on that report.
//! Errors, including `Throw`, are the `Err` side of [`ExecResult`].

use cil_value::{EvalError, Value};

#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    /// Fell off the end; continue with the next statement.
    Normal,
    Return(Value),
    Break,
    Continue,
}

pub type ExecResult = Result<Flow, EvalError>;
