//! Core IL reference interpreter.
//!
//! This crate defines the execution semantics every backend must
//! reproduce. It runs a parsed and lowered [`Document`](cil_ir::Document)
//! as a single-threaded, depth-first walk.
//!
//! # Architecture
//!
//! - `Environment`: global bindings plus one frame per active call
//! - `evaluate_binary`: enum-dispatched operators over [`Value`]
//! - `methods`: semantics of the built-in node kinds (collections, text,
//!   math, conversions, JSON)
//! - `Flow`: non-local control (`Return`, `Break`, `Continue`) as an
//!   explicit statement result; errors, including `Throw`, travel as
//!   `Err(EvalError)`
//! - `PrintHandler`: where `Print` output goes
//!
//! # Re-exports
//!
//! The value model lives in `cil_value` and is re-exported here:
//! `Value`, `EvalError`, `EvalResult`, `ErrorKind`.

mod call_stack;
mod environment;
pub mod exec;
pub mod interpreter;
mod methods;
mod operators;
mod print_handler;

pub use cil_value::{ErrorKind, EvalBacktrace, EvalError, EvalResult, Value};

pub use call_stack::{ensure_sufficient_stack, DEFAULT_RECURSION_LIMIT};
pub use environment::Environment;
pub use exec::{ExecResult, Flow};
pub use interpreter::{Interpreter, InterpreterBuilder};
pub use operators::{evaluate_binary, evaluate_not};
pub use print_handler::{
    buffer_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl, SharedPrintHandler,
    StdoutPrintHandler,
};
