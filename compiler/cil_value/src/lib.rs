//! Core IL value runtime.
//!
//! This crate provides the data model the interpreter executes against:
//! - `Value`, a closed tagged union of scalars and collections
//! - Shared handles that make collections alias on copy
//! - Insertion-ordered maps and sets over canonical, type-tagged keys
//! - A FIFO-stable priority heap
//! - Canonical formatting
//! - Runtime error kinds and their factory functions

pub mod errors;
mod value;

pub use errors::{EvalBacktrace, EvalError, EvalResult, ErrorKind};
pub use value::{
    format_float, MapKey, Number, OrderedMap, OrderedSet, Priority, PriorityHeap, Record, Shared,
    Value,
};
