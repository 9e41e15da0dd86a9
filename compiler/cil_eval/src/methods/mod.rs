//! Semantics of the built-in node kinds.
//!
//! Each submodule owns one family of nodes. Functions here take evaluated
//! operands and return a [`Value`](cil_value::Value) or a runtime error;
//! evaluation order and binding are the interpreter's job.

pub(crate) mod collections;
pub(crate) mod convert;
pub(crate) mod json;
pub(crate) mod maps;
pub(crate) mod numeric;
pub(crate) mod queues;
pub(crate) mod regex;
pub(crate) mod strings;

use cil_value::errors::{expected_type, index_out_of_range};
use cil_value::{EvalError, Value};

/// An integer operand. Bool is not accepted as an index or bound.
fn int_arg(operation: &str, value: &Value) -> Result<i64, EvalError> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(expected_type(operation, "an int", other)),
    }
}

/// Resolve a possibly negative index against `len`.
fn resolve_index(index: i64, len: usize) -> Result<usize, EvalError> {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let adjusted = if index < 0 { index + len_i } else { index };
    usize::try_from(adjusted)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| index_out_of_range(index, len))
}

/// Resolve slice bounds: negatives count from the end, `Null` is open, and
/// both ends are clamped into `0..=len`. Never fails on range.
fn slice_bounds(
    operation: &str,
    start: &Value,
    end: &Value,
    len: usize,
) -> Result<(usize, usize), EvalError> {
    let clamp = |bound: &Value, open: usize| -> Result<usize, EvalError> {
        if matches!(bound, Value::Null) {
            return Ok(open);
        }
        let n = int_arg(operation, bound)?;
        let len_i = i64::try_from(len).unwrap_or(i64::MAX);
        let adjusted = if n < 0 { n.saturating_add(len_i) } else { n };
        Ok(usize::try_from(adjusted.clamp(0, len_i)).unwrap_or(0))
    };
    let start = clamp(start, 0)?;
    let end = clamp(end, len)?;
    Ok((start, end.max(start)))
}

#[cfg(test)]
mod tests;
