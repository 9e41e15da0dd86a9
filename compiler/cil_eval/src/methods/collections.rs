//! Sequences: length, indexing, slicing, append and join.

use cil_value::errors::expected_type;
use cil_value::{EvalError, EvalResult, Value};

use super::{int_arg, resolve_index, slice_bounds};

fn count(n: usize) -> Value {
    Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
}

/// `Length`: characters of text, entries of any collection.
pub(crate) fn length(base: &Value) -> EvalResult {
    let n = match base {
        Value::Str(s) => s.chars().count(),
        Value::Tuple(items) => items.len(),
        Value::Array(items) => items.borrow().len(),
        Value::Map(map) => map.borrow().len(),
        Value::Set(set) => set.borrow().len(),
        Value::Record(record) => record.borrow().len(),
        Value::Deque(items) => items.borrow().len(),
        Value::Heap(heap) => heap.borrow().len(),
        other => return Err(expected_type("Length", "a collection or str", other)),
    };
    Ok(count(n))
}

/// `Index`: Array, Tuple, text and Deque. Negative indices count from the
/// end; anything still out of range is an `IndexError`.
pub(crate) fn index(base: &Value, index: &Value) -> EvalResult {
    let i = int_arg("Index", index)?;
    match base {
        Value::Array(items) => {
            let items = items.borrow();
            Ok(items[resolve_index(i, items.len())?].clone())
        }
        Value::Tuple(items) => Ok(items[resolve_index(i, items.len())?].clone()),
        Value::Deque(items) => {
            let items = items.borrow();
            Ok(items[resolve_index(i, items.len())?].clone())
        }
        Value::Str(s) => char_at(s, i),
        other => Err(expected_type("Index", "a list, tuple, str or deque", other)),
    }
}

pub(crate) fn char_at(text: &str, index: i64) -> EvalResult {
    let len = text.chars().count();
    let at = resolve_index(index, len)?;
    Ok(text
        .chars()
        .nth(at)
        .map_or(Value::Null, |c| Value::string(c.to_string())))
}

/// `SetIndex`: in-place store into an Array.
pub(crate) fn set_index(base: &Value, index: &Value, value: Value) -> Result<(), EvalError> {
    let Value::Array(items) = base else {
        return Err(expected_type("SetIndex", "a list", base));
    };
    let i = int_arg("SetIndex", index)?;
    let mut items = items.borrow_mut();
    let at = resolve_index(i, items.len())?;
    items[at] = value;
    Ok(())
}

/// `Slice`: a new Array, Tuple or text. Bounds are clamped, never
/// rejected for range.
pub(crate) fn slice(base: &Value, start: &Value, end: &Value) -> EvalResult {
    match base {
        Value::Array(items) => {
            let items = items.borrow();
            let (s, e) = slice_bounds("Slice", start, end, items.len())?;
            Ok(Value::array(items[s..e].to_vec()))
        }
        Value::Tuple(items) => {
            let (s, e) = slice_bounds("Slice", start, end, items.len())?;
            Ok(Value::tuple(items[s..e].to_vec()))
        }
        Value::Str(text) => substring_of("Slice", text, start, end),
        other => Err(expected_type("Slice", "a list, tuple or str", other)),
    }
}

/// Character-based slice of text, shared by `Slice` and `Substring`.
pub(crate) fn substring_of(operation: &str, text: &str, start: &Value, end: &Value) -> EvalResult {
    let (s, e) = slice_bounds(operation, start, end, text.chars().count())?;
    Ok(Value::string(
        text.chars().skip(s).take(e - s).collect::<String>(),
    ))
}

/// `Push`: append to an Array.
pub(crate) fn push(base: &Value, value: Value) -> Result<(), EvalError> {
    match base {
        Value::Array(items) => {
            items.borrow_mut().push(value);
            Ok(())
        }
        other => Err(expected_type("Push", "a list", other)),
    }
}

/// `Join`: format each item as `Print` would and join with `sep`.
pub(crate) fn join(sep: &Value, items: &Value) -> EvalResult {
    let Value::Str(sep) = sep else {
        return Err(expected_type("Join", "a str separator", sep));
    };
    let parts: Vec<String> = match items {
        Value::Array(items) => items.borrow().iter().map(ToString::to_string).collect(),
        Value::Tuple(items) => items.iter().map(ToString::to_string).collect(),
        Value::Deque(items) => items.borrow().iter().map(ToString::to_string).collect(),
        Value::Set(set) => set.borrow().iter().map(ToString::to_string).collect(),
        other => return Err(expected_type("Join", "a list of items", other)),
    };
    Ok(Value::string(parts.join(&**sep)))
}
