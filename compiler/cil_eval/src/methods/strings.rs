//! Text operations. Lengths and positions count characters, not bytes.

use cil_value::errors::{empty_separator, expected_type};
use cil_value::{EvalError, EvalResult, Value};

use super::collections::{char_at, substring_of};
use super::int_arg;

pub(super) fn text<'v>(operation: &str, value: &'v Value) -> Result<&'v str, EvalError> {
    value
        .as_str()
        .ok_or_else(|| expected_type(operation, "a str", value))
}

pub(crate) fn string_length(base: &Value) -> EvalResult {
    let n = text("StringLength", base)?.chars().count();
    Ok(Value::Int(i64::try_from(n).unwrap_or(i64::MAX)))
}

/// Clamped like `Slice`; never an out-of-range error.
pub(crate) fn substring(base: &Value, start: &Value, end: &Value) -> EvalResult {
    let s = text("Substring", base)?;
    int_arg("Substring", start)?;
    int_arg("Substring", end)?;
    substring_of("Substring", s, start, end)
}

/// Unlike `Substring`, an out-of-range position is an `IndexError`.
pub(crate) fn char_at_index(base: &Value, index: &Value) -> EvalResult {
    let s = text("CharAt", base)?;
    char_at(s, int_arg("CharAt", index)?)
}

pub(crate) fn split(base: &Value, delimiter: &Value) -> EvalResult {
    let s = text("StringSplit", base)?;
    let delimiter = text("StringSplit", delimiter)?;
    if delimiter.is_empty() {
        return Err(empty_separator());
    }
    Ok(Value::array(s.split(delimiter).map(Value::string).collect()))
}

pub(crate) fn trim(base: &Value) -> EvalResult {
    Ok(Value::string(text("StringTrim", base)?.trim()))
}

pub(crate) fn upper(base: &Value) -> EvalResult {
    Ok(Value::string(text("StringUpper", base)?.to_uppercase()))
}

pub(crate) fn lower(base: &Value) -> EvalResult {
    Ok(Value::string(text("StringLower", base)?.to_lowercase()))
}

pub(crate) fn starts_with(base: &Value, prefix: &Value) -> EvalResult {
    let s = text("StringStartsWith", base)?;
    Ok(Value::Bool(s.starts_with(text("StringStartsWith", prefix)?)))
}

pub(crate) fn ends_with(base: &Value, suffix: &Value) -> EvalResult {
    let s = text("StringEndsWith", base)?;
    Ok(Value::Bool(s.ends_with(text("StringEndsWith", suffix)?)))
}

pub(crate) fn contains(base: &Value, needle: &Value) -> EvalResult {
    let s = text("StringContains", base)?;
    Ok(Value::Bool(s.contains(text("StringContains", needle)?)))
}

/// Replaces every occurrence.
pub(crate) fn replace(base: &Value, old: &Value, new: &Value) -> EvalResult {
    let s = text("StringReplace", base)?;
    let old = text("StringReplace", old)?;
    let new = text("StringReplace", new)?;
    Ok(Value::string(s.replace(old, new)))
}
