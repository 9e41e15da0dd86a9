//! `ToInt`, `ToFloat` and `ToString`.

use cil_value::errors::{expected_type, integer_overflow, invalid_literal};
use cil_value::{EvalResult, Value};

use super::numeric::float_to_int;

/// Floats truncate toward zero; text is trimmed and parsed as base 10.
pub(crate) fn to_int(value: &Value) -> EvalResult {
    match value {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(x) => float_to_int(x.trunc()).map(Value::Int),
        Value::Str(s) => parse_int(s.trim()).ok_or_else(|| {
            if is_decimal(s.trim()) {
                integer_overflow("int()")
            } else {
                invalid_literal("int() with base 10", s)
            }
        }),
        other => Err(expected_type("ToInt", "a number or str", other)),
    }
}

fn parse_int(text: &str) -> Option<Value> {
    text.replace('_', "").parse::<i64>().ok().filter(|_| is_decimal(text)).map(Value::Int)
}

/// Optional sign, then digits with single underscores between them.
fn is_decimal(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty()
        && !digits.starts_with('_')
        && !digits.ends_with('_')
        && !digits.contains("__")
        && digits.chars().all(|c| c.is_ascii_digit() || c == '_')
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn to_float(value: &Value) -> EvalResult {
    match value {
        Value::Int(n) => Ok(Value::Float(*n as f64)),
        Value::Float(x) => Ok(Value::Float(*x)),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| invalid_literal("float()", s)),
        other => Err(expected_type("ToFloat", "a number or str", other)),
    }
}

pub(crate) fn to_string(value: &Value) -> Value {
    match value {
        Value::Str(_) => value.clone(),
        other => Value::string(other.to_string()),
    }
}
