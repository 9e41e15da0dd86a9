//! Binary and unary operators.
//!
//! Direct enum dispatch over the operand pair. Int, Float and Bool form
//! one numeric tower (Bool counts as 0 or 1); Int arithmetic is checked
//! and overflow is an error, never a wrap.

use std::cmp::Ordering;

use cil_ir::BinaryOp;
use cil_value::errors::{division_by_zero, integer_overflow, modulo_by_zero, unsupported_operand};
use cil_value::{EvalResult, Number, Value};

/// Evaluate `left op right` with both operands already evaluated.
///
/// `and`/`or` are normally short-circuited by the interpreter before the
/// right operand exists; given both, they select an operand the same way.
pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => numeric(op, left, right, i64::checked_sub, |a, b| a - b, "subtraction"),
        BinaryOp::Mul => multiply(left, right),
        BinaryOp::Div => divide(left, right),
        BinaryOp::Mod => modulo(left, right),
        BinaryOp::Eq => Ok(Value::Bool(left.equals(right))),
        BinaryOp::NotEq => Ok(Value::Bool(!left.equals(right))),
        BinaryOp::Lt => ordered(left, right, Ordering::is_lt),
        BinaryOp::LtEq => ordered(left, right, Ordering::is_le),
        BinaryOp::Gt => ordered(left, right, Ordering::is_gt),
        BinaryOp::GtEq => ordered(left, right, Ordering::is_ge),
        BinaryOp::And => Ok(if left.is_truthy() { right } else { left }.clone()),
        BinaryOp::Or => Ok(if left.is_truthy() { left } else { right }.clone()),
    }
}

pub fn evaluate_not(value: &Value) -> Value {
    Value::Bool(!value.is_truthy())
}

fn numbers(left: &Value, right: &Value) -> Option<(Number, Number)> {
    Some((left.as_number()?, right.as_number()?))
}

/// Shared shape of `-` and the numeric part of `+` and `*`.
fn numeric(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
    op_name: &str,
) -> EvalResult {
    match numbers(left, right) {
        Some((Number::Int(a), Number::Int(b))) => int_op(a, b)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow(op_name)),
        Some((a, b)) => Ok(Value::Float(float_op(a.to_f64(), b.to_f64()))),
        None => Err(unsupported_operand(op.as_symbol(), left, right)),
    }
}

fn add(left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::string(format!("{left}{right}"))),
        (Value::Array(a), Value::Array(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::array(items))
        }
        (Value::Tuple(a), Value::Tuple(b)) => {
            Ok(Value::tuple(a.iter().chain(b.iter()).cloned().collect()))
        }
        _ => numeric(BinaryOp::Add, left, right, i64::checked_add, |a, b| a + b, "addition"),
    }
}

fn multiply(left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) => repeat(s, *n),
        _ => numeric(BinaryOp::Mul, left, right, i64::checked_mul, |a, b| a * b, "multiplication"),
    }
}

/// `text * n`; a count of zero or less gives empty text.
fn repeat(text: &str, count: i64) -> EvalResult {
    let count = usize::try_from(count).unwrap_or(0);
    if count > 0 && text.len().checked_mul(count).is_none() {
        return Err(integer_overflow("repetition"));
    }
    Ok(Value::string(text.repeat(count)))
}

/// True division: the result is always a Float.
fn divide(left: &Value, right: &Value) -> EvalResult {
    let Some((a, b)) = numbers(left, right) else {
        return Err(unsupported_operand("/", left, right));
    };
    let divisor = b.to_f64();
    if divisor == 0.0 {
        return Err(division_by_zero());
    }
    Ok(Value::Float(a.to_f64() / divisor))
}

/// Floored modulo: a non-zero result has the sign of the divisor, so
/// `a == b * floor(a / b) + a % b`.
fn modulo(left: &Value, right: &Value) -> EvalResult {
    match numbers(left, right) {
        Some((Number::Int(a), Number::Int(b))) => {
            if b == 0 {
                return Err(modulo_by_zero());
            }
            // `i64::MIN % -1` is mathematically 0; `wrapping_rem` agrees.
            let r = a.wrapping_rem(b);
            Ok(Value::Int(if r != 0 && (r < 0) != (b < 0) { r + b } else { r }))
        }
        Some((a, b)) => {
            let (a, b) = (a.to_f64(), b.to_f64());
            if b == 0.0 {
                return Err(modulo_by_zero());
            }
            let mut r = a % b;
            if r == 0.0 {
                r = 0.0_f64.copysign(b);
            } else if (r < 0.0) != (b < 0.0) {
                r += b;
            }
            Ok(Value::Float(r))
        }
        None => Err(unsupported_operand("%", left, right)),
    }
}

/// Comparisons involving NaN are false.
fn ordered(left: &Value, right: &Value, test: fn(Ordering) -> bool) -> EvalResult {
    Ok(Value::Bool(left.compare(right)?.is_some_and(test)))
}
