//! `Math`, `MathPow` and `MathConst`.
//!
//! Results follow IEEE-754 double semantics except where a real-valued
//! answer does not exist (a domain error) or an exact one overflows (a
//! range error). `floor` and `ceil` produce Int; `abs` keeps the operand's
//! type.

use cil_ir::{MathConst, MathOp};
use cil_value::errors::{
    cannot_convert_float, expected_type, integer_overflow, math_domain_error, math_range_error,
    zero_to_negative_power,
};
use cil_value::{EvalError, EvalResult, Number, Value};

fn number(operation: &str, value: &Value) -> Result<Number, EvalError> {
    value
        .as_number()
        .ok_or_else(|| expected_type(operation, "a number", value))
}

/// An integral float as an Int.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(crate) fn float_to_int(x: f64) -> Result<i64, EvalError> {
    if !x.is_finite() {
        return Err(cannot_convert_float(x));
    }
    // `as` saturates, so range-check first.
    if x >= 9_223_372_036_854_775_808.0 || x < -9_223_372_036_854_775_808.0 {
        return Err(integer_overflow("float conversion"));
    }
    Ok(x as i64)
}

fn finite(result: f64, input_finite: bool) -> EvalResult {
    if result.is_nan() {
        Err(math_domain_error())
    } else if result.is_infinite() && input_finite {
        Err(math_range_error())
    } else {
        Ok(Value::Float(result))
    }
}

pub(crate) fn math(op: MathOp, arg: &Value) -> EvalResult {
    let n = number("Math", arg)?;
    if let Number::Int(i) = n {
        match op {
            MathOp::Floor | MathOp::Ceil => return Ok(Value::Int(i)),
            MathOp::Abs => {
                return i
                    .checked_abs()
                    .map(Value::Int)
                    .ok_or_else(|| integer_overflow("abs"));
            }
            _ => {}
        }
    }
    let x = n.to_f64();
    match op {
        MathOp::Floor => float_to_int(x.floor()).map(Value::Int),
        MathOp::Ceil => float_to_int(x.ceil()).map(Value::Int),
        MathOp::Abs => Ok(Value::Float(x.abs())),
        MathOp::Sqrt if x < 0.0 => Err(math_domain_error()),
        MathOp::Sqrt => Ok(Value::Float(x.sqrt())),
        MathOp::Log if x <= 0.0 => Err(math_domain_error()),
        MathOp::Log => Ok(Value::Float(x.ln())),
        MathOp::Exp => finite(x.exp(), x.is_finite()),
        MathOp::Sin | MathOp::Cos | MathOp::Tan if x.is_infinite() => Err(math_domain_error()),
        MathOp::Sin => Ok(Value::Float(x.sin())),
        MathOp::Cos => Ok(Value::Float(x.cos())),
        MathOp::Tan => Ok(Value::Float(x.tan())),
    }
}

/// Int to a non-negative Int power stays exact; everything else is Float.
pub(crate) fn pow(base: &Value, exponent: &Value) -> EvalResult {
    let b = number("MathPow", base)?;
    let e = number("MathPow", exponent)?;
    if let (Number::Int(b), Number::Int(e)) = (b, e) {
        if e >= 0 {
            return int_pow(b, e);
        }
    }
    let (x, y) = (b.to_f64(), e.to_f64());
    if x == 0.0 && y < 0.0 {
        return Err(zero_to_negative_power());
    }
    if x < 0.0 && y.is_finite() && y.fract() != 0.0 {
        return Err(math_domain_error());
    }
    finite(x.powf(y), x.is_finite() && y.is_finite())
}

fn int_pow(base: i64, exponent: i64) -> EvalResult {
    if let Ok(e) = u32::try_from(exponent) {
        return base
            .checked_pow(e)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("power"));
    }
    match base {
        0 | 1 => Ok(Value::Int(base)),
        -1 => Ok(Value::Int(if exponent % 2 == 0 { 1 } else { -1 })),
        _ => Err(integer_overflow("power")),
    }
}

pub(crate) fn constant(name: MathConst) -> Value {
    match name {
        MathConst::Pi => Value::Float(std::f64::consts::PI),
        MathConst::E => Value::Float(std::f64::consts::E),
    }
}
