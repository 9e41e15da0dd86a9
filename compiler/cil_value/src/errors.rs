//! Runtime error kinds and the factories that build them.
//!
//! Every runtime error carries an [`ErrorKind`] and a message. Errors are
//! only created through the `#[cold]` factory functions below so that the
//! message wording stays in one place: the interpreter and every backend
//! are compared on that exact text.

use std::fmt;

use crate::value::Value;

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, EvalError>;

/// Closed set of error categories surfaced to callers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Document rejected, or malformed input reached the interpreter.
    Validation,
    /// Operand-type mismatch.
    Type,
    /// Out-of-range `Index`/`CharAt`/`SetIndex`.
    Index,
    /// Zero divisor.
    Division,
    /// Pop or peek on an empty deque or heap.
    EmptyCollection,
    /// Explicit `Throw`.
    Thrown,
    /// Call depth exceeded.
    RecursionLimit,
    /// Unbound variable, unknown function or missing record field.
    Name,
    /// 64-bit integer overflow.
    Overflow,
    /// Right type, unusable content.
    Value,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Type => "TypeError",
            ErrorKind::Index => "IndexError",
            ErrorKind::Division => "DivisionError",
            ErrorKind::EmptyCollection => "EmptyCollectionError",
            ErrorKind::Thrown => "ThrownError",
            ErrorKind::RecursionLimit => "RecursionLimitError",
            ErrorKind::Name => "NameError",
            ErrorKind::Overflow => "OverflowError",
            ErrorKind::Value => "ValueError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The chain of function calls active when an error was raised,
/// innermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<String>,
}

impl EvalBacktrace {
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "call backtrace:")?;
        for (i, name) in self.frames.iter().enumerate() {
            writeln!(f, "  {i}: {name}")?;
        }
        Ok(())
    }
}

/// A runtime error.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub kind: ErrorKind,
    /// The text bound to a `catch_var` when this error is caught.
    pub message: String,
    pub backtrace: EvalBacktrace,
}

impl EvalError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        EvalError {
            kind,
            message: message.into(),
            backtrace: EvalBacktrace::default(),
        }
    }

    /// Record that the error unwound through function `name`.
    #[must_use]
    pub fn with_frame(mut self, name: &str) -> Self {
        self.backtrace.frames.push(name.to_string());
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for EvalError {}

// Arithmetic

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::new(ErrorKind::Division, "division by zero")
}

#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::new(ErrorKind::Division, "modulo by zero")
}

#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Overflow,
        format!("integer overflow in {operation}"),
    )
}

#[cold]
pub fn math_domain_error() -> EvalError {
    EvalError::new(ErrorKind::Value, "math domain error")
}

/// A float result too large to represent.
#[cold]
pub fn math_range_error() -> EvalError {
    EvalError::new(ErrorKind::Overflow, "math range error")
}

#[cold]
pub fn zero_to_negative_power() -> EvalError {
    EvalError::new(
        ErrorKind::Division,
        "0.0 cannot be raised to a negative power",
    )
}

// Type mismatches

#[cold]
pub fn unsupported_operand(op: &str, left: &Value, right: &Value) -> EvalError {
    EvalError::new(
        ErrorKind::Type,
        format!(
            "unsupported operand type(s) for {op}: '{}' and '{}'",
            left.type_name(),
            right.type_name()
        ),
    )
}

#[cold]
pub fn cannot_compare(left: &Value, right: &Value) -> EvalError {
    EvalError::new(
        ErrorKind::Type,
        format!(
            "cannot compare {} and {}",
            left.type_name(),
            right.type_name()
        ),
    )
}

/// `operation` needed a value of type `expected` and got `got`.
#[cold]
pub fn expected_type(operation: &str, expected: &str, got: &Value) -> EvalError {
    EvalError::new(
        ErrorKind::Type,
        format!("{operation} expects {expected}, got {}", got.type_name()),
    )
}

#[cold]
pub fn unhashable(value: &Value) -> EvalError {
    EvalError::new(
        ErrorKind::Type,
        format!("unhashable type: '{}'", value.type_name()),
    )
}

#[cold]
pub fn not_json_serializable(value: &Value) -> EvalError {
    EvalError::new(
        ErrorKind::Type,
        format!(
            "Object of type {} is not JSON serializable",
            value.type_name()
        ),
    )
}

#[cold]
pub fn invalid_json_key(value: &Value) -> EvalError {
    EvalError::new(
        ErrorKind::Type,
        format!(
            "keys must be str, int, float, bool or None, not {}",
            value.type_name()
        ),
    )
}

#[cold]
pub fn throw_requires_text(value: &Value) -> EvalError {
    EvalError::new(
        ErrorKind::Type,
        format!("Throw message must be a string, got {}", value.type_name()),
    )
}

// Access

#[cold]
pub fn index_out_of_range(index: i64, len: usize) -> EvalError {
    EvalError::new(
        ErrorKind::Index,
        format!("index {index} out of range for length {len}"),
    )
}

#[cold]
pub fn no_such_field(name: &str) -> EvalError {
    EvalError::new(ErrorKind::Name, format!("record has no field '{name}'"))
}

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Name,
        format!("variable '{name}' used before definition"),
    )
}

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Name,
        format!("call to undefined function '{name}'"),
    )
}

#[cold]
pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::new(
        ErrorKind::Type,
        format!("function '{name}' expects {expected} argument(s), got {got}"),
    )
}

// Collections

#[cold]
pub fn empty_collection(operation: &str) -> EvalError {
    EvalError::new(ErrorKind::EmptyCollection, operation.to_string())
}

// Conversions and content

#[cold]
pub fn invalid_literal(target: &str, text: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Value,
        format!("invalid literal for {target}: '{text}'"),
    )
}

#[cold]
pub fn cannot_convert_float(value: f64) -> EvalError {
    if value.is_nan() {
        EvalError::new(
            ErrorKind::Value,
            "cannot convert float NaN to integer",
        )
    } else {
        EvalError::new(
            ErrorKind::Overflow,
            "cannot convert float infinity to integer",
        )
    }
}

#[cold]
pub fn invalid_json(detail: &str) -> EvalError {
    EvalError::new(ErrorKind::Value, format!("invalid JSON: {detail}"))
}

#[cold]
pub fn circular_reference() -> EvalError {
    EvalError::new(ErrorKind::Value, "Circular reference detected")
}

#[cold]
pub fn empty_separator() -> EvalError {
    EvalError::new(ErrorKind::Value, "empty separator")
}

#[cold]
pub fn invalid_regex(pattern: &str, detail: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Value,
        format!("invalid regex pattern '{pattern}': {detail}"),
    )
}

#[cold]
pub fn unknown_regex_flag(flag: char) -> EvalError {
    EvalError::new(ErrorKind::Value, format!("unknown regex flag '{flag}'"))
}

// Control

#[cold]
pub fn thrown(message: &str) -> EvalError {
    EvalError::new(ErrorKind::Thrown, message)
}

#[cold]
pub fn recursion_limit_exceeded(limit: usize) -> EvalError {
    EvalError::new(
        ErrorKind::RecursionLimit,
        format!("maximum recursion depth exceeded (limit: {limit})"),
    )
}

/// Input the interpreter refuses to run: the document did not pass
/// validation and lowering first.
#[cold]
pub fn malformed(message: impl Into<String>) -> EvalError {
    EvalError::new(ErrorKind::Validation, message)
}
