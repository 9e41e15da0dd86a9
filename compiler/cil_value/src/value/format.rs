//! Canonical text rendering of values.
//!
//! `Display` is the form `Print` and `ToString` produce: top-level text is
//! written raw, while text nested in a container is quoted. Floats follow
//! the shortest round-trip rendering with positional notation for
//! exponents in `[-4, 16)` and scientific notation outside it.

use std::fmt::{self, Write as _};

use super::Value;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            _ => Renderer::default().write(self, f),
        }
    }
}

impl Value {
    /// The nested rendering: text is quoted.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        let _ = Renderer::default().write(self, &mut out);
        out
    }
}

/// Tracks the containers currently being rendered so a container that
/// holds itself prints an ellipsis instead of recursing forever.
#[derive(Default)]
struct Renderer {
    open: Vec<usize>,
}

impl Renderer {
    fn write(&mut self, value: &Value, out: &mut impl fmt::Write) -> fmt::Result {
        match value {
            Value::Null => out.write_str("None"),
            Value::Bool(true) => out.write_str("True"),
            Value::Bool(false) => out.write_str("False"),
            Value::Int(n) => write!(out, "{n}"),
            Value::Float(x) => out.write_str(&format_float(*x)),
            Value::Str(s) => write_quoted(s, out),
            Value::Tuple(items) => {
                out.write_char('(')?;
                self.write_items(items.iter(), out)?;
                if items.len() == 1 {
                    out.write_char(',')?;
                }
                out.write_char(')')
            }
            Value::Array(items) => {
                if self.open.contains(&items.addr()) {
                    return out.write_str("[...]");
                }
                self.open.push(items.addr());
                out.write_char('[')?;
                self.write_items(items.borrow().iter(), out)?;
                self.open.pop();
                out.write_char(']')
            }
            Value::Deque(items) => {
                if self.open.contains(&items.addr()) {
                    return out.write_str("[...]");
                }
                self.open.push(items.addr());
                out.write_str("deque([")?;
                self.write_items(items.borrow().iter(), out)?;
                self.open.pop();
                out.write_str("])")
            }
            Value::Map(map) => {
                if self.open.contains(&map.addr()) {
                    return out.write_str("{...}");
                }
                self.open.push(map.addr());
                out.write_char('{')?;
                for (i, (k, v)) in map.borrow().iter().enumerate() {
                    if i > 0 {
                        out.write_str(", ")?;
                    }
                    self.write(k, out)?;
                    out.write_str(": ")?;
                    self.write(v, out)?;
                }
                self.open.pop();
                out.write_char('}')
            }
            Value::Record(record) => {
                if self.open.contains(&record.addr()) {
                    return out.write_str("{...}");
                }
                self.open.push(record.addr());
                out.write_char('{')?;
                for (i, (name, v)) in record.borrow().iter().enumerate() {
                    if i > 0 {
                        out.write_str(", ")?;
                    }
                    write_quoted(name, out)?;
                    out.write_str(": ")?;
                    self.write(v, out)?;
                }
                self.open.pop();
                out.write_char('}')
            }
            Value::Set(set) => {
                let set = set.borrow();
                if set.is_empty() {
                    return out.write_str("set()");
                }
                out.write_char('{')?;
                self.write_items(set.iter(), out)?;
                out.write_char('}')
            }
            Value::Heap(_) => out.write_str("<heap>"),
        }
    }

    fn write_items<'v>(
        &mut self,
        items: impl Iterator<Item = &'v Value>,
        out: &mut impl fmt::Write,
    ) -> fmt::Result {
        for (i, item) in items.enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            self.write(item, out)?;
        }
        Ok(())
    }
}

/// Quote text the way a Python `repr` does: single quotes unless the text
/// contains a single quote and no double quote.
fn write_quoted(s: &str, out: &mut impl fmt::Write) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    out.write_char(quote)?;
    for ch in s.chars() {
        match ch {
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if c == quote => {
                out.write_char('\\')?;
                out.write_char(c)?;
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => write!(out, "\\x{:02x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char(quote)
}

/// Render a float: `nan`, `inf`, `-inf`, integral values with a trailing
/// `.0`, and scientific notation (`1e+16`, `1.5e-05`) for very large or
/// very small magnitudes.
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "-1.2345e-7".
    let sci = format!("{x:e}");
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    let mut out = String::from(sign);
    if (-4..16).contains(&exponent) {
        if exponent >= 0 {
            let int_len = usize::try_from(exponent).unwrap_or(0) + 1;
            if digits.len() <= int_len {
                out.push_str(&digits);
                out.extend(std::iter::repeat('0').take(int_len - digits.len()));
                out.push_str(".0");
            } else {
                out.push_str(&digits[..int_len]);
                out.push('.');
                out.push_str(&digits[int_len..]);
            }
        } else {
            out.push_str("0.");
            let zeros = usize::try_from(-exponent - 1).unwrap_or(0);
            out.extend(std::iter::repeat('0').take(zeros));
            out.push_str(&digits);
        }
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        let _ = write!(out, "e{exp_sign}{:02}", exponent.unsigned_abs());
    }
    out
}
