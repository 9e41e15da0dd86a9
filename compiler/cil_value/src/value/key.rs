//! Canonical key encoding for Map and Set members.
//!
//! Each hashable value is serialized to a string that starts with a tag
//! for its variant, so values of different types never share a key even
//! when their text looks alike (`1`, `1.0`, `"1"` and `True` are four
//! distinct keys). Tuples encode their elements recursively, in order.

use std::fmt;
use std::fmt::Write as _;

use super::Value;
use crate::errors::{unhashable, EvalError};

/// The encoded form of a hashable value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapKey(String);

impl MapKey {
    /// Encode `value`, or fail with a `TypeError` for reference types.
    pub fn of(value: &Value) -> Result<MapKey, EvalError> {
        let mut out = String::new();
        encode(value, &mut out)?;
        Ok(MapKey(out))
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn encode(value: &Value, out: &mut String) -> Result<(), EvalError> {
    match value {
        Value::Null => out.push('N'),
        Value::Bool(b) => out.push_str(if *b { "B1" } else { "B0" }),
        Value::Int(n) => {
            let _ = write!(out, "I{n}");
        }
        Value::Float(x) => {
            let _ = write!(out, "F{:016x}", canonical_bits(*x));
        }
        Value::Str(s) => {
            let _ = write!(out, "S{}:{s}", s.len());
        }
        Value::Tuple(items) => {
            let _ = write!(out, "T{}(", items.len());
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                encode(item, out)?;
            }
            out.push(')');
        }
        Value::Array(_)
        | Value::Map(_)
        | Value::Set(_)
        | Value::Record(_)
        | Value::Deque(_)
        | Value::Heap(_) => return Err(unhashable(value)),
    }
    Ok(())
}

/// Bit pattern with `-0.0` folded into `0.0` and every NaN folded into one.
fn canonical_bits(x: f64) -> u64 {
    if x == 0.0 {
        0.0f64.to_bits()
    } else if x.is_nan() {
        f64::NAN.to_bits()
    } else {
        x.to_bits()
    }
}
