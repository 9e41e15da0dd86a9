//! `JsonParse` and `JsonStringify`.
//!
//! Parsing goes through `serde_json` with `preserve_order`, so object keys
//! keep their source order in the resulting Map. Stringifying writes the
//! text Python's `json.dumps` produces for the same data: `", "` and
//! `": "` separators, ASCII-only output, and `NaN`/`Infinity` for
//! non-finite floats.

use std::fmt::Write as _;

use cil_value::errors::{
    circular_reference, expected_type, invalid_json, invalid_json_key, not_json_serializable,
};
use cil_value::{format_float, EvalError, EvalResult, OrderedMap, Value};
use serde_json::Value as Json;

pub(crate) fn parse(source: &Value) -> EvalResult {
    let text = source
        .as_str()
        .ok_or_else(|| expected_type("JsonParse", "a str", source))?;
    let json: Json = serde_json::from_str(text).map_err(|e| invalid_json(&e.to_string()))?;
    from_json(json)
}

fn from_json(json: Json) -> EvalResult {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Value::string(s),
        Json::Array(items) => Value::array(
            items
                .into_iter()
                .map(from_json)
                .collect::<Result<Vec<_>, EvalError>>()?,
        ),
        Json::Object(entries) => {
            let mut map = OrderedMap::new();
            for (key, value) in entries {
                map.insert(Value::string(key), from_json(value)?)?;
            }
            Value::map(map)
        }
    })
}

pub(crate) fn stringify(value: &Value, pretty: bool) -> EvalResult {
    let mut writer = JsonWriter {
        out: String::new(),
        indent: pretty.then_some(2),
        open: Vec::new(),
    };
    writer.value(value, 0)?;
    Ok(Value::string(writer.out))
}

// ── Writer ──────────────────────────────────────────────────────────

struct JsonWriter {
    out: String,
    indent: Option<usize>,
    /// Containers on the current path, for cycle detection.
    open: Vec<Value>,
}

impl JsonWriter {
    fn value(&mut self, value: &Value, depth: usize) -> Result<(), EvalError> {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(true) => self.out.push_str("true"),
            Value::Bool(false) => self.out.push_str("false"),
            Value::Int(n) => {
                let _ = write!(self.out, "{n}");
            }
            Value::Float(x) => self.out.push_str(&float(*x)),
            Value::Str(s) => quote(s, &mut self.out),
            Value::Tuple(items) => self.array(items.iter(), items.len(), depth)?,
            Value::Array(items) => {
                self.enter(value)?;
                let items = items.borrow();
                self.array(items.iter(), items.len(), depth)?;
                self.open.pop();
            }
            Value::Map(map) => {
                self.enter(value)?;
                let map = map.borrow();
                let mut entries = Vec::with_capacity(map.len());
                for (k, v) in map.iter() {
                    entries.push((key(k)?, v));
                }
                self.object(entries, depth)?;
                self.open.pop();
            }
            Value::Record(record) => {
                self.enter(value)?;
                let record = record.borrow();
                let entries = record.iter().map(|(k, v)| (k.to_string(), v)).collect();
                self.object(entries, depth)?;
                self.open.pop();
            }
            Value::Set(_) | Value::Deque(_) | Value::Heap(_) => {
                return Err(not_json_serializable(value));
            }
        }
        Ok(())
    }

    fn enter(&mut self, container: &Value) -> Result<(), EvalError> {
        if self.open.iter().any(|open| same_container(open, container)) {
            return Err(circular_reference());
        }
        self.open.push(container.clone());
        Ok(())
    }

    fn array<'v>(
        &mut self,
        items: impl Iterator<Item = &'v Value>,
        len: usize,
        depth: usize,
    ) -> Result<(), EvalError> {
        if len == 0 {
            self.out.push_str("[]");
            return Ok(());
        }
        self.out.push('[');
        for (i, item) in items.enumerate() {
            self.separator(i, depth + 1);
            self.value(item, depth + 1)?;
        }
        self.close(depth, ']');
        Ok(())
    }

    fn object(&mut self, entries: Vec<(String, &Value)>, depth: usize) -> Result<(), EvalError> {
        if entries.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }
        self.out.push('{');
        for (i, (k, v)) in entries.into_iter().enumerate() {
            self.separator(i, depth + 1);
            quote(&k, &mut self.out);
            self.out.push_str(": ");
            self.value(v, depth + 1)?;
        }
        self.close(depth, '}');
        Ok(())
    }

    /// Before the `i`th member: a comma after the first, then either a
    /// space or a newline and indentation.
    fn separator(&mut self, i: usize, depth: usize) {
        match self.indent {
            None => {
                if i > 0 {
                    self.out.push_str(", ");
                }
            }
            Some(width) => {
                if i > 0 {
                    self.out.push(',');
                }
                self.newline(width * depth);
            }
        }
    }

    fn close(&mut self, depth: usize, bracket: char) {
        if let Some(width) = self.indent {
            self.newline(width * depth);
        }
        self.out.push(bracket);
    }

    fn newline(&mut self, spaces: usize) {
        self.out.push('\n');
        self.out.extend(std::iter::repeat(' ').take(spaces));
    }
}

fn same_container(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
        (Value::Map(a), Value::Map(b)) => a.ptr_eq(b),
        (Value::Record(a), Value::Record(b)) => a.ptr_eq(b),
        _ => false,
    }
}

/// Object keys: text as is; other scalars in their JSON spelling.
fn key(value: &Value) -> Result<String, EvalError> {
    match value {
        Value::Str(s) => Ok(s.to_string()),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(x) => Ok(float(*x)),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok("null".to_string()),
        other => Err(invalid_json_key(other)),
    }
}

fn float(x: f64) -> String {
    if x.is_nan() {
        "NaN".to_string()
    } else if x == f64::INFINITY {
        "Infinity".to_string()
    } else if x == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        format_float(x)
    }
}

fn quote(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            ' '..='~' => out.push(ch),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{unit:04x}");
                }
            }
        }
    }
    out.push('"');
}
