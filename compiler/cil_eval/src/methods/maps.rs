//! Keyed collections: maps, sets and records.

use cil_value::errors::{expected_type, no_such_field};
use cil_value::{EvalError, EvalResult, Value};

// Maps

/// `Get`: the stored value, or Null for a missing key.
pub(crate) fn get(base: &Value, key: &Value) -> EvalResult {
    get_default(base, key, &Value::Null)
}

pub(crate) fn get_default(base: &Value, key: &Value, default: &Value) -> EvalResult {
    match base {
        Value::Map(map) => Ok(map.borrow().get(key)?.unwrap_or(default).clone()),
        other => Err(expected_type("Get", "a dict", other)),
    }
}

/// `Keys`: a new Array of the keys in insertion order.
pub(crate) fn keys(base: &Value) -> EvalResult {
    match base {
        Value::Map(map) => Ok(Value::array(map.borrow().keys().cloned().collect())),
        other => Err(expected_type("Keys", "a dict", other)),
    }
}

/// Map-insertion `Set`: overwrites in place, new keys go last.
pub(crate) fn insert(base: &Value, key: Value, value: Value) -> Result<(), EvalError> {
    match base {
        Value::Map(map) => map.borrow_mut().insert(key, value),
        other => Err(expected_type("Set", "a dict", other)),
    }
}

// Sets

pub(crate) fn set_has(base: &Value, value: &Value) -> EvalResult {
    match base {
        Value::Set(set) => Ok(Value::Bool(set.borrow().contains(value)?)),
        other => Err(expected_type("SetHas", "a set", other)),
    }
}

pub(crate) fn set_add(base: &Value, value: Value) -> Result<(), EvalError> {
    match base {
        Value::Set(set) => set.borrow_mut().insert(value),
        other => Err(expected_type("SetAdd", "a set", other)),
    }
}

/// Removing an absent element is a no-op.
pub(crate) fn set_remove(base: &Value, value: &Value) -> Result<(), EvalError> {
    match base {
        Value::Set(set) => set.borrow_mut().remove(value),
        other => Err(expected_type("SetRemove", "a set", other)),
    }
}

pub(crate) fn set_size(base: &Value) -> EvalResult {
    match base {
        Value::Set(set) => Ok(Value::Int(i64::try_from(set.borrow().len()).unwrap_or(i64::MAX))),
        other => Err(expected_type("SetSize", "a set", other)),
    }
}

// Records

pub(crate) fn get_field(base: &Value, name: &str) -> EvalResult {
    match base {
        Value::Record(record) => record
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| no_such_field(name)),
        other => Err(expected_type("GetField", "a record", other)),
    }
}

/// `SetField` may add a field the record did not have.
pub(crate) fn set_field(base: &Value, name: &str, value: Value) -> Result<(), EvalError> {
    match base {
        Value::Record(record) => {
            record.borrow_mut().set(name, value);
            Ok(())
        }
        other => Err(expected_type("SetField", "a record", other)),
    }
}
