//! Runtime values.
//!
//! # Handle Enforcement
//!
//! Reference-type collections live behind [`Shared`] handles whose
//! constructor is private to this crate. The factory methods on `Value`
//! are the only way to build them:
//!
//! ```text
//! let xs = Value::array(vec![Value::Int(1)]);  // OK
//! let m = Value::map(OrderedMap::new());       // OK
//! let xs = Value::Array(Shared::new(vec![]));  // ERROR: Shared::new is pub(crate)
//! ```
//!
//! Tuples and scalars are value types. Text is an immutable `Rc<str>`, so
//! copying it is a reference-count bump.

mod collections;
mod format;
mod key;
mod shared;

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::rc::Rc;

pub use collections::{OrderedMap, OrderedSet, Priority, PriorityHeap, Record};
pub use format::format_float;
pub use key::MapKey;
pub use shared::Shared;

use crate::errors::{cannot_compare, EvalError};

/// A Core IL runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    /// Immutable ordered sequence; hashable when its items are.
    Tuple(Rc<[Value]>),

    // Reference types
    Array(Shared<Vec<Value>>),
    Map(Shared<OrderedMap>),
    Set(Shared<OrderedSet>),
    Record(Shared<Record>),
    Deque(Shared<VecDeque<Value>>),
    Heap(Shared<PriorityHeap>),
}

/// A numeric operand after Bool promotion.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(x) => x,
        }
    }

    /// Exact numeric ordering. An `Int` is never rounded to meet a `Float`;
    /// `None` when either side is NaN.
    pub fn cmp_exact(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (Number::Int(a), Number::Float(b)) => int_float_cmp(a, b),
            (Number::Float(a), Number::Int(b)) => int_float_cmp(b, a).map(Ordering::reverse),
            (Number::Float(a), Number::Float(b)) => a.partial_cmp(&b),
        }
    }
}

/// Orders `i` against `x` without converting `i` to a float.
#[allow(clippy::cast_possible_truncation)]
fn int_float_cmp(i: i64, x: f64) -> Option<Ordering> {
    // 2^63, the first float above every i64.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if x.is_nan() {
        return None;
    }
    if x >= LIMIT {
        return Some(Ordering::Less);
    }
    if x < -LIMIT {
        return Some(Ordering::Greater);
    }
    // `whole` lies in [-2^63, 2^63), so the cast is exact.
    let whole = x.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(x - whole)),
        unequal => Some(unequal),
    }
}

// Factory methods (the only way to construct reference types)

impl Value {
    #[inline]
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(s.as_ref()))
    }

    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Shared::new(items))
    }

    #[inline]
    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Rc::from(items))
    }

    #[inline]
    pub fn map(map: OrderedMap) -> Self {
        Value::Map(Shared::new(map))
    }

    #[inline]
    pub fn set(set: OrderedSet) -> Self {
        Value::Set(Shared::new(set))
    }

    #[inline]
    pub fn record(record: Record) -> Self {
        Value::Record(Shared::new(record))
    }

    #[inline]
    pub fn deque(items: VecDeque<Value>) -> Self {
        Value::Deque(Shared::new(items))
    }

    #[inline]
    pub fn heap() -> Self {
        Value::Heap(Shared::new(PriorityHeap::new()))
    }
}

impl Value {
    /// Null, `False`, zero and empty text or collections are falsy.
    /// Records are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Tuple(items) => !items.is_empty(),
            Value::Array(items) => !items.borrow().is_empty(),
            Value::Map(map) => !map.borrow().is_empty(),
            Value::Set(set) => !set.borrow().is_empty(),
            Value::Record(_) => true,
            Value::Deque(items) => !items.borrow().is_empty(),
            Value::Heap(heap) => !heap.borrow().is_empty(),
        }
    }

    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "None",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Tuple(_) => "tuple",
            Value::Array(_) => "list",
            Value::Map(_) => "dict",
            Value::Set(_) => "set",
            Value::Record(_) => "record",
            Value::Deque(_) => "deque",
            Value::Heap(_) => "heap",
        }
    }

    /// The numeric view of Int, Float and Bool.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Bool(b) => Some(Number::Int(i64::from(*b))),
            Value::Int(n) => Some(Number::Int(*n)),
            Value::Float(x) => Some(Number::Float(*x)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Deep structural equality.
    ///
    /// Int, Float and Bool compare numerically with each other; any other
    /// cross-type pair is unequal. Maps and sets compare as unordered
    /// collections, sequences element by element.
    pub fn equals(&self, other: &Value) -> bool {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return numbers_equal(a, b);
        }
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => slices_equal(a, b),
            (Value::Array(a), Value::Array(b)) => {
                a.ptr_eq(b) || slices_equal(&a.borrow(), &b.borrow())
            }
            (Value::Deque(a), Value::Deque(b)) => {
                a.ptr_eq(b) || deques_equal(&a.borrow(), &b.borrow())
            }
            (Value::Map(a), Value::Map(b)) => a.ptr_eq(b) || maps_equal(&a.borrow(), &b.borrow()),
            (Value::Set(a), Value::Set(b)) => a.ptr_eq(b) || sets_equal(&a.borrow(), &b.borrow()),
            (Value::Record(a), Value::Record(b)) => {
                a.ptr_eq(b) || records_equal(&a.borrow(), &b.borrow())
            }
            (Value::Heap(a), Value::Heap(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Ordering for `<`, `<=`, `>`, `>=`.
    ///
    /// Defined for numeric pairs and text pairs. `None` means the operands
    /// are unordered (a NaN is involved); any other pairing is a
    /// `TypeError`.
    pub fn compare(&self, other: &Value) -> Result<Option<Ordering>, EvalError> {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return Ok(a.cmp_exact(b));
        }
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
            _ => Err(cannot_compare(self, other)),
        }
    }
}

fn numbers_equal(a: Number, b: Number) -> bool {
    a.cmp_exact(b) == Some(Ordering::Equal)
}

fn slices_equal(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
}

fn deques_equal(a: &VecDeque<Value>, b: &VecDeque<Value>) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
}

fn maps_equal(a: &OrderedMap, b: &OrderedMap) -> bool {
    a.len() == b.len()
        && a.iter().all(|(k, v)| match b.get(k) {
            Ok(Some(w)) => v.equals(w),
            _ => false,
        })
}

fn sets_equal(a: &OrderedSet, b: &OrderedSet) -> bool {
    a.len() == b.len() && a.iter().all(|v| b.contains(v).unwrap_or(false))
}

fn records_equal(a: &Record, b: &Record) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|(name, v)| b.get(name).is_some_and(|w| v.equals(w)))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

#[cfg(test)]
mod tests;
