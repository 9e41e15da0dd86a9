//! Storage behind the reference-type values.
//!
//! Maps and sets keep first-insertion order. Each pairs a `Vec` of entries
//! with an `FxHashMap` from canonical key to position; re-inserting an
//! existing key overwrites in place and never moves the entry.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

use super::key::MapKey;
use super::{Number, Value};
use crate::errors::EvalError;

/// Insertion-ordered map from hashable values to values.
#[derive(Clone, Debug, Default)]
pub struct OrderedMap {
    entries: Vec<(Value, Value)>,
    index: FxHashMap<MapKey, usize>,
}

impl OrderedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: Value, value: Value) -> Result<(), EvalError> {
        let encoded = MapKey::of(&key)?;
        if let Some(&pos) = self.index.get(&encoded) {
            self.entries[pos].1 = value;
        } else {
            self.index.insert(encoded, self.entries.len());
            self.entries.push((key, value));
        }
        Ok(())
    }

    pub fn get(&self, key: &Value) -> Result<Option<&Value>, EvalError> {
        let encoded = MapKey::of(key)?;
        Ok(self.index.get(&encoded).map(|&pos| &self.entries[pos].1))
    }

    pub fn contains_key(&self, key: &Value) -> Result<bool, EvalError> {
        Ok(self.index.contains_key(&MapKey::of(key)?))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Insertion-ordered set of hashable values.
#[derive(Clone, Debug, Default)]
pub struct OrderedSet {
    items: Vec<Value>,
    index: FxHashMap<MapKey, usize>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` unless an equal key is already present.
    pub fn insert(&mut self, value: Value) -> Result<(), EvalError> {
        let encoded = MapKey::of(&value)?;
        if !self.index.contains_key(&encoded) {
            self.index.insert(encoded, self.items.len());
            self.items.push(value);
        }
        Ok(())
    }

    pub fn contains(&self, value: &Value) -> Result<bool, EvalError> {
        Ok(self.index.contains_key(&MapKey::of(value)?))
    }

    /// Remove `value` if present; the remaining members keep their order.
    pub fn remove(&mut self, value: &Value) -> Result<(), EvalError> {
        let encoded = MapKey::of(value)?;
        let Some(pos) = self.index.remove(&encoded) else {
            return Ok(());
        };
        self.items.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A mutable bag of named fields, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Overwrite an existing field or append a new one.
    pub fn set(&mut self, name: &str, value: Value) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A numeric heap priority.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Priority {
    Int(i64),
    Float(f64),
}

impl Priority {
    fn number(self) -> Number {
        match self {
            Priority::Int(n) => Number::Int(n),
            // `-0.0 + 0.0` is `0.0`; both zeros rank together.
            Priority::Float(x) => Number::Float(x + 0.0),
        }
    }

    /// Numeric order, with NaN ranked after every number so the heap
    /// still sees a total order.
    fn heap_cmp(self, other: Priority) -> Ordering {
        let (a, b) = (self.number(), other.number());
        a.cmp_exact(b).unwrap_or_else(|| {
            let is_nan = |n: Number| matches!(n, Number::Float(x) if x.is_nan());
            is_nan(a).cmp(&is_nan(b))
        })
    }
}

#[derive(Debug)]
struct HeapEntry {
    priority: Priority,
    seq: u64,
    value: Value,
}

impl HeapEntry {
    fn rank(&self) -> (Priority, u64) {
        (self.priority, self.seq)
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    // `BinaryHeap` is a max-heap; reverse so the lowest (priority, seq) is on top.
    fn cmp(&self, other: &Self) -> Ordering {
        let (p1, s1) = self.rank();
        let (p2, s2) = other.rank();
        p2.heap_cmp(p1).then_with(|| s2.cmp(&s1))
    }
}

/// Min-priority queue. Equal priorities pop in insertion order.
#[derive(Debug, Default)]
pub struct PriorityHeap {
    entries: BinaryHeap<HeapEntry>,
    next_seq: u64,
}

impl PriorityHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, priority: Priority, value: Value) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(HeapEntry {
            priority,
            seq,
            value,
        });
    }

    pub fn pop(&mut self) -> Option<Value> {
        self.entries.pop().map(|entry| entry.value)
    }

    pub fn peek(&self) -> Option<&Value> {
        self.entries.peek().map(|entry| &entry.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
