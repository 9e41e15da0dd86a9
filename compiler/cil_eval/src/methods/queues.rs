//! Deques and the min-priority heap.

use cil_value::errors::{empty_collection, expected_type};
use cil_value::{EvalError, EvalResult, Number, Priority, Value};

fn size(n: usize) -> Value {
    Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
}

// Deques

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum End {
    Front,
    Back,
}

pub(crate) fn deque_size(base: &Value) -> EvalResult {
    match base {
        Value::Deque(items) => Ok(size(items.borrow().len())),
        other => Err(expected_type("DequeSize", "a deque", other)),
    }
}

pub(crate) fn deque_push(base: &Value, end: End, value: Value) -> Result<(), EvalError> {
    let Value::Deque(items) = base else {
        let operation = match end {
            End::Front => "PushFront",
            End::Back => "PushBack",
        };
        return Err(expected_type(operation, "a deque", base));
    };
    let mut items = items.borrow_mut();
    match end {
        End::Front => items.push_front(value),
        End::Back => items.push_back(value),
    }
    Ok(())
}

pub(crate) fn deque_pop(base: &Value, end: End) -> EvalResult {
    let Value::Deque(items) = base else {
        let operation = match end {
            End::Front => "PopFront",
            End::Back => "PopBack",
        };
        return Err(expected_type(operation, "a deque", base));
    };
    let mut items = items.borrow_mut();
    let popped = match end {
        End::Front => items.pop_front(),
        End::Back => items.pop_back(),
    };
    popped.ok_or_else(|| empty_collection("pop from an empty deque"))
}

// Heaps

/// Heap priorities are numbers; Bool is rejected.
fn priority(value: &Value) -> Result<Priority, EvalError> {
    match (value, value.as_number()) {
        (Value::Bool(_), _) | (_, None) => Err(expected_type("HeapPush", "a numeric priority", value)),
        (_, Some(Number::Int(n))) => Ok(Priority::Int(n)),
        (_, Some(Number::Float(x))) => Ok(Priority::Float(x)),
    }
}

pub(crate) fn heap_push(base: &Value, priority_value: &Value, value: Value) -> Result<(), EvalError> {
    let Value::Heap(heap) = base else {
        return Err(expected_type("HeapPush", "a heap", base));
    };
    let priority = priority(priority_value)?;
    heap.borrow_mut().push(priority, value);
    Ok(())
}

pub(crate) fn heap_pop(base: &Value) -> EvalResult {
    match base {
        Value::Heap(heap) => heap
            .borrow_mut()
            .pop()
            .ok_or_else(|| empty_collection("pop from an empty heap")),
        other => Err(expected_type("HeapPop", "a heap", other)),
    }
}

pub(crate) fn heap_peek(base: &Value) -> EvalResult {
    match base {
        Value::Heap(heap) => heap
            .borrow()
            .peek()
            .cloned()
            .ok_or_else(|| empty_collection("peek at an empty heap")),
        other => Err(expected_type("HeapPeek", "a heap", other)),
    }
}

pub(crate) fn heap_size(base: &Value) -> EvalResult {
    match base {
        Value::Heap(heap) => Ok(size(heap.borrow().len())),
        other => Err(expected_type("HeapSize", "a heap", other)),
    }
}
