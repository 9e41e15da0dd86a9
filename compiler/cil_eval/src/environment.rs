//! Variable storage.
//!
//! There are exactly two kinds of scope: the global bindings and the frame
//! of the innermost active call. Blocks do not open scopes. Inside a call,
//! `Let` and `Assign` write the frame; everywhere else they write the
//! globals. Reads try the frame first, then the globals, so a function
//! sees global bindings it has not shadowed.

use rustc_hash::FxHashMap;

use cil_value::Value;

type Bindings = FxHashMap<String, Value>;

#[derive(Debug, Default)]
pub struct Environment {
    globals: Bindings,
    /// One entry per active call, innermost last.
    frames: Vec<Bindings>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(frame) = self.frames.last() {
            if let Some(value) = frame.get(name) {
                return Some(value.clone());
            }
        }
        self.globals.get(name).cloned()
    }

    /// Bind `name` in the current frame, or globally outside any call.
    pub fn bind(&mut self, name: &str, value: Value) {
        let scope = self.frames.last_mut().unwrap_or(&mut self.globals);
        scope.insert(name.to_string(), value);
    }

    /// Enter a call whose parameters are already bound.
    pub fn push_frame(&mut self, params: impl IntoIterator<Item = (String, Value)>) {
        self.frames.push(params.into_iter().collect());
    }

    pub fn pop_frame(&mut self) {
        debug_assert!(!self.frames.is_empty(), "pop_frame without a frame");
        self.frames.pop();
    }
}

#[cfg(test)]
mod tests;
