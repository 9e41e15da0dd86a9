//! Core IL validation.
//!
//! Validation runs over the raw JSON document, before any typed IR exists,
//! so it can report shapes the IR cannot even represent. It never mutates
//! the document and never executes any part of it.
//!
//! The result is an ordered list of [`Violation`]s, each a JSON path and a
//! literal message. The wording of those messages is stable: tools and
//! tests match on it.

mod document;
mod functions;
mod walker;

use std::fmt;

use serde_json::Value as Json;
use thiserror::Error;

/// One rejected location in a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// JSON path, e.g. `$.body[0].value.left`.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A non-empty set of violations, as an error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("document rejected with {} violation(s)", .0.len())]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// The first violation, which is the one reported when only one is shown.
    pub fn first(&self) -> Option<&Violation> {
        self.0.first()
    }
}

/// Validate a document, returning every violation in document order.
pub fn validate(doc: &Json) -> Vec<Violation> {
    let violations = document::validate_document(doc);
    tracing::debug!(violations = violations.len(), "validated document");
    violations
}

/// Validate a document, failing if there is any violation.
pub fn check(doc: &Json) -> Result<(), Violations> {
    let violations = validate(doc);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(Violations(violations))
    }
}

#[cfg(test)]
mod tests;
