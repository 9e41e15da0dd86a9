//! Source text to output: decode, flatten imports, validate, parse, lower,
//! interpret.
//!
//! Each stage fails closed. Nothing executes unless the whole document
//! validated, so a rejected document never produces partial output.
//!
//! `base_dir` is the directory imports resolve against, normally the one
//! holding the source file. Without it a document may not import.

use std::path::Path;

use cil_eval::{ErrorKind, EvalError, InterpreterBuilder, SharedPrintHandler};
use cil_ir::{parse_document, Document, ParseError};
use cil_validate::Violations;
use serde_json::Value as Json;
use thiserror::Error;

use crate::modules::{self, ImportError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Import(#[from] ImportError),
    /// Shown as its first violation.
    #[error("{}", .0.first().map(ToString::to_string).unwrap_or_default())]
    Invalid(Violations),
    /// A document the validator accepted but the parser could not build.
    #[error("{0}")]
    Malformed(#[from] ParseError),
    #[error("{}", .0.message)]
    Runtime(EvalError),
}

impl PipelineError {
    /// Everything before execution reports as a validation failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Json(_)
            | PipelineError::Import(_)
            | PipelineError::Invalid(_)
            | PipelineError::Malformed(_) => ErrorKind::Validation,
            PipelineError::Runtime(err) => err.kind,
        }
    }
}

impl From<Violations> for PipelineError {
    fn from(violations: Violations) -> Self {
        PipelineError::Invalid(violations)
    }
}

impl From<EvalError> for PipelineError {
    fn from(err: EvalError) -> Self {
        PipelineError::Runtime(err)
    }
}

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub recursion_limit: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            recursion_limit: cil_eval::DEFAULT_RECURSION_LIMIT,
        }
    }
}

/// Decode, flatten and validate. Every violation is kept.
pub fn check(source: &str, base_dir: Option<&Path>) -> Result<Json, PipelineError> {
    let json: Json = serde_json::from_str(source)?;
    let json = modules::flatten(json, base_dir)?;
    cil_validate::check(&json)?;
    Ok(json)
}

/// A validated, parsed and lowered document, ready to execute.
pub fn prepare(source: &str, base_dir: Option<&Path>) -> Result<Document, PipelineError> {
    let json = check(source, base_dir)?;
    let doc = parse_document(&json)?;
    tracing::debug!(version = %doc.version, "document accepted");
    Ok(cil_canon::lower(doc))
}

/// The lowered document as pretty-printed JSON.
pub fn lower(source: &str, base_dir: Option<&Path>) -> Result<String, PipelineError> {
    let doc = prepare(source, base_dir)?;
    Ok(serde_json::to_string_pretty(&doc)?)
}

pub fn run(
    source: &str,
    base_dir: Option<&Path>,
    options: &RunOptions,
    print_handler: SharedPrintHandler,
) -> Result<(), PipelineError> {
    let doc = prepare(source, base_dir)?;
    let mut interpreter = InterpreterBuilder::new()
        .print_handler(print_handler)
        .recursion_limit(options.recursion_limit)
        .build();
    interpreter.run(&doc)?;
    Ok(())
}

#[cfg(test)]
mod tests;
