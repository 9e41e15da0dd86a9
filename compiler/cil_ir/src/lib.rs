//! Core IL document model.
//!
//! This crate contains the data structures every later stage shares:
//! - Version labels and their ordering
//! - The node registry (closed catalog with per-role introduction versions)
//! - Typed expression and statement nodes
//! - The JSON parser that builds them, splitting dual-role tags once
//! - A read-only visitor
//!
//! Validation lives in `cil_validate`; this crate assumes nothing about a
//! document beyond what its parser checks.

pub mod ast;
mod parse;
pub mod registry;
mod version;
pub mod visitor;

pub use ast::{
    BinaryOp, Document, Expr, FuncDef, Literal, MapItem, MathConst, MathOp, RangeIter,
    RecordField, Stmt, SwitchCase,
};
pub use parse::{literal_from_json, parse_document, parse_expr, parse_stmt, ParseError};
pub use version::{unsupported_version_message, Version, SUPPORTED_VERSIONS};
