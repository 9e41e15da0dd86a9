//! Canonical lowering for Core IL.
//!
//! The interpreter, and every backend that consumes a lowered document,
//! supports exactly one loop primitive: `While` with an optional `update`
//! block. This crate rewrites the two sugared loop forms into it.
//!
//! # Pipeline Position
//!
//! ```text
//! JSON → Validate → Parse → **Lower** → cil_eval
//! ```
//!
//! # What Happens During Lowering
//!
//! - `For var in Range(from, to, inclusive)` binds a fresh counter and a
//!   fresh end bound, then loops `counter < end` (or `<=`).
//! - `ForEach var in iter` binds the collection once and a fresh index,
//!   then loops `index < Length(collection)`.
//!
//! In both cases the increment lives in the `While`'s `update` block, so a
//! `Continue` in the body still advances the loop. All other statements
//! pass through unchanged apart from having their nested blocks lowered.

mod fresh;
mod lower;

pub use lower::lower;
