//! Core IL driver library.
//!
//! The binary is a thin argument parser over [`pipeline`]; everything it
//! does is available here so tests and embedders can drive the same
//! stages with their own print handler.

pub mod modules;
pub mod pipeline;

use std::sync::Once;

pub use modules::{flatten, ImportError};
pub use pipeline::{check, lower, prepare, run, PipelineError, RunOptions};

static TRACING_INIT: Once = Once::new();

/// Install a tree-shaped tracing subscriber (it writes to stderr).
///
/// Does nothing unless `RUST_LOG` is set, so program output on stdout is
/// never interleaved with logs by default.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(EnvFilter::from_default_env())
                .with(HierarchicalLayer::new(2).with_targets(true))
                .init();
        }
    });
}
