//! Diagnostic logging for the binaries.
//!
//! Reports meant for the user (validation errors, the success summary) are
//! printed directly; everything else goes through `tracing` to stderr so it
//! can be tuned with `RUST_LOG` without disturbing that output.

use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

/// Install the stderr fmt subscriber. Safe to call more than once.
pub fn init(binary: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .try_init();
    if installed.is_ok() {
        tracing::debug!(binary, "logging initialized");
    }
}
