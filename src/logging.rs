//! Logging initialization.
//!
//! The adapter logs through `tracing`; the host decides where output goes.
//! This helper wires up a stderr subscriber for hosts (and tests) that have
//! not installed their own.

use tracing_subscriber::EnvFilter;

/// Initializes stderr logging, honoring `RUST_LOG` and defaulting to `info`.
///
/// Harmless if the host already installed a global subscriber; the existing
/// one wins.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .ok();
}
