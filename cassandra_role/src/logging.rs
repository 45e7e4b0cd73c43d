//! Logging utilities for reconciliation output.
//!

// Re-exports for convenience
pub use tracing::metadata::LevelFilter;
pub use tracing::{debug, error, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{util::SubscriberInitExt, Layer};

/// Set up basic logging.
///
/// Returns false when a global subscriber was already installed (for
/// example by an earlier test in the same process).
pub fn setup(level: Option<LevelFilter>) -> bool {
    // The user can specify a log level via an env var
    // (such as for testing).
    let env = std::env::var("RUST_LOG").unwrap_or_else(|_| "cassandra_role=info".into());
    let mut logging_layers = vec![tracing_subscriber::EnvFilter::new(env).boxed()];

    // The input level overrides any env vars.
    let layer = tracing_subscriber::fmt::layer()
        .with_filter(level.unwrap_or(LevelFilter::INFO))
        .boxed();
    logging_layers.push(layer);

    let installed = tracing_subscriber::registry()
        .with(logging_layers)
        .try_init()
        .is_ok();

    if installed {
        debug!("logging set up");
    }
    installed
}
