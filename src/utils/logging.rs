// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Sets up the logging framework using tracing_subscriber.
/// Reads log level filters from the `RUST_LOG` environment variable.
/// Defaults to "info", or "warn" when `quiet` is set.
pub fn setup_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // try_init so repeated setup (tests, embedding callers) doesn't panic
    let _ = fmt().with_env_filter(filter).try_init();

    tracing::debug!("Logging setup complete.");
}
