//! Logging configuration for Leadbook.
//!
//! Logs go to stderr so command output on stdout stays clean for piping.

use tracing_subscriber::EnvFilter;

/// Initializes stderr logging with an env-controlled filter (default `info`).
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
