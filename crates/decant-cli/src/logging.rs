//! Logging setup for the CLI.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging.
///
/// Honors `RUST_LOG` when set, otherwise uses the `--log-level` value.
/// Logs go to stderr so stdout stays clean for command output and the
/// machine-readable report lines.
pub fn init(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
