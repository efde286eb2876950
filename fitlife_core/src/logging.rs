//! Logging infrastructure for FitLife.
//!
//! Logs go to stderr so that command output on stdout (tables, JSON) can be
//! piped without interleaved log lines.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging for `--verbose` runs (`debug`) or the quiet default (`warn`).
pub fn init_for_cli(verbose: bool) {
    init_with_level(if verbose { "fitlife_core=debug,info" } else { "warn" })
}

/// Initialize logging with a specific default filter directive
///
/// This can still be overridden by RUST_LOG environment variable.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (e.g. an embedding application already set one up) is not an error.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
