//! Logging configuration for sparql-batch.
//!
//! Logs go to stderr so that stdout carries only batch reports.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "sparql_batch=debug,info"
    } else {
        "warn"
    }
}

/// Initializes logging to stderr.
///
/// `RUST_LOG` takes precedence over the verbosity flag.
pub fn init_stderr_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose))),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
