//! Logging infrastructure.
//!
//! Diagnostics go to stderr through a non-blocking writer so they never mix
//! with the progress and summary text on stdout. The filter comes from
//! `RUST_LOG` when set.

use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard flushes any buffered log lines.
pub struct LoggingGuard {
    _stderr_guard: WorkerGuard,
}

/// Default filter when `RUST_LOG` is unset.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "xyz_primer=debug,info"
    } else {
        "warn"
    }
}

/// Initialize the global tracing subscriber.
///
/// # Arguments
///
/// * `verbose` - Use a debug-level default filter instead of `warn`
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(verbose: bool) -> Result<LoggingGuard, io::Error> {
    let (non_blocking, guard) = tracing_appender::non_blocking(io::stderr());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_target(false)
        .with_thread_names(true);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    Ok(LoggingGuard {
        _stderr_guard: guard,
    })
}
