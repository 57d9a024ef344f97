//! Error types for the tile primer.
//!
//! Errors fall into two tiers:
//!
//! - [`ConfigError`] is fatal and raised before any network activity.
//! - [`FetchError`] is per tile and never aborts a level; the worker turns it
//!   into a failed acknowledgment.
//!
//! [`PrimeError`] covers the few ways a level itself can fail to complete.

use thiserror::Error;

/// Invalid run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No URL template was given.
    #[error("no cache URL specified, use `--url` to specify the cache URL")]
    MissingUrl,

    /// The template does not parse as an HTTP/HTTPS URL.
    #[error("invalid cache URL `{url}`: {reason}, must be a valid HTTP/HTTPS URL")]
    InvalidUrl { url: String, reason: String },

    /// Max zoom is negative or beyond what the tile math supports.
    #[error("max zoom level must be between 0 and {max}, got {zoom}")]
    InvalidZoom { zoom: i64, max: u8 },

    /// Concurrency below one.
    #[error("invalid concurrency level: {0}, must be at least 1")]
    InvalidConcurrency(i64),

    /// A `--header` value that is not a single `name:value` pair.
    #[error("invalid header format specified: `{value}`, must be in format `name:value`")]
    MalformedHeader { value: String },

    /// Header name or value rejected by the HTTP layer.
    #[error("invalid header `{value}`: {reason}")]
    InvalidHeader { value: String, reason: String },

    /// Timeout of zero seconds.
    #[error("request timeout must be at least 1 second")]
    InvalidTimeout,
}

/// A single tile request that did not produce a response.
///
/// Non-200 responses are not errors at this layer; they come back as a status
/// code and are classified by the worker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or protocol failure.
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The per-request timeout elapsed.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),
}

/// A level that could not be driven to completion.
#[derive(Debug, Error)]
pub enum PrimeError {
    /// The OS refused to start a worker thread.
    #[error("failed to spawn tile worker {index}: {source}")]
    WorkerSpawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    /// Every worker exited before the level was fully acknowledged.
    #[error("workers exited after {received} of {expected} acknowledgments at zoom level {zoom}")]
    WorkersExited {
        zoom: u8,
        received: u64,
        expected: u64,
    },

    /// HTTP client setup failed before the run started.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Result type for priming operations.
pub type PrimeResult<T> = Result<T, PrimeError>;
