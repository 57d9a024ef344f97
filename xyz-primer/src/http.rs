//! HTTP client abstraction for testability

use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::error::FetchError;

/// Trait for issuing tile requests.
///
/// This abstraction allows the worker pool to be exercised against mock
/// clients in tests. Only the status code matters to the primer; the response
/// body is never inspected.
pub trait TileFetcher: Send + Sync {
    /// Performs a blocking HTTP GET with the given headers.
    ///
    /// # Returns
    ///
    /// The response status code, or an error if no response was received.
    fn get(&self, url: &str, headers: &HeaderMap) -> Result<u16, FetchError>;
}

/// Real HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::blocking::Client,
    timeout: Option<Duration>,
}

impl ReqwestFetcher {
    /// Creates a client without a request timeout.
    ///
    /// A server that accepts the connection and never answers will hold the
    /// worker until the connection drops.
    pub fn new() -> Result<Self, FetchError> {
        Self::build(None)
    }

    /// Creates a client with a per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self, FetchError> {
        // reqwest's blocking client defaults to a 30s timeout; `None` disables it.
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Configured per-request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl TileFetcher for ReqwestFetcher {
    fn get(&self, url: &str, headers: &HeaderMap) -> Result<u16, FetchError> {
        let response = self
            .client
            .get(url)
            .headers(headers.clone())
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    FetchError::Transport {
                        url: url.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        Ok(response.status().as_u16())
    }
}
