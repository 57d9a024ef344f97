//! Run configuration.
//!
//! [`PrimerConfig`] is the validated form of the values the command line
//! supplies. Validation happens once, up front, so that every configuration
//! problem is reported before the first request goes out.

use std::time::Duration;

use reqwest::header::HeaderMap;
use tracing::warn;
use url::Url;

use crate::error::ConfigError;
use crate::headers::parse_headers;
use crate::level::{TileRequest, MAX_ZOOM};
use crate::template::UrlTemplate;

/// Default deepest zoom level to prime.
pub const DEFAULT_MAX_ZOOM: u8 = 4;

/// Default number of concurrent requests.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Unvalidated values as they arrive from the command line.
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    pub url: String,
    pub zoom: i64,
    pub concurrency: i64,
    pub headers: Vec<String>,
    pub timeout_secs: Option<u64>,
}

/// Validated configuration for one priming run.
#[derive(Debug, Clone)]
pub struct PrimerConfig {
    template: UrlTemplate,
    max_zoom: u8,
    concurrency: usize,
    headers: HeaderMap,
    request_timeout: Option<Duration>,
}

impl PrimerConfig {
    /// Create a configuration with defaults for everything but the template.
    ///
    /// The template is validated the same way [`PrimerConfig::from_raw`]
    /// validates it.
    pub fn new(template: impl Into<String>) -> Result<Self, ConfigError> {
        let template = validate_template(template.into())?;
        Ok(Self {
            template,
            max_zoom: DEFAULT_MAX_ZOOM,
            concurrency: DEFAULT_CONCURRENCY,
            headers: HeaderMap::new(),
            request_timeout: None,
        })
    }

    /// Validate raw command-line values.
    ///
    /// Checks run in the order URL, zoom, concurrency, headers, timeout and
    /// the first failure is returned.
    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let template = validate_template(raw.url)?;

        let max_zoom = u8::try_from(raw.zoom)
            .ok()
            .filter(|zoom| *zoom <= MAX_ZOOM)
            .ok_or(ConfigError::InvalidZoom {
                zoom: raw.zoom,
                max: MAX_ZOOM,
            })?;

        let concurrency = usize::try_from(raw.concurrency)
            .ok()
            .filter(|cc| *cc >= 1)
            .ok_or(ConfigError::InvalidConcurrency(raw.concurrency))?;

        let headers = parse_headers(&raw.headers)?;

        let request_timeout = match raw.timeout_secs {
            Some(0) => return Err(ConfigError::InvalidTimeout),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Self {
            template,
            max_zoom,
            concurrency,
            headers,
            request_timeout,
        })
    }

    /// Set the deepest zoom level.
    pub fn with_max_zoom(mut self, max_zoom: u8) -> Result<Self, ConfigError> {
        if max_zoom > MAX_ZOOM {
            return Err(ConfigError::InvalidZoom {
                zoom: i64::from(max_zoom),
                max: MAX_ZOOM,
            });
        }
        self.max_zoom = max_zoom;
        Ok(self)
    }

    /// Set the worker count.
    pub fn with_concurrency(mut self, concurrency: usize) -> Result<Self, ConfigError> {
        if concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(0));
        }
        self.concurrency = concurrency;
        Ok(self)
    }

    /// Replace the static header set.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set a per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }

    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

/// Check that a template renders to an absolute HTTP/HTTPS URL.
///
/// The check runs on the URL for tile (0, 0, 0) since raw placeholders are
/// not legal in every URL position. Missing placeholders only warn: such a
/// template still primes, it just requests the same URL repeatedly.
fn validate_template(template: String) -> Result<UrlTemplate, ConfigError> {
    if template.trim().is_empty() {
        return Err(ConfigError::MissingUrl);
    }

    let template = UrlTemplate::new(template);
    let sample = template.render(&TileRequest::new(0, 0, 0));

    let parsed = Url::parse(&sample).map_err(|e| ConfigError::InvalidUrl {
        url: template.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: template.to_string(),
            reason: format!("unsupported scheme `{}`", parsed.scheme()),
        });
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl {
            url: template.to_string(),
            reason: "missing host".to_string(),
        });
    }

    let missing = template.missing_tokens();
    if !missing.is_empty() {
        warn!(
            template = %template,
            missing = ?missing,
            "URL template is missing placeholders"
        );
    }

    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(url: &str) -> RawConfig {
        RawConfig {
            url: url.to_string(),
            zoom: i64::from(DEFAULT_MAX_ZOOM),
            concurrency: DEFAULT_CONCURRENCY as i64,
            headers: Vec::new(),
            timeout_secs: None,
        }
    }

    #[test]
    fn test_from_raw_defaults() {
        let config = PrimerConfig::from_raw(raw("https://t.example.com/{z}/{x}/{y}.png")).unwrap();
        assert_eq!(config.max_zoom(), 4);
        assert_eq!(config.concurrency(), 4);
        assert!(config.headers().is_empty());
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.template().as_str(), "https://t.example.com/{z}/{x}/{y}.png");
    }

    #[test]
    fn test_empty_url_rejected() {
        assert_eq!(
            PrimerConfig::from_raw(raw("")).unwrap_err(),
            ConfigError::MissingUrl
        );
        assert_eq!(
            PrimerConfig::from_raw(raw("   ")).unwrap_err(),
            ConfigError::MissingUrl
        );
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        let err = PrimerConfig::from_raw(raw("tile.company.com/{x}/{y}/{z}.png")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let err = PrimerConfig::from_raw(raw("ftp://tiles.example.com/{z}/{x}/{y}")).unwrap_err();
        match err {
            ConfigError::InvalidUrl { reason, .. } => assert!(reason.contains("ftp")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_placeholder_in_host_accepted() {
        let config = PrimerConfig::from_raw(raw("http://{z}.tiles.example.com/{x}/{y}.png"));
        assert!(config.is_ok());
    }

    #[test]
    fn test_missing_placeholders_still_valid() {
        let config = PrimerConfig::from_raw(raw("http://tiles.example.com/world.png"));
        assert!(config.is_ok());
    }

    #[test]
    fn test_zoom_bounds() {
        let mut cfg = raw("http://h/{z}/{x}/{y}");
        cfg.zoom = -1;
        assert_eq!(
            PrimerConfig::from_raw(cfg.clone()).unwrap_err(),
            ConfigError::InvalidZoom {
                zoom: -1,
                max: MAX_ZOOM
            }
        );

        cfg.zoom = i64::from(MAX_ZOOM) + 1;
        assert!(matches!(
            PrimerConfig::from_raw(cfg.clone()),
            Err(ConfigError::InvalidZoom { .. })
        ));

        cfg.zoom = 0;
        assert_eq!(PrimerConfig::from_raw(cfg).unwrap().max_zoom(), 0);
    }

    #[test]
    fn test_concurrency_must_be_positive() {
        let mut cfg = raw("http://h/{z}/{x}/{y}");
        cfg.concurrency = 0;
        assert_eq!(
            PrimerConfig::from_raw(cfg.clone()).unwrap_err(),
            ConfigError::InvalidConcurrency(0)
        );
        cfg.concurrency = -3;
        assert_eq!(
            PrimerConfig::from_raw(cfg).unwrap_err(),
            ConfigError::InvalidConcurrency(-3)
        );
    }

    #[test]
    fn test_headers_parsed() {
        let mut cfg = raw("http://h/{z}/{x}/{y}");
        cfg.headers = vec!["X-Api-Key:secret".to_string()];
        let config = PrimerConfig::from_raw(cfg).unwrap();
        assert_eq!(config.headers().get("x-api-key").unwrap(), "secret");
    }

    #[test]
    fn test_malformed_header_rejected() {
        let mut cfg = raw("http://h/{z}/{x}/{y}");
        cfg.headers = vec!["X-Api-Key=secret".to_string()];
        assert!(matches!(
            PrimerConfig::from_raw(cfg),
            Err(ConfigError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn test_timeout() {
        let mut cfg = raw("http://h/{z}/{x}/{y}");
        cfg.timeout_secs = Some(0);
        assert_eq!(
            PrimerConfig::from_raw(cfg.clone()).unwrap_err(),
            ConfigError::InvalidTimeout
        );
        cfg.timeout_secs = Some(10);
        assert_eq!(
            PrimerConfig::from_raw(cfg).unwrap().request_timeout(),
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn test_url_checked_before_zoom() {
        let mut cfg = raw("");
        cfg.zoom = -5;
        assert_eq!(
            PrimerConfig::from_raw(cfg).unwrap_err(),
            ConfigError::MissingUrl
        );
    }

    #[test]
    fn test_builder_setters_validate() {
        let config = PrimerConfig::new("http://h/{z}/{x}/{y}").unwrap();
        assert!(config.clone().with_max_zoom(MAX_ZOOM + 1).is_err());
        assert!(config.clone().with_concurrency(0).is_err());

        let config = config
            .with_max_zoom(2)
            .unwrap()
            .with_concurrency(8)
            .unwrap()
            .with_request_timeout(Duration::from_secs(3));
        assert_eq!(config.max_zoom(), 2);
        assert_eq!(config.concurrency(), 8);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(3)));
    }
}
