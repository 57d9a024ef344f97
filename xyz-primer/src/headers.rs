//! Static request headers given as `name:value` pairs.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::ConfigError;

/// Parse one `name:value` pair.
///
/// The value must split on `:` into exactly two parts, so values containing
/// a colon of their own are rejected. Whitespace around the name and value is
/// trimmed.
pub fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), ConfigError> {
    let parts: Vec<&str> = raw.split(':').collect();
    let [name, value] = parts.as_slice() else {
        return Err(ConfigError::MalformedHeader {
            value: raw.to_string(),
        });
    };

    let name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|e| {
        ConfigError::InvalidHeader {
            value: raw.to_string(),
            reason: e.to_string(),
        }
    })?;
    let value = HeaderValue::from_str(value.trim()).map_err(|e| ConfigError::InvalidHeader {
        value: raw.to_string(),
        reason: e.to_string(),
    })?;

    Ok((name, value))
}

/// Build a header set from repeated `--header` values.
///
/// Repeating a name appends another value rather than replacing it.
pub fn parse_headers<I, S>(raw: I) -> Result<HeaderMap, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut headers = HeaderMap::new();
    for entry in raw {
        let (name, value) = parse_header(entry.as_ref())?;
        headers.append(name, value);
    }
    Ok(headers)
}
