//! Tile URL templates.
//!
//! Templates carry `{x}`, `{y}` and `{z}` placeholders, e.g.
//! `https://tile.example.com/{z}/{x}/{y}.png`. Only the first occurrence of
//! each placeholder is substituted; a repeated placeholder is left in the URL
//! as-is. Nothing is escaped or encoded.

use std::fmt;

use crate::level::TileRequest;

/// Column placeholder.
pub const X_TOKEN: &str = "{x}";
/// Row placeholder.
pub const Y_TOKEN: &str = "{y}";
/// Zoom placeholder.
pub const Z_TOKEN: &str = "{z}";

/// Substitute the first `{x}`, `{y}` and `{z}` in `template`, in that order.
///
/// # Example
///
/// ```
/// use xyz_primer::template::build_url;
///
/// let url = build_url("https://t.example.com/{z}/{x}/{y}.png", 3, 5, 2);
/// assert_eq!(url, "https://t.example.com/2/3/5.png");
/// ```
pub fn build_url(template: &str, x: u32, y: u32, z: u8) -> String {
    template
        .replacen(X_TOKEN, &x.to_string(), 1)
        .replacen(Y_TOKEN, &y.to_string(), 1)
        .replacen(Z_TOKEN, &z.to_string(), 1)
}

/// A tile URL template shared by every worker of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    /// Wrap a template string. No validation happens here.
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// The raw template.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Concrete URL for one tile.
    pub fn render(&self, tile: &TileRequest) -> String {
        build_url(&self.0, tile.x(), tile.y(), tile.zoom())
    }

    /// Placeholders that never appear in the template.
    pub fn missing_tokens(&self) -> Vec<&'static str> {
        [X_TOKEN, Y_TOKEN, Z_TOKEN]
            .into_iter()
            .filter(|token| !self.0.contains(token))
            .collect()
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
