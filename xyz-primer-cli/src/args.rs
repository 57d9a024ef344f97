//! Command-line arguments.

use clap::Parser;
use xyz_primer::config::{RawConfig, DEFAULT_CONCURRENCY, DEFAULT_MAX_ZOOM};

const AFTER_HELP: &str = "\
Usage:
  xyz --url https://tile.company.com/{z}/{x}/{y}.png --zoom 8";

#[derive(Debug, Parser)]
#[command(name = "xyz")]
#[command(version, about = "Prime an XYZ tile cache by requesting every tile up to a zoom level")]
#[command(after_help = AFTER_HELP)]
pub struct Args {
    /// Templated cache URL to prime. Ex: https://tile.company.com/{z}/{x}/{y}.png
    #[arg(long)]
    pub url: Option<String>,

    /// Max zoom depth to prime to. Usually in the range of 0-18 but can go deeper
    #[arg(long, default_value_t = i64::from(DEFAULT_MAX_ZOOM), allow_negative_numbers = true)]
    pub zoom: i64,

    /// Maximum request concurrency. Take care not to exceed the rate limits of your tile provider!
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY as i64, allow_negative_numbers = true)]
    pub cc: i64,

    /// Add a header to all requests. Repeatable. Usage '--header name:value'
    #[arg(long = "header", value_name = "NAME:VALUE")]
    pub headers: Vec<String>,

    /// Per-request timeout in seconds. Requests wait indefinitely when unset
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Hand the parsed values over for validation.
    pub fn into_raw(self) -> RawConfig {
        RawConfig {
            url: self.url.unwrap_or_default(),
            zoom: self.zoom,
            concurrency: self.cc,
            headers: self.headers,
            timeout_secs: self.timeout,
        }
    }
}
