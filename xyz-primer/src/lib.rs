//! XYZ Primer - warm map tile caches ahead of real traffic
//!
//! This library requests every tile of an XYZ tiling scheme, level by level
//! from zoom 0 up to a configured maximum, so a caching proxy or CDN in front
//! of a tile server holds all of them before users arrive. Only the HTTP
//! status is checked; tile bytes are never inspected.
//!
//! # Example
//!
//! ```no_run
//! use xyz_primer::config::PrimerConfig;
//! use xyz_primer::coordinator::Primer;
//!
//! let config = PrimerConfig::new("https://tiles.example.com/{z}/{x}/{y}.png")?
//!     .with_max_zoom(6)?
//!     .with_concurrency(8)?;
//! let run = Primer::new(&config)?.run()?;
//! println!("{}", run);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod headers;
pub mod http;
pub mod level;
pub mod logging;
pub mod progress;
pub mod stats;
pub mod template;
pub mod worker;

pub use config::PrimerConfig;
pub use coordinator::{LevelCoordinator, Primer};
pub use error::{ConfigError, FetchError, PrimeError};
pub use stats::{LevelStats, RunStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
