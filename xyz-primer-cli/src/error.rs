//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and exit codes.

use std::fmt;

use xyz_primer::{ConfigError, PrimeError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid flags
    Config(ConfigError),
    /// Priming could not run to completion
    Prime(PrimeError),
}

impl CliError {
    /// Exit code for this error. Every failure exits with 1.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Print the error to stderr and return the exit code to use.
    pub fn report(&self) -> i32 {
        eprintln!("Error: {}", self);

        if let CliError::Config(_) = self {
            eprintln!("Use `--help` to learn more.");
        }

        self.exit_code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Prime(e) => write!(f, "Priming failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Prime(e) => Some(e),
            CliError::LoggingInit(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<PrimeError> for CliError {
    fn from(e: PrimeError) -> Self {
        CliError::Prime(e)
    }
}
