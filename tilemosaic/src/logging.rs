//! Logging setup for binaries embedding the library.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the application.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The default filter directive could not be parsed.
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    /// A global subscriber was already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Build the filter: `RUST_LOG` when set, else `directive`.
pub fn build_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(directive).map_err(|e| LoggingError::InvalidFilter {
        directive: directive.to_string(),
        reason: e.to_string(),
    })
}

/// Install a stderr `fmt` subscriber filtered by `directive`.
///
/// `RUST_LOG` overrides `directive` when set.
pub fn init_logging(directive: &str) -> Result<(), LoggingError> {
    let filter = build_filter(directive)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}
