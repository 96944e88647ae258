//! CLI error type.

use std::path::PathBuf;

use thiserror::Error;
use tilemosaic::config::ConfigError;
use tilemosaic::pyramid::MetadataError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file held invalid JSON.
    #[error("Invalid JSON in {path}: {source}")]
    InvalidInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Pyramid metadata was unusable.
    #[error("Pyramid metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Writing the JSON result failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),

    /// Arguments were individually valid but inconsistent.
    #[error("Invalid arguments: {0}")]
    Arguments(String),
}
