//! Error types for wp-info-scan

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading input, fetching pages or writing output
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid URL provided
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to create HTTP client
    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),

    /// HTTP request failed before any response arrived
    #[error("HTTP request failed: {0}")]
    HttpRequest(String),

    /// HTTP response error status
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),

    /// Host list or snapshot file does not exist
    #[error("the file {} does not exist", .0.display())]
    ConfigNotFound(PathBuf),

    /// Host list or snapshot file could not be read
    #[error("failed to read {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Host list or snapshot file is malformed or misses a required field
    #[error("invalid configuration in {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot could not be written
    #[error("failed to write snapshot {}", path.display())]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid output format specified
    #[error("invalid output format: '{0}' (valid: human, json, none)")]
    InvalidOutputFormat(String),

    /// Invalid error policy specified
    #[error("invalid error policy: '{0}' (valid: stop, force)")]
    InvalidErrorPolicy(String),

    /// Output operation failed
    #[error("output failed: {0}")]
    OutputFailed(#[source] std::io::Error),

    /// JSON serialization failed
    #[error("JSON serialization failed")]
    SerializationFailed(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error belongs to the fatal configuration class
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound(_) | Self::ConfigRead { .. } | Self::ConfigParse { .. }
        )
    }
}
