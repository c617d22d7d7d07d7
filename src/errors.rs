/// Error types
///
/// Errors that travel back to the UI inside messages must be `Clone`,
/// so they carry the rendered reason instead of the source error.

use std::path::PathBuf;
use thiserror::Error;

/// Remote catalog or remote image fetch failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Network or TLS failure before a response arrived
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// Server answered with a non-success status
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    /// Response body is not a valid catalog
    #[error("malformed catalog payload: {0}")]
    Malformed(String),

    /// Response body exceeds the download limit
    #[error("{url} is larger than the {limit} byte image limit")]
    TooLarge { url: String, limit: u64 },

    /// Response body is not a decodable image
    #[error("could not decode image from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// The background task panicked or was cancelled
    #[error("background fetch task failed: {0}")]
    Task(String),
}

/// Custom eyewear upload failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UploadError {
    #[error("could not read {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("{path} is not a supported image: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("background upload task failed: {0}")]
    Task(String),
}

/// Configuration file failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}
