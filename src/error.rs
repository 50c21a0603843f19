//! Error types for Tracklet
//!
//! Defines the error enum covering all failure modes across the service.
//! Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Result type alias for Tracklet operations
pub type Result<T> = std::result::Result<T, TrackletError>;

/// Error type for Tracklet operations
#[derive(Error, Debug)]
pub enum TrackletError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// SQLite database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors (config file)
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Server bind failures
    #[error("Bind error: {0}")]
    Bind(String),

    /// Other errors
    #[error("{0}")]
    Other(String),

    /// Anyhow errors (for more context)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}
