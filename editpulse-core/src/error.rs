//! Error types for editpulse-core

use thiserror::Error;

/// Main error type for the editpulse-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed row in the edit log
    #[error("parse error on line {line}: {message}")]
    Parse { line: u64, message: String },

    /// CSV reading/writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error (invalid threshold, bad config file, ...)
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for editpulse-core
pub type Result<T> = std::result::Result<T, Error>;
