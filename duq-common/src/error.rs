//! Common error types for the quiz library

use thiserror::Error;

/// Common result type for quiz library operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the quiz library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted record could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Site configuration file is not valid TOML
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid caller input (unknown unit name, bad storage key, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage medium refused a read or write
    #[error("Storage error: {0}")]
    Storage(String),
}
