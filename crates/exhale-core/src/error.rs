//! Core error types for exhale-core.
//!
//! All failures in the library are expressed through this thiserror
//! hierarchy. Nothing here is fatal to a check-in flow: validation
//! errors block a single transition, API errors stay in the outbox.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for exhale-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Answer validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Backend API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local database errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors raised while validating a check-in answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The answer was empty
    #[error("No answer given for {field}")]
    EmptyAnswer { field: String },

    /// The answer could not be parsed as a number
    #[error("'{input}' is not a valid number for {field}")]
    NotANumber { field: String, input: String },

    /// The flow is not waiting for this kind of answer
    #[error("Not expecting an answer for {field} at this step")]
    OutOfTurn { field: String },
}

/// Backend API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Server answered with a non-success status
    #[error("Server returned HTTP {status}")]
    Status { status: u16 },

    /// Request never completed (DNS, connect, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// Login rejected
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No session identifier stored locally
    #[error("Not logged in")]
    NotLoggedIn,
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Local database errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::QueryFailed(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
