//! Error types for the story store

use thiserror::Error;

/// Result type alias for story store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Main error type for the story store
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote backend request/response errors
    #[error("Remote backend error: {0}")]
    Remote(String),

    /// IO errors from the local snapshot slot
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// No record with the given id
    #[error("Story not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new remote backend error
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }

    /// Create a new not-found error for the given story id
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        Self::Remote(error.to_string())
    }
}
