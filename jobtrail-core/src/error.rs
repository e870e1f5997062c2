//! Error types for jobtrail-core

use thiserror::Error;

/// Main error type for the jobtrail-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Input rejected before any write happened
    #[error("validation error: {0}")]
    Validation(String),

    /// Lookup on an identifier that does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Sign-in callback error
    #[error("authentication error: {0}")]
    Auth(String),
}

impl Error {
    /// Shorthand for a not-found error on a given entity type.
    pub fn not_found(entity: &'static str, id: &str) -> Self {
        Error::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Result type alias for jobtrail-core
pub type Result<T> = std::result::Result<T, Error>;
