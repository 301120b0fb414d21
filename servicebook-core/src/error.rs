//! Error types for servicebook.

use thiserror::Error;

/// Errors that can occur in servicebook operations.
#[derive(Error, Debug)]
pub enum ServiceBookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Locked. Unlock with the shared PIN first")]
    Locked,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ServiceBookError {
    pub(crate) fn not_found(kind: &'static str, id: &str) -> Self {
        ServiceBookError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Result type alias for servicebook operations.
pub type ServiceBookResult<T> = Result<T, ServiceBookError>;
