//! Application error types

use thiserror::Error;
use wexcfg_domain::{DomainError, SerializationError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The canonical document could not be rendered.
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// The document has validation violations.
    #[error("configuration is invalid: {} error(s)", .0.len())]
    Invalid(Vec<String>),

    /// Reading or writing a document failed.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
