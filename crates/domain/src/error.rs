//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while interpreting a document.
///
/// Validation violations are not errors: they are reported as plain
/// messages by [`crate::validation::validate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A proxy URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A proxy URL has no host component.
    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Failure while rendering a canonical document to text.
///
/// Carries a diagnostic message only; rendering is deterministic, so the
/// same input always reproduces the same failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Failed to generate YAML: {message}")]
pub struct SerializationError {
    /// Diagnostic message.
    pub message: String,
}

impl SerializationError {
    /// Creates a serialization error from any displayable cause.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_error_display() {
        let error = SerializationError::new("unsupported tagged value");
        assert_eq!(
            error.to_string(),
            "Failed to generate YAML: unsupported tagged value"
        );
    }

    #[test]
    fn test_invalid_url_display() {
        let error = DomainError::InvalidUrl("http//broken".to_string());
        assert_eq!(error.to_string(), "invalid URL: http//broken");
    }
}
