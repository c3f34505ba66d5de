//! Error types for the social network backend.

use thiserror::Error;

/// Coarse error classification that callers branch on.
///
/// The human-readable message carried by [`SocialError`] is supplementary;
/// the kind is the stable contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The entity does not exist, or the caller may not know that it exists.
    NotFound,
    /// The caller is related to the resource but the action breaks a business rule.
    BadRequest,
    /// The input itself is malformed.
    Validation,
    /// Persistence, I/O or configuration failure.
    Internal,
}

/// Common error type for the crate.
#[derive(Error, Debug)]
pub enum SocialError {
    /// Resource not found (or hidden from the caller).
    #[error("{0} not found")]
    NotFound(String),

    /// Business-rule violation.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SocialError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SocialError::NotFound(_) => ErrorKind::NotFound,
            SocialError::BadRequest(_) => ErrorKind::BadRequest,
            SocialError::Validation(_) => ErrorKind::Validation,
            SocialError::Database(_) | SocialError::Io(_) | SocialError::Config(_) => {
                ErrorKind::Internal
            }
        }
    }
}

impl From<sqlx::Error> for SocialError {
    fn from(e: sqlx::Error) -> Self {
        SocialError::Database(e.to_string())
    }
}

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, SocialError>;
