//! Common error types shared across crates.

use thiserror::Error;

use crate::expense::ValidationError;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::Parse`] → 400
/// - [`ServiceError::Validation`] → 400
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::Internal`] → 500
///
/// The `Display` output is the exact message placed in the error body.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request body could not be parsed into an expense.
    #[error("{0}")]
    Parse(String),

    /// The parsed expense broke a field rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No expense exists for the requested id.
    #[error("{0}")]
    NotFound(String),

    /// The storage layer failed; carries the driver's message unchanged.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::Parse(_) => 400,
            ServiceError::Validation(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Internal(_) => 500,
        }
    }
}
