//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{AuthError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Whether this error must collapse into a uniform 401 at the API
    /// boundary. Every verification failure is indistinguishable to the
    /// caller so the subtype cannot be used as an oracle.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            DomainError::Auth(_) => true,
            DomainError::Token(e) => !matches!(e, TokenError::SigningFailed),
            _ => false,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
