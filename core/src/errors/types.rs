//! Error type definitions for authentication and token operations.
//!
//! The variants are deliberately fine-grained for logging and tests; the
//! presentation layer collapses them into a uniform unauthorized response.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("User not found")]
    UserNotFound,
}

/// Token-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Token not yet valid")]
    NotYetValid,

    #[error("Malformed token")]
    Malformed,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Unsupported signing algorithm")]
    UnsupportedAlgorithm,

    #[error("Token presented for the wrong use")]
    WrongTokenUse,

    #[error("Token revoked")]
    Revoked,

    #[error("Token signing failed")]
    SigningFailed,

    #[error("Revocation store unavailable")]
    RevocationStoreUnavailable,
}
