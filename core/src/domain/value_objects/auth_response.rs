//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};

use crate::domain::entities::token::TokenPair;

/// Authentication response containing the issued tokens
///
/// Returned after a successful login or refresh cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// JWT refresh token for obtaining new access tokens
    pub refresh_token: String,

    /// Access token expiration time in seconds
    pub expires_in: i64,

    /// Token scheme expected in the Authorization header
    pub token_type: String,
}

impl AuthResponse {
    /// Creates an authentication response from a token pair
    pub fn from_token_pair(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.access_expires_in,
            token_type: String::from("Bearer"),
        }
    }
}
