//! Request and response data transfer objects.

pub mod auth;

pub use auth::{
    AuthResponse, LoginRequest, LogoutRequest, LogoutResponse, ProfileResponse,
    RefreshTokenRequest,
};
