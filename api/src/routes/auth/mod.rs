//! Authentication route handlers
//!
//! This module contains all authentication-related endpoints:
//! - Login (credential check and token issuance)
//! - Token refresh
//! - Logout

pub mod login;
pub mod logout;
pub mod refresh;

use std::sync::Arc;

use kg_core::repositories::{RevocationStore, UserRepository};
use kg_core::services::auth::AuthService;

/// Application state that holds shared services
pub struct AppState<U, S>
where
    U: UserRepository,
    S: RevocationStore,
{
    pub auth_service: Arc<AuthService<U, S>>,
}
