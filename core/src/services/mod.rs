//! Business services containing domain logic and use cases.

pub mod auth;
pub mod token;

// Re-export commonly used types
pub use auth::AuthService;
pub use token::{
    CleanupResult, RefreshCoordinator, TokenCleanupConfig, TokenCleanupService, TokenIssuer,
    TokenVerifier,
};
