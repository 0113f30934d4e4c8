//! Route handlers.

pub mod auth;
pub mod profile;

pub use auth::AppState;
