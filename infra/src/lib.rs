//! # Infrastructure Layer
//!
//! Concrete implementations of the core repository interfaces against
//! external services. Currently this is the Redis-backed revocation store;
//! entries ride on Redis key TTLs so the store stays bounded without a
//! cleanup job.

pub mod cache;

pub use cache::RedisRevocationStore;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
