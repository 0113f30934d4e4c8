//! Redis caching layer.

pub mod redis_revocation;

pub use redis_revocation::RedisRevocationStore;
