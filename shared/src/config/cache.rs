//! Revocation store (Redis) configuration

use serde::{Deserialize, Serialize};

/// Redis revocation store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Lookup timeout in milliseconds; a lookup that exceeds this
    /// is treated as a store failure and the token is rejected
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,

    /// Key prefix for revocation entries
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            connection_timeout: 5,
            lookup_timeout_ms: default_lookup_timeout_ms(),
            key_prefix: default_key_prefix(),
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let lookup_timeout_ms = std::env::var("REVOCATION_LOOKUP_TIMEOUT_MS")
            .unwrap_or_else(|_| "250".to_string())
            .parse()
            .unwrap_or(default_lookup_timeout_ms());

        Self {
            url,
            lookup_timeout_ms,
            ..Default::default()
        }
    }
}

fn default_lookup_timeout_ms() -> u64 {
    250
}

fn default_key_prefix() -> String {
    String::from("keygate:revoked:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.lookup_timeout_ms, 250);
        assert_eq!(config.key_prefix, "keygate:revoked:");
    }
}
