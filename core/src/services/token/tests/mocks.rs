//! Shared fixtures for token service tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::{DomainError, TokenError};
use crate::repositories::RevocationStore;

use kg_shared::config::JwtConfig;

/// Configuration used across the token tests: 5-minute access tokens and
/// 15-minute refresh tokens.
pub fn test_config() -> JwtConfig {
    JwtConfig::new("unit-test-secret")
        .with_access_expiry_minutes(5)
        .with_refresh_expiry_minutes(15)
}

/// Store whose every operation fails, to exercise the fail-closed paths
pub struct FailingRevocationStore;

#[async_trait]
impl RevocationStore for FailingRevocationStore {
    async fn revoke(&self, _jti: &str, _expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        Err(DomainError::Internal {
            message: "store down".to_string(),
        })
    }

    async fn is_revoked(&self, _jti: &str) -> Result<bool, DomainError> {
        Err(DomainError::Internal {
            message: "store down".to_string(),
        })
    }

    async fn purge_expired(&self) -> Result<usize, DomainError> {
        Err(DomainError::Internal {
            message: "store down".to_string(),
        })
    }
}

/// Store that answers lookups but refuses writes, to exercise aborted
/// rotations
pub struct ReadOnlyRevocationStore;

#[async_trait]
impl RevocationStore for ReadOnlyRevocationStore {
    async fn revoke(&self, _jti: &str, _expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        Err(DomainError::Token(TokenError::RevocationStoreUnavailable))
    }

    async fn is_revoked(&self, _jti: &str) -> Result<bool, DomainError> {
        Ok(false)
    }

    async fn purge_expired(&self) -> Result<usize, DomainError> {
        Ok(0)
    }
}
