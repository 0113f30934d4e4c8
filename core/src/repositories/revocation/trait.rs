//! Revocation store trait defining the interface for token invalidation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::DomainError;

/// Store tracking tokens invalidated before their natural expiry
///
/// Entries are keyed by the token's `jti` claim and carry the token's
/// expiration instant so an implementation can expire them automatically;
/// once the token itself has expired the entry serves no purpose and may be
/// dropped, keeping the store bounded.
///
/// Callers must fail closed: if a lookup errors or times out, the token is
/// rejected rather than accepted.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Revoke a token until its expiration instant
    ///
    /// # Arguments
    /// * `jti` - The token's unique identifier claim
    /// * `expires_at` - The token's expiration instant; the entry may be
    ///   dropped after this time
    ///
    /// # Returns
    /// * `Ok(())` - Token recorded as revoked
    /// * `Err(DomainError)` - Store write failed
    async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Check whether a token has been revoked
    ///
    /// # Arguments
    /// * `jti` - The token's unique identifier claim
    ///
    /// # Returns
    /// * `Ok(true)` - Token is revoked
    /// * `Ok(false)` - No live revocation entry for the token
    /// * `Err(DomainError)` - Lookup failed or timed out
    async fn is_revoked(&self, jti: &str) -> Result<bool, DomainError>;

    /// Remove entries whose tokens have expired
    ///
    /// Implementations with native TTL support may return 0.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of entries removed
    /// * `Err(DomainError)` - Purge failed
    async fn purge_expired(&self) -> Result<usize, DomainError>;
}
