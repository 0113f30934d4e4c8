//! In-memory revocation store for tests and single-node deployments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::DomainError;

use super::r#trait::RevocationStore;

/// Revocation store backed by a `HashMap` guarded by an async `RwLock`
///
/// Lookups of entries whose expiration instant has passed report the token
/// as not revoked; the token is unusable by then anyway and `purge_expired`
/// reclaims the memory.
#[derive(Clone)]
pub struct InMemoryRevocationStore {
    entries: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl InMemoryRevocationStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of entries currently held, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for InMemoryRevocationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        entries.insert(jti.to_string(), expires_at);
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(jti)
            .map(|expires_at| *expires_at > Utc::now())
            .unwrap_or(false))
    }

    async fn purge_expired(&self) -> Result<usize, DomainError> {
        let mut entries = self.entries.write().await;
        let initial_count = entries.len();

        let now = Utc::now();
        entries.retain(|_, expires_at| *expires_at > now);

        Ok(initial_count - entries.len())
    }
}
