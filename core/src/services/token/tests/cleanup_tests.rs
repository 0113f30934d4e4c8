//! Unit tests for the revocation cleanup service

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::repositories::{InMemoryRevocationStore, RevocationStore};
use crate::services::token::{TokenCleanupConfig, TokenCleanupService};

#[tokio::test]
async fn test_cleanup_purges_expired_entries() {
    let store = Arc::new(InMemoryRevocationStore::new());
    store
        .revoke("live", Utc::now() + Duration::minutes(5))
        .await
        .unwrap();
    store
        .revoke("dead", Utc::now() - Duration::seconds(1))
        .await
        .unwrap();

    let service = TokenCleanupService::new(store.clone(), TokenCleanupConfig::default());
    let result = service.run_cleanup().await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.revocations_purged, 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_cleanup_disabled_is_a_no_op() {
    let store = Arc::new(InMemoryRevocationStore::new());
    store
        .revoke("dead", Utc::now() - Duration::seconds(1))
        .await
        .unwrap();

    let config = TokenCleanupConfig {
        enabled: false,
        ..TokenCleanupConfig::default()
    };
    let service = TokenCleanupService::new(store.clone(), config);
    let result = service.run_cleanup().await.unwrap();

    assert_eq!(result.revocations_purged, 0);
    assert_eq!(store.len().await, 1);
}
