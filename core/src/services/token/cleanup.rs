//! Periodic maintenance of the revocation store.
//!
//! Revocation entries carry the expiry of the token they refer to; once
//! that instant has passed the entry is dead weight. Stores with native TTL
//! support expire entries on their own, the in-memory store relies on this
//! service.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::RevocationStore;

/// Configuration for the cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Run every hour
            enabled: true,
        }
    }
}

/// Service purging expired revocation entries
pub struct TokenCleanupService<S: RevocationStore + 'static> {
    store: Arc<S>,
    config: TokenCleanupConfig,
}

impl<S: RevocationStore> TokenCleanupService<S> {
    /// Create a new cleanup service
    pub fn new(store: Arc<S>, config: TokenCleanupConfig) -> Self {
        Self { store, config }
    }

    /// Run a single cleanup cycle
    ///
    /// # Returns
    /// * `Ok(CleanupResult)` - Summary of the cycle
    /// * `Err(DomainError)` - If cleanup fails entirely
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let mut result = CleanupResult::default();

        match self.store.purge_expired().await {
            Ok(count) => {
                result.revocations_purged = count;
                info!("Purged {} expired revocation entries", count);
            }
            Err(e) => {
                error!("Failed to purge revocation entries: {}", e);
                result.errors.push(format!("Revocation purge error: {}", e));
            }
        }

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// This spawns a tokio task that runs cleanup at regular intervals.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                "Token cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.is_success() {
                            warn!("Cleanup completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Token cleanup cycle failed: {}", e);
                    }
                }
            }
        });
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired revocation entries removed
    pub revocations_purged: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
