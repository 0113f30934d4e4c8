//! The refresh cycle: exchange a refresh token for a new access token.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::token::{TokenPair, TokenUse};
use crate::errors::DomainError;
use crate::repositories::RevocationStore;

use kg_shared::config::RotationPolicy;

use super::issuer::TokenIssuer;
use super::verifier::TokenVerifier;

/// Coordinates the refresh cycle
///
/// A client whose access token has expired presents its refresh token; the
/// coordinator re-runs full verification on it and mints a new access token
/// for the same subject. What happens to the refresh token is a policy
/// choice: `Rotate` (the default) issues a new one and revokes the old,
/// `Reuse` hands the presented one back. Once the refresh token itself has
/// expired or been revoked, the cycle ends and the client must
/// re-authenticate.
pub struct RefreshCoordinator<S: RevocationStore> {
    issuer: Arc<TokenIssuer>,
    verifier: Arc<TokenVerifier<S>>,
    store: Arc<S>,
    policy: RotationPolicy,
}

impl<S: RevocationStore> RefreshCoordinator<S> {
    /// Creates a new coordinator
    ///
    /// The rotation policy is taken from the issuer's configuration.
    pub fn new(issuer: Arc<TokenIssuer>, verifier: Arc<TokenVerifier<S>>, store: Arc<S>) -> Self {
        let policy = issuer.config().rotation_policy;
        Self {
            issuer,
            verifier,
            store,
            policy,
        }
    }

    /// The rotation policy in effect
    pub fn policy(&self) -> RotationPolicy {
        self.policy
    }

    /// Exchanges a valid refresh token for a fresh token pair
    ///
    /// # Arguments
    ///
    /// * `refresh_token` - The refresh token issued at login or by a
    ///   previous rotation
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - A new access token, plus either a rotated or the
    ///   original refresh token depending on policy
    /// * `Err(DomainError)` - The refresh token failed verification, or
    ///   rotation could not revoke the old token
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, DomainError> {
        let claims = self.verifier.verify(refresh_token, TokenUse::Refresh).await?;

        let (access_token, _) = self.issuer.issue_access_token(&claims.sub, &claims.roles)?;

        match self.policy {
            RotationPolicy::Rotate => {
                let (new_refresh, _) =
                    self.issuer.issue_refresh_token(&claims.sub, &claims.roles)?;

                // The old token stays revoked for its remaining lifetime.
                // If the store cannot record that, the rotation must not
                // go through with two live refresh tokens.
                if let Err(e) = self.store.revoke(&claims.jti, claims.expires_at()).await {
                    warn!(subject = %claims.sub, error = %e, "refresh rotation aborted");
                    return Err(e);
                }

                debug!(subject = %claims.sub, "refresh token rotated");

                Ok(TokenPair::new(
                    access_token,
                    new_refresh,
                    self.issuer.config(),
                ))
            }
            RotationPolicy::Reuse => {
                debug!(subject = %claims.sub, "refresh token reused");

                Ok(TokenPair::new(
                    access_token,
                    refresh_token.to_string(),
                    self.issuer.config(),
                ))
            }
        }
    }
}
