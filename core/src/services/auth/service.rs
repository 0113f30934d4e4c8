//! Main authentication service implementation

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::token::{Claims, TokenUse};
use crate::domain::entities::user::User;
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{RevocationStore, UserRepository};
use crate::services::token::{RefreshCoordinator, TokenIssuer, TokenVerifier};

/// Authentication service for managing the complete authentication flow
///
/// All collaborators are injected through the constructor; the service owns
/// no hidden global state, so independent instances can be built per test
/// and keys can rotate by constructing a new instance.
pub struct AuthService<U, S>
where
    U: UserRepository,
    S: RevocationStore,
{
    /// User repository for credential lookup
    user_repository: Arc<U>,
    /// Issues token pairs after credentials check out
    issuer: Arc<TokenIssuer>,
    /// Verifies presented tokens
    verifier: Arc<TokenVerifier<S>>,
    /// Runs the refresh cycle
    coordinator: Arc<RefreshCoordinator<S>>,
    /// Revocation store used at logout
    store: Arc<S>,
}

impl<U, S> AuthService<U, S>
where
    U: UserRepository,
    S: RevocationStore,
{
    /// Creates a new authentication service
    pub fn new(
        user_repository: Arc<U>,
        issuer: Arc<TokenIssuer>,
        verifier: Arc<TokenVerifier<S>>,
        coordinator: Arc<RefreshCoordinator<S>>,
        store: Arc<S>,
    ) -> Self {
        Self {
            user_repository,
            issuer,
            verifier,
            coordinator,
            store,
        }
    }

    /// Authenticates credentials and issues a token pair
    ///
    /// Unknown users and wrong passwords are indistinguishable to the
    /// caller; both fail with `AuthenticationFailed`.
    ///
    /// # Arguments
    ///
    /// * `username` - Login name
    /// * `password` - Raw password, checked against the stored bcrypt hash
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - Access and refresh tokens
    /// * `Err(DomainError)` - Credentials rejected or issuance failed
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AuthResponse> {
        let user = match self.user_repository.find_by_username(username).await? {
            Some(user) => user,
            None => {
                debug!(username, "login rejected: unknown user");
                return Err(DomainError::Auth(AuthError::AuthenticationFailed));
            }
        };

        if !user.verify_password(password) {
            debug!(username, "login rejected: bad credentials");
            return Err(DomainError::Auth(AuthError::AuthenticationFailed));
        }

        let pair = self.issuer.issue_tokens(&user.username, &user.roles)?;

        info!(username, "login succeeded");

        Ok(AuthResponse::from_token_pair(pair))
    }

    /// Exchanges a refresh token for a new token pair
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - A fresh access token, with the refresh token
    ///   rotated or reused per policy
    /// * `Err(DomainError)` - Refresh token invalid, expired, or revoked
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<AuthResponse> {
        let pair = self.coordinator.refresh(refresh_token).await?;
        Ok(AuthResponse::from_token_pair(pair))
    }

    /// Logs out by revoking the presented tokens
    ///
    /// The access token's `jti` is revoked for its remaining lifetime. If a
    /// refresh token accompanies the request it is revoked too; one that no
    /// longer decodes is ignored since it cannot be replayed anyway.
    ///
    /// # Arguments
    ///
    /// * `claims` - Claims of the verified access token presented by the caller
    /// * `refresh_token` - Optional refresh token to retire with the session
    pub async fn logout(&self, claims: &Claims, refresh_token: Option<&str>) -> DomainResult<()> {
        self.store.revoke(&claims.jti, claims.expires_at()).await?;

        if let Some(token) = refresh_token {
            match self.verifier.decode(token) {
                Ok(refresh_claims) if refresh_claims.token_use == TokenUse::Refresh => {
                    self.store
                        .revoke(&refresh_claims.jti, refresh_claims.expires_at())
                        .await?;
                }
                _ => {
                    debug!(subject = %claims.sub, "unusable refresh token ignored at logout");
                }
            }
        }

        info!(subject = %claims.sub, "logged out");

        Ok(())
    }

    /// Loads the account behind a verified token subject
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The account
    /// * `Err(DomainError)` - The account no longer exists
    pub async fn user_profile(&self, subject: &str) -> DomainResult<User> {
        self.user_repository
            .find_by_username(subject)
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))
    }
}
