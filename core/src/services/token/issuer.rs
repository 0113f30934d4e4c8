//! Access and refresh token issuance.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tracing::debug;

use crate::domain::entities::token::{Claims, TokenPair};
use crate::errors::{DomainError, TokenError};

use kg_shared::config::JwtConfig;

/// Creates signed access and refresh tokens with embedded expiry claims
///
/// Issuance is a pure computation over the signing key; the issuer holds no
/// mutable state and may be shared freely across requests. The subject must
/// already be authenticated before tokens are issued for it.
pub struct TokenIssuer {
    config: JwtConfig,
    encoding_key: EncodingKey,
    header: Header,
}

impl TokenIssuer {
    /// Creates a new issuer from configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            header: Header::new(Algorithm::HS256),
        }
    }

    /// The configuration the issuer was built with
    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Issues an access/refresh token pair for an authenticated subject
    ///
    /// # Arguments
    ///
    /// * `subject` - The authenticated user identifier
    /// * `roles` - Role names embedded in both tokens
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Two signed tokens with distinct expiry windows
    /// * `Err(DomainError)` - Signing failed
    pub fn issue_tokens(&self, subject: &str, roles: &[String]) -> Result<TokenPair, DomainError> {
        let (access_token, _) = self.issue_access_token(subject, roles)?;
        let (refresh_token, _) = self.issue_refresh_token(subject, roles)?;

        debug!(subject, "issued token pair");

        Ok(TokenPair::new(access_token, refresh_token, &self.config))
    }

    /// Issues a single access token
    pub fn issue_access_token(
        &self,
        subject: &str,
        roles: &[String],
    ) -> Result<(String, Claims), DomainError> {
        let claims = Claims::new_access_token(subject, roles.to_vec(), &self.config);
        let token = self.encode_jwt(&claims)?;
        Ok((token, claims))
    }

    /// Issues a single refresh token
    pub fn issue_refresh_token(
        &self,
        subject: &str,
        roles: &[String],
    ) -> Result<(String, Claims), DomainError> {
        let claims = Claims::new_refresh_token(subject, roles.to_vec(), &self.config);
        let token = self.encode_jwt(&claims)?;
        Ok((token, claims))
    }

    /// Encodes claims into a signed JWT
    fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        encode(&self.header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::SigningFailed))
    }
}
