//! Token verification: signature, expiry, use, and revocation checks.

use std::sync::Arc;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::{debug, warn};

use crate::domain::entities::token::{Claims, TokenUse};
use crate::errors::{DomainError, TokenError};
use crate::repositories::RevocationStore;

use kg_shared::config::JwtConfig;

/// Validates tokens and extracts their claims
///
/// The validation pins the signing algorithm, so a header declaring any
/// other algorithm (including an unsigned one) is rejected outright.
/// Signature comparison happens inside the JWT library's HMAC verification,
/// which is constant-time.
pub struct TokenVerifier<S: RevocationStore> {
    store: Arc<S>,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl<S: RevocationStore> TokenVerifier<S> {
    /// Creates a new verifier from configuration and a revocation store
    pub fn new(config: &JwtConfig, store: Arc<S>) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            store,
            decoding_key,
            validation,
        }
    }

    /// Verifies a token and returns its claims
    ///
    /// Checks, in order: signature and registered claims, the expiry
    /// boundary (a token is expired at exactly its expiration instant), the
    /// declared use, and finally the revocation store. A store failure or
    /// timeout rejects the token.
    ///
    /// # Arguments
    ///
    /// * `token` - The JWT to verify
    /// * `expected_use` - Which use the caller will put the token to
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(DomainError)` - Token is invalid, expired, revoked, or the
    ///   revocation store could not answer
    pub async fn verify(&self, token: &str, expected_use: TokenUse) -> Result<Claims, DomainError> {
        let claims = self.decode(token)?;

        if claims.token_use != expected_use {
            warn!(
                subject = %claims.sub,
                presented = %claims.token_use,
                expected = %expected_use,
                "token presented for the wrong use"
            );
            return Err(DomainError::Token(TokenError::WrongTokenUse));
        }

        match self.store.is_revoked(&claims.jti).await {
            Ok(false) => {
                debug!(subject = %claims.sub, token_use = %claims.token_use, "token verified");
                Ok(claims)
            }
            Ok(true) => Err(DomainError::Token(TokenError::Revoked)),
            Err(e) => {
                // Fail closed: an unanswerable store rejects the token
                warn!(error = %e, "revocation lookup failed, rejecting token");
                Err(DomainError::Token(TokenError::RevocationStoreUnavailable))
            }
        }
    }

    /// Decodes a token without consulting the revocation store
    ///
    /// Signature, issuer, audience, `nbf`, and the expiry boundary are
    /// still enforced.
    pub fn decode(&self, token: &str) -> Result<Claims, DomainError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| DomainError::Token(map_decode_error(&e)))?;

        // The JWT library accepts a token at exactly its expiration
        // instant; the contract here is `now >= exp` means expired.
        if token_data.claims.is_expired() {
            return Err(DomainError::Token(TokenError::Expired));
        }

        Ok(token_data.claims)
    }
}

fn map_decode_error(e: &jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::ImmatureSignature => TokenError::NotYetValid,
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            TokenError::UnsupportedAlgorithm
        }
        _ => TokenError::Malformed,
    }
}
