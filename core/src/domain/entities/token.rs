//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use kg_shared::config::JwtConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminates access tokens from refresh tokens.
///
/// Refresh tokens are only ever accepted by the refresh operation; resource
/// endpoints reject them even though the signature is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenUse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenUse::Access => write!(f, "access"),
            TokenUse::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp, fixed at issuance
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,

    /// What the token may be used for
    pub token_use: TokenUse,

    /// Role names granted to the subject
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Claims {
    /// Creates new claims for an access token
    pub fn new_access_token(subject: &str, roles: Vec<String>, config: &JwtConfig) -> Self {
        Self::new(subject, roles, TokenUse::Access, config.access_token_expiry, config)
    }

    /// Creates new claims for a refresh token
    pub fn new_refresh_token(subject: &str, roles: Vec<String>, config: &JwtConfig) -> Self {
        Self::new(subject, roles, TokenUse::Refresh, config.refresh_token_expiry, config)
    }

    fn new(
        subject: &str,
        roles: Vec<String>,
        token_use: TokenUse,
        expiry_seconds: i64,
        config: &JwtConfig,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::seconds(expiry_seconds);

        Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
            jti: Uuid::new_v4().to_string(),
            token_use,
            roles,
        }
    }

    /// Checks if the claims have expired.
    ///
    /// At exactly the expiration instant the token is expired.
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.exp
    }

    /// Checks if the claims are currently valid (not expired and after nbf)
    pub fn is_valid(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.nbf && now < self.exp
    }

    /// Expiration instant as a `DateTime`
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed JWT access token
    pub access_token: String,

    /// Signed JWT refresh token
    pub refresh_token: String,

    /// Access token expiry time in seconds
    pub access_expires_in: i64,

    /// Refresh token expiry time in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair with expiry windows taken from configuration
    pub fn new(access_token: String, refresh_token: String, config: &JwtConfig) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in: config.access_token_expiry,
            refresh_expires_in: config.refresh_token_expiry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_claims() {
        let config = JwtConfig::default();
        let claims =
            Claims::new_access_token("alice", vec!["admin".to_string()], &config);

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iss, config.issuer);
        assert_eq!(claims.aud, config.audience);
        assert_eq!(claims.token_use, TokenUse::Access);
        assert_eq!(claims.roles, vec!["admin".to_string()]);
        assert_eq!(claims.exp - claims.iat, config.access_token_expiry);
        assert!(claims.is_valid());
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_refresh_token_claims() {
        let config = JwtConfig::default();
        let claims = Claims::new_refresh_token("alice", Vec::new(), &config);

        assert_eq!(claims.token_use, TokenUse::Refresh);
        assert_eq!(claims.exp - claims.iat, config.refresh_token_expiry);
        assert!(claims.is_valid());
    }

    #[test]
    fn test_claims_unique_jti() {
        let config = JwtConfig::default();
        let a = Claims::new_access_token("alice", Vec::new(), &config);
        let b = Claims::new_access_token("alice", Vec::new(), &config);

        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_claims_expiration_boundary() {
        let config = JwtConfig::default();
        let mut claims = Claims::new_access_token("alice", Vec::new(), &config);

        // At exactly the expiration instant the token is expired
        claims.exp = Utc::now().timestamp();

        assert!(claims.is_expired());
        assert!(!claims.is_valid());
    }

    #[test]
    fn test_claims_not_before() {
        let config = JwtConfig::default();
        let mut claims = Claims::new_access_token("alice", Vec::new(), &config);

        claims.nbf = Utc::now().timestamp() + 3600;

        assert!(!claims.is_valid());
    }

    #[test]
    fn test_token_use_serialization() {
        let config = JwtConfig::default();
        let claims = Claims::new_refresh_token("alice", Vec::new(), &config);

        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"token_use\":\"refresh\""));

        let deserialized: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(claims, deserialized);
    }

    #[test]
    fn test_token_pair_creation() {
        let config = JwtConfig::default();
        let pair = TokenPair::new("access.jwt".to_string(), "refresh.jwt".to_string(), &config);

        assert_eq!(pair.access_expires_in, config.access_token_expiry);
        assert_eq!(pair.refresh_expires_in, config.refresh_token_expiry);
    }
}
