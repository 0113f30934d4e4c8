//! Token signing and lifetime configuration

use serde::{Deserialize, Serialize};

/// Policy applied to the refresh token during a refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    /// Issue a new refresh token and revoke the presented one
    Rotate,
    /// Return the presented refresh token unchanged
    Reuse,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        RotationPolicy::Rotate
    }
}

impl std::str::FromStr for RotationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rotate" => Ok(RotationPolicy::Rotate),
            "reuse" => Ok(RotationPolicy::Reuse),
            _ => Err(format!("Invalid rotation policy: {}", s)),
        }
    }
}

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens
    pub secret: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// Refresh token rotation policy
    #[serde(default)]
    pub rotation_policy: RotationPolicy,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from("development-secret-please-change-in-production"),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            issuer: String::from("keygate"),
            audience: String::from("keygate-api"),
            rotation_policy: RotationPolicy::default(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in minutes
    pub fn with_refresh_expiry_minutes(mut self, minutes: i64) -> Self {
        self.refresh_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Set the rotation policy
    pub fn with_rotation_policy(mut self, policy: RotationPolicy) -> Self {
        self.rotation_policy = policy;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == "development-secret-please-change-in-production"
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "development-secret-please-change-in-production".to_string());
        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "900".to_string())
            .parse()
            .unwrap_or(900);
        let refresh_token_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "604800".to_string())
            .parse()
            .unwrap_or(604800);
        let rotation_policy = std::env::var("JWT_ROTATION_POLICY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        Self {
            secret,
            access_token_expiry,
            refresh_token_expiry,
            issuer: String::from("keygate"),
            audience: String::from("keygate-api"),
            rotation_policy,
        }
    }
}
