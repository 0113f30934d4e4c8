//! User entity holding credential material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// A registered account able to authenticate against the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,

    /// Login name, also the token subject
    pub username: String,

    /// bcrypt hash of the password; the raw password is never stored
    pub password_hash: String,

    /// Role names granted to the account
    pub roles: Vec<String>,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a user from an already-hashed password
    pub fn new(username: impl Into<String>, password_hash: String, roles: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash,
            roles,
            created_at: Utc::now(),
        }
    }

    /// Creates a user from a raw password, hashing it with bcrypt
    pub fn create(
        username: impl Into<String>,
        password: &str,
        roles: Vec<String>,
    ) -> DomainResult<Self> {
        let password_hash =
            bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| DomainError::Internal {
                message: format!("Password hashing failed: {}", e),
            })?;
        Ok(Self::new(username, password_hash, roles))
    }

    /// Verifies a candidate password against the stored hash
    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}
