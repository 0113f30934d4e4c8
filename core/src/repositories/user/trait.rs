//! User repository trait defining the interface for account lookup.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for `User` entity lookup
///
/// The authentication service only reads accounts; account provisioning is
/// an administrative concern handled by whoever owns the backing store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by login name
    ///
    /// # Arguments
    /// * `username` - The login name to search for
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with the given name
    /// * `Err(DomainError)` - Lookup failed
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by id
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with the given id
    /// * `Err(DomainError)` - Lookup failed
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
}
