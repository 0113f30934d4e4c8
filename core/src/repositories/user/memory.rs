//! In-memory user repository for tests and single-node deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

use super::r#trait::UserRepository;

/// User repository backed by a `HashMap` keyed by username
#[derive(Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace a user
    pub async fn insert(&self, user: User) {
        let mut users = self.users.write().await;
        users.insert(user.username.clone(), user);
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("alice", "hash".to_string(), Vec::new());
        let id = user.id;

        repo.insert(user).await;

        let found = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, id);

        let by_id = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");

        assert!(repo.find_by_username("bob").await.unwrap().is_none());
    }
}
