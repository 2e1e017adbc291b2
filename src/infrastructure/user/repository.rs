//! In-memory user repository implementation

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, User, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.username == user.username) {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                user.username
            )));
        }

        if users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::conflict("Email already registered"));
        }

        let id = users.last().map(|u| u.id + 1).unwrap_or(1);
        let user = user.into_user(id);
        users.push(user.clone());
        Ok(user)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let repo = InMemoryUserRepository::new();

        let first = repo.create(NewUser::new("alice", "a@example.com", "h")).await.unwrap();
        let second = repo.create(NewUser::new("bob", "b@example.com", "h")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.find_id_by_username("bob").await.unwrap(), Some(2));
        assert_eq!(repo.find_id_by_username("carol").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicates_conflict() {
        let repo = InMemoryUserRepository::new();
        repo.create(NewUser::new("alice", "a@example.com", "h")).await.unwrap();

        let dup_name = repo.create(NewUser::new("alice", "other@example.com", "h")).await;
        assert!(matches!(dup_name, Err(DomainError::Conflict { .. })));

        let dup_email = repo.create(NewUser::new("alice2", "a@example.com", "h")).await;
        assert!(matches!(dup_email, Err(DomainError::Conflict { .. })));
    }
}
