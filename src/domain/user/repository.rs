//! User repository trait

use async_trait::async_trait;

use super::entity::{NewUser, User};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository trait for user storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug {
    /// Create a new user; duplicate username or email is a `Conflict`
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Get a user by their username
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Resolve a username to its numeric id
    async fn find_id_by_username(&self, username: &str) -> Result<Option<i64>, DomainError> {
        Ok(self.get_by_username(username).await?.map(|u| u.id))
    }
}
