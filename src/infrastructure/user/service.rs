//! Registration service

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::user::{validate_email, validate_username, NewUser, UserRepository};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Outcome of a successful registration
#[derive(Debug, Clone)]
pub struct Registration {
    pub user_id: i64,
    /// Generated once and never stored in clear
    pub password: String,
}

/// User service for registration and lookups
#[derive(Debug, Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Create a new user service
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Register a user with a generated UUIDv4 password
    #[instrument(skip(self, email))]
    pub async fn register(&self, username: &str, email: &str) -> Result<Registration, DomainError> {
        validate_username(username).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_email(email).map_err(|e| DomainError::validation(e.to_string()))?;

        let password = Uuid::new_v4().to_string();

        let hasher = self.hasher.clone();
        let to_hash = password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&to_hash))
            .await
            .map_err(|e| DomainError::internal(format!("Password hashing task failed: {}", e)))??;

        let user = self
            .repository
            .create(NewUser::new(username, email, password_hash))
            .await?;

        info!(user_id = user.id, "User registered");
        Ok(Registration {
            user_id: user.id,
            password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::password::{cheap_hasher, verify_phc};
    use crate::infrastructure::user::InMemoryUserRepository;

    fn service() -> (UserService, Arc<InMemoryUserRepository>) {
        let repo = Arc::new(InMemoryUserRepository::new());
        (UserService::new(repo.clone(), Arc::new(cheap_hasher())), repo)
    }

    #[tokio::test]
    async fn test_register_stores_hash_of_generated_password() {
        let (service, repo) = service();

        let registration = service.register("alice", "alice@example.com").await.unwrap();

        let parsed = Uuid::parse_str(&registration.password).unwrap();
        assert_eq!(parsed.get_version_num(), 4);

        let stored = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored.id, registration.user_id);
        assert_ne!(stored.password_hash, registration.password);
        assert!(stored.password_hash.starts_with("$argon2id$"));
        assert!(verify_phc(&registration.password, &stored.password_hash));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_input() {
        let (service, _) = service();

        let err = service.register("", "a@example.com").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));

        let err = service.register("alice", "no-at-sign").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_register_duplicate_conflicts() {
        let (service, _) = service();
        service.register("alice", "alice@example.com").await.unwrap();

        let err = service.register("alice", "other@example.com").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }
}
