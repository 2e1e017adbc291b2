//! SQLite user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::domain::user::{NewUser, User, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::sqlite::map_write_error;

/// SQLite implementation of UserRepository
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, email, date_registered)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.email)
        .bind(user.date_registered)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "User"))?;

        Ok(user.into_user(result.last_insert_rowid()))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, email, date_registered, last_login
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by username: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_id_by_username(&self, username: &str) -> Result<Option<i64>, DomainError> {
        sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to fetch user id: {}", e)))
    }
}

fn row_to_user(row: &SqliteRow) -> Result<User, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Malformed users row: {}", e));

    Ok(User {
        id: row.try_get("id").map_err(decode)?,
        username: row.try_get("username").map_err(decode)?,
        email: row
            .try_get::<Option<String>, _>("email")
            .map_err(decode)?
            .unwrap_or_default(),
        password_hash: row.try_get("password_hash").map_err(decode)?,
        date_registered: row
            .try_get::<Option<DateTime<Utc>>, _>("date_registered")
            .map_err(decode)?
            .unwrap_or(DateTime::UNIX_EPOCH),
        last_login: row.try_get("last_login").map_err(decode)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::sqlite::memory_pool;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = SqliteUserRepository::new(memory_pool().await);

        let created = repo
            .create(NewUser::new("alice", "alice@example.com", "$argon2id$hash"))
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let found = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.email, "alice@example.com");
        assert_eq!(found.password_hash, "$argon2id$hash");
        assert!(found.last_login.is_none());

        assert_eq!(repo.find_id_by_username("alice").await.unwrap(), Some(1));
        assert_eq!(repo.find_id_by_username("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unique_constraints_conflict() {
        let repo = SqliteUserRepository::new(memory_pool().await);
        repo.create(NewUser::new("alice", "alice@example.com", "h"))
            .await
            .unwrap();

        let err = repo
            .create(NewUser::new("alice", "new@example.com", "h"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));

        let err = repo
            .create(NewUser::new("alice2", "alice@example.com", "h"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }
}
