//! SQLite signing key repository implementation

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::domain::signing_key::{KeyState, SealedSigningKey, SigningKeyId, SigningKeyRepository};
use crate::domain::DomainError;

/// SQLite implementation of SigningKeyRepository over `keys(kid, key, exp)`
#[derive(Debug, Clone)]
pub struct SqliteSigningKeyRepository {
    pool: SqlitePool,
}

impl SqliteSigningKeyRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SigningKeyRepository for SqliteSigningKeyRepository {
    async fn insert(
        &self,
        sealed_material: Vec<u8>,
        expires_at: i64,
    ) -> Result<SigningKeyId, DomainError> {
        let result = sqlx::query("INSERT INTO keys (key, exp) VALUES (?, ?)")
            .bind(sealed_material)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to insert signing key: {}", e)))?;

        Ok(SigningKeyId::new(result.last_insert_rowid()))
    }

    async fn find_one(
        &self,
        state: KeyState,
        as_of: i64,
    ) -> Result<Option<SealedSigningKey>, DomainError> {
        let sql = match state {
            KeyState::Valid => "SELECT kid, key, exp FROM keys WHERE exp > ? ORDER BY kid ASC LIMIT 1",
            KeyState::Expired => {
                "SELECT kid, key, exp FROM keys WHERE exp <= ? ORDER BY kid ASC LIMIT 1"
            }
        };

        let row = sqlx::query(sql)
            .bind(as_of)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to fetch signing key: {}", e)))?;

        row.as_ref().map(row_to_sealed_key).transpose()
    }

    async fn list_valid(&self, as_of: i64) -> Result<Vec<SealedSigningKey>, DomainError> {
        let rows = sqlx::query("SELECT kid, key, exp FROM keys WHERE exp > ? ORDER BY kid ASC")
            .bind(as_of)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list signing keys: {}", e)))?;

        rows.iter().map(row_to_sealed_key).collect()
    }
}

fn row_to_sealed_key(row: &SqliteRow) -> Result<SealedSigningKey, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Malformed keys row: {}", e));

    Ok(SealedSigningKey {
        id: SigningKeyId::new(row.try_get::<i64, _>("kid").map_err(decode)?),
        sealed_material: row.try_get::<Vec<u8>, _>("key").map_err(decode)?,
        expires_at: row.try_get::<i64, _>("exp").map_err(decode)?,
    })
}
