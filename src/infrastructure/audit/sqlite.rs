//! SQLite auth log repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use crate::domain::{AuthLogEntry, AuthLogRepository, DomainError};

/// SQLite implementation of AuthLogRepository over `auth_logs`
#[derive(Debug, Clone)]
pub struct SqliteAuthLogRepository {
    pool: SqlitePool,
}

impl SqliteAuthLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthLogRepository for SqliteAuthLogRepository {
    async fn record(&self, entry: AuthLogEntry) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO auth_logs (request_ip, request_timestamp, user_id) VALUES (?, ?, ?)",
        )
        .bind(&entry.request_ip)
        .bind(entry.request_timestamp)
        .bind(entry.user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to record auth log: {}", e)))?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<AuthLogEntry>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT request_ip, request_timestamp, user_id
            FROM auth_logs
            WHERE user_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list auth logs: {}", e)))?;

        rows.iter()
            .map(|row| {
                let decode = |e: sqlx::Error| DomainError::storage(format!("Malformed auth_logs row: {}", e));
                Ok(AuthLogEntry {
                    request_ip: row.try_get("request_ip").map_err(decode)?,
                    request_timestamp: row
                        .try_get::<DateTime<Utc>, _>("request_timestamp")
                        .map_err(decode)?,
                    user_id: row.try_get("user_id").map_err(decode)?,
                })
            })
            .collect()
    }
}
