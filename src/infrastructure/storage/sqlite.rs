//! SQLite connection pooling

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::domain::DomainError;

/// SQLite storage configuration
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://totally_not_my_privateKeys.db?mode=rwc".to_string(),
            max_connections: 5,
            connect_timeout_secs: 30,
        }
    }
}

impl SqliteConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// In-memory databases live and die with a single connection
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Open a connection pool for the configured database
pub async fn connect(config: &SqliteConfig) -> Result<SqlitePool, DomainError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| DomainError::configuration(format!("Invalid database URL: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new()
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs));

    pool_options = if config.is_in_memory() {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(config.max_connections)
    };

    pool_options
        .connect_with(options)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to SQLite: {}", e)))
}

/// Map a sqlx error, turning unique constraint violations into `Conflict`
pub(crate) fn map_write_error(err: sqlx::Error, what: &str) -> DomainError {
    let unique = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());

    if unique {
        DomainError::conflict(format!("{} already exists", what))
    } else {
        DomainError::storage(format!("Failed to write {}: {}", what, err))
    }
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    let pool = connect(&SqliteConfig::new("sqlite::memory:")).await.unwrap();
    super::migrations::run_migrations(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SqliteConfig::default();
        assert_eq!(config.url, "sqlite://totally_not_my_privateKeys.db?mode=rwc");
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_config_builder() {
        let config = SqliteConfig::new("sqlite::memory:")
            .with_max_connections(2)
            .with_connect_timeout(5);

        assert!(config.is_in_memory());
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.connect_timeout_secs, 5);
    }

    #[tokio::test]
    async fn test_connect_in_memory() {
        let pool = memory_pool().await;
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }
}
