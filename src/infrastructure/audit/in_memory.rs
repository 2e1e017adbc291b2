//! In-memory auth log repository implementation

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{AuthLogEntry, AuthLogRepository, DomainError};

#[derive(Debug, Default)]
pub struct InMemoryAuthLogRepository {
    entries: Arc<RwLock<Vec<AuthLogEntry>>>,
}

impl InMemoryAuthLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthLogRepository for InMemoryAuthLogRepository {
    async fn record(&self, entry: AuthLogEntry) -> Result<(), DomainError> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<AuthLogEntry>, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }
}
