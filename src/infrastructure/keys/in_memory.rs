//! In-memory signing key repository implementation

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::signing_key::{KeyState, SealedSigningKey, SigningKeyId, SigningKeyRepository};
use crate::domain::DomainError;

/// In-memory implementation of SigningKeyRepository
///
/// Records are kept in insertion order, which is also identifier order.
#[derive(Debug, Default)]
pub struct InMemorySigningKeyRepository {
    records: Arc<RwLock<Vec<SealedSigningKey>>>,
}

impl InMemorySigningKeyRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the stored ciphertext of a record
    #[cfg(test)]
    pub async fn replace_material(&self, id: SigningKeyId, sealed_material: Vec<u8>) {
        let mut records = self.records.write().await;
        if let Some(record) = records.iter_mut().find(|r| r.id == id) {
            record.sealed_material = sealed_material;
        }
    }
}

#[async_trait]
impl SigningKeyRepository for InMemorySigningKeyRepository {
    async fn insert(
        &self,
        sealed_material: Vec<u8>,
        expires_at: i64,
    ) -> Result<SigningKeyId, DomainError> {
        let mut records = self.records.write().await;
        let next = records.last().map(|r| r.id.value() + 1).unwrap_or(1);
        let id = SigningKeyId::new(next);

        records.push(SealedSigningKey {
            id,
            sealed_material,
            expires_at,
        });

        Ok(id)
    }

    async fn find_one(
        &self,
        state: KeyState,
        as_of: i64,
    ) -> Result<Option<SealedSigningKey>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| state.admits(r.expires_at, as_of))
            .min_by_key(|r| r.id)
            .cloned())
    }

    async fn list_valid(&self, as_of: i64) -> Result<Vec<SealedSigningKey>, DomainError> {
        let records = self.records.read().await;
        let mut valid: Vec<SealedSigningKey> = records
            .iter()
            .filter(|r| KeyState::Valid.admits(r.expires_at, as_of))
            .cloned()
            .collect();
        valid.sort_by_key(|r| r.id);
        Ok(valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    async fn seeded() -> InMemorySigningKeyRepository {
        let repo = InMemorySigningKeyRepository::new();
        repo.insert(b"a".to_vec(), NOW + 3600).await.unwrap();
        repo.insert(b"b".to_vec(), NOW - 3600).await.unwrap();
        repo.insert(b"c".to_vec(), NOW + 60).await.unwrap();
        repo.insert(b"d".to_vec(), NOW).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let repo = InMemorySigningKeyRepository::new();
        let first = repo.insert(vec![1], NOW).await.unwrap();
        let second = repo.insert(vec![2], NOW).await.unwrap();

        assert_eq!(first.value(), 1);
        assert_eq!(second.value(), 2);
    }

    #[tokio::test]
    async fn test_find_one_lowest_id_wins() {
        let repo = seeded().await;

        let valid = repo.find_one(KeyState::Valid, NOW).await.unwrap().unwrap();
        assert_eq!(valid.id.value(), 1);

        // expiry exactly at now counts as expired
        let expired = repo.find_one(KeyState::Expired, NOW).await.unwrap().unwrap();
        assert_eq!(expired.id.value(), 2);
    }

    #[tokio::test]
    async fn test_find_one_none_when_nothing_qualifies() {
        let repo = InMemorySigningKeyRepository::new();
        repo.insert(vec![1], NOW + 10).await.unwrap();

        assert!(repo.find_one(KeyState::Expired, NOW).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_valid_filters_and_orders() {
        let repo = seeded().await;
        let ids: Vec<i64> = repo
            .list_valid(NOW)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id.value())
            .collect();

        assert_eq!(ids, vec![1, 3]);
    }
}
