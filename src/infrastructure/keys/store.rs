//! Key store: the only component that reads or writes sealed key material

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use super::material;
use crate::domain::signing_key::{
    KeyState, SealedSigningKey, SigningKey, SigningKeyId, SigningKeyRepository,
};
use crate::domain::{DomainError, EncryptionProvider};
use crate::infrastructure::observability::record_corrupted_key;

/// Encrypts on write, decrypts on read, persists through a repository
#[derive(Debug, Clone)]
pub struct KeyStore {
    repository: Arc<dyn SigningKeyRepository>,
    encryptor: Arc<dyn EncryptionProvider>,
    modulus_bits: usize,
}

impl KeyStore {
    pub fn new(
        repository: Arc<dyn SigningKeyRepository>,
        encryptor: Arc<dyn EncryptionProvider>,
    ) -> Self {
        Self {
            repository,
            encryptor,
            modulus_bits: material::DEFAULT_MODULUS_BITS,
        }
    }

    pub fn with_modulus_bits(mut self, bits: usize) -> Self {
        self.modulus_bits = bits;
        self
    }

    /// Generate, seal and persist a new key expiring at `expires_at`
    #[instrument(skip(self))]
    pub async fn create(&self, expires_at: DateTime<Utc>) -> Result<SigningKeyId, DomainError> {
        let bits = self.modulus_bits;
        let key = tokio::task::spawn_blocking(move || material::generate(bits))
            .await
            .map_err(|e| DomainError::internal(format!("Key generation task failed: {}", e)))??;

        self.insert(&key, expires_at).await
    }

    /// Seal and persist an existing private key
    pub async fn insert(
        &self,
        key: &rsa::RsaPrivateKey,
        expires_at: DateTime<Utc>,
    ) -> Result<SigningKeyId, DomainError> {
        let pem = material::encode_pem(key)?;
        let sealed = self.encryptor.seal(pem.as_bytes())?;

        let id = self
            .repository
            .insert(sealed, expires_at.timestamp())
            .await?;

        info!(key_id = %id, expires_at = %expires_at, "Signing key created");
        Ok(id)
    }

    /// The lowest-id key in `state` as of `as_of`
    ///
    /// `NotFound` when nothing qualifies, `CorruptedKey` when the chosen
    /// record cannot be opened.
    pub async fn find_one(
        &self,
        state: KeyState,
        as_of: DateTime<Utc>,
    ) -> Result<SigningKey, DomainError> {
        let record = self
            .repository
            .find_one(state, as_of.timestamp())
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("No {} signing key available", state))
            })?;

        self.unseal(record).inspect_err(|e| {
            if matches!(e, DomainError::CorruptedKey { .. }) {
                record_corrupted_key();
            }
        })
    }

    /// All keys valid at `as_of`, ordered by id
    ///
    /// Corrupted records are skipped. A missing secret fails the whole call.
    pub async fn list_valid(&self, as_of: DateTime<Utc>) -> Result<Vec<SigningKey>, DomainError> {
        let records = self.repository.list_valid(as_of.timestamp()).await?;
        let total = records.len();

        let mut keys = Vec::with_capacity(total);
        for record in records {
            match self.unseal(record) {
                Ok(key) => keys.push(key),
                Err(DomainError::CorruptedKey { key_id, message }) => {
                    warn!(key_id, error = %message, "Skipping corrupted signing key");
                    record_corrupted_key();
                }
                Err(other) => return Err(other),
            }
        }

        debug!(total, usable = keys.len(), "Listed valid signing keys");
        Ok(keys)
    }

    fn unseal(&self, record: SealedSigningKey) -> Result<SigningKey, DomainError> {
        let id = record.id;

        let pem = zeroize::Zeroizing::new(
            self.encryptor
                .open(&record.sealed_material)
                .map_err(|e| match e {
                    DomainError::Configuration { .. } => e,
                    other => DomainError::corrupted_key(id.value(), other.to_string()),
                })?,
        );

        let private_key = material::decode_pem(&pem)
            .map_err(|message| DomainError::corrupted_key(id.value(), message))?;

        let expires_at = DateTime::from_timestamp(record.expires_at, 0).ok_or_else(|| {
            DomainError::corrupted_key(id.value(), "Expiry timestamp out of range")
        })?;

        Ok(SigningKey {
            id,
            expires_at,
            private_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signing_key::MockSigningKeyRepository;
    use crate::infrastructure::crypto::AesGcmEncryptor;
    use crate::infrastructure::keys::in_memory::InMemorySigningKeyRepository;
    use crate::infrastructure::keys::material::test_keys;
    use chrono::Duration;

    fn encryptor() -> Arc<AesGcmEncryptor> {
        Arc::new(AesGcmEncryptor::from_secret(Some(b"0123456789abcdef".as_slice())).unwrap())
    }

    fn store_with(repo: Arc<InMemorySigningKeyRepository>) -> KeyStore {
        KeyStore::new(repo, encryptor())
    }

    #[tokio::test]
    async fn test_insert_then_find_one() {
        let repo = Arc::new(InMemorySigningKeyRepository::new());
        let store = store_with(repo);
        let now = Utc::now();

        let valid = store.insert(&test_keys::key(0), now + Duration::hours(1)).await.unwrap();
        let expired = store.insert(&test_keys::key(1), now - Duration::hours(1)).await.unwrap();

        let found = store.find_one(KeyState::Valid, now).await.unwrap();
        assert_eq!(found.id, valid);
        assert_eq!(found.private_key, test_keys::key(0));

        let found = store.find_one(KeyState::Expired, now).await.unwrap();
        assert_eq!(found.id, expired);
        assert_eq!(found.private_key, test_keys::key(1));
    }

    #[tokio::test]
    async fn test_material_is_sealed_at_rest() {
        let repo = Arc::new(InMemorySigningKeyRepository::new());
        let store = store_with(repo.clone());
        let now = Utc::now();
        store.insert(&test_keys::key(0), now + Duration::hours(1)).await.unwrap();

        let record = repo.find_one(KeyState::Valid, now.timestamp()).await.unwrap().unwrap();
        let as_text = String::from_utf8_lossy(&record.sealed_material);
        assert!(!as_text.contains("PRIVATE KEY"));
    }

    #[tokio::test]
    async fn test_find_one_not_found_is_distinct() {
        let store = store_with(Arc::new(InMemorySigningKeyRepository::new()));
        let err = store.find_one(KeyState::Valid, Utc::now()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_find_one_corrupted_record() {
        let repo = Arc::new(InMemorySigningKeyRepository::new());
        let store = store_with(repo.clone());
        let now = Utc::now();
        let id = store.insert(&test_keys::key(0), now + Duration::hours(1)).await.unwrap();
        repo.replace_material(id, vec![0u8; 64]).await;

        let err = store.find_one(KeyState::Valid, now).await.unwrap_err();
        assert!(matches!(err, DomainError::CorruptedKey { key_id, .. } if key_id == id.value()));
    }

    #[tokio::test]
    async fn test_list_valid_skips_corrupted() {
        let repo = Arc::new(InMemorySigningKeyRepository::new());
        let store = store_with(repo.clone());
        let now = Utc::now();

        let first = store.insert(&test_keys::key(0), now + Duration::hours(1)).await.unwrap();
        let second = store.insert(&test_keys::key(1), now + Duration::hours(2)).await.unwrap();
        let third = store.insert(&test_keys::key(2), now + Duration::hours(3)).await.unwrap();
        store.insert(&test_keys::key(0), now - Duration::hours(1)).await.unwrap();

        let mut tampered = repo
            .list_valid(now.timestamp())
            .await
            .unwrap()
            .into_iter()
            .find(|r| r.id == second)
            .unwrap()
            .sealed_material;
        tampered[20] ^= 0x01;
        repo.replace_material(second, tampered).await;

        let ids: Vec<SigningKeyId> = store
            .list_valid(now)
            .await
            .unwrap()
            .into_iter()
            .map(|k| k.id)
            .collect();
        assert_eq!(ids, vec![first, third]);
    }

    #[tokio::test]
    async fn test_plaintext_that_is_not_a_key_is_corrupted() {
        let repo = Arc::new(InMemorySigningKeyRepository::new());
        let encryptor = encryptor();
        let store = KeyStore::new(repo.clone(), encryptor.clone());
        let now = Utc::now();

        let sealed = encryptor.seal(b"-----BEGIN NOTHING-----").unwrap();
        repo.insert(sealed, (now + Duration::hours(1)).timestamp()).await.unwrap();

        assert!(matches!(
            store.find_one(KeyState::Valid, now).await,
            Err(DomainError::CorruptedKey { .. })
        ));
        assert!(store.list_valid(now).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let mut repo = MockSigningKeyRepository::new();
        repo.expect_list_valid()
            .returning(|_| Err(DomainError::storage("disk on fire")));

        let store = KeyStore::new(Arc::new(repo), encryptor());
        let err = store.list_valid(Utc::now()).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_failed_seal_persists_nothing() {
        let mut repo = MockSigningKeyRepository::new();
        repo.expect_insert().never();

        let unconfigured = Arc::new(AesGcmEncryptor::from_secret(None).unwrap());
        let store = KeyStore::new(Arc::new(repo), unconfigured);

        let err = store
            .insert(&test_keys::key(0), Utc::now() + Duration::hours(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_create_generates_distinct_keys() {
        let repo = Arc::new(InMemorySigningKeyRepository::new());
        let store = store_with(repo);
        let now = Utc::now();

        let first = store.create(now + Duration::hours(1)).await.unwrap();
        let second = store.create(now + Duration::hours(2)).await.unwrap();
        assert!(second > first);

        let keys = store.list_valid(now).await.unwrap();
        assert_eq!(keys.len(), 2);
        assert_ne!(keys[0].private_key, keys[1].private_key);
    }

    #[tokio::test]
    async fn test_missing_secret_fails_reads_instead_of_skipping() {
        let repo = Arc::new(InMemorySigningKeyRepository::new());
        let now = Utc::now();
        store_with(repo.clone())
            .insert(&test_keys::key(0), now + Duration::hours(1))
            .await
            .unwrap();

        let unconfigured =
            KeyStore::new(repo, Arc::new(AesGcmEncryptor::from_secret(None).unwrap()));

        let err = unconfigured.list_valid(now).await.unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }), "{err:?}");

        let err = unconfigured.find_one(KeyState::Valid, now).await.unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }), "{err:?}");
    }
}
