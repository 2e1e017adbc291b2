//! Signing key repository trait

use async_trait::async_trait;

use super::entity::{KeyState, SealedSigningKey, SigningKeyId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Persistence for sealed signing key records
///
/// Implementations only ever see ciphertext. Records are append-only.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SigningKeyRepository: Send + Sync + std::fmt::Debug {
    /// Persist a sealed key and return the identifier assigned by storage
    async fn insert(
        &self,
        sealed_material: Vec<u8>,
        expires_at: i64,
    ) -> Result<SigningKeyId, DomainError>;

    /// The qualifying record with the lowest identifier
    async fn find_one(
        &self,
        state: KeyState,
        as_of: i64,
    ) -> Result<Option<SealedSigningKey>, DomainError>;

    /// All records with `expires_at > as_of`, ordered by identifier ascending
    async fn list_valid(&self, as_of: i64) -> Result<Vec<SealedSigningKey>, DomainError>;
}
