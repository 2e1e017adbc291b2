//! JWKS publication

use std::sync::Arc;

use tracing::debug;

use crate::domain::{Clock, DomainError, VerificationDocument, VerificationEntry};
use crate::infrastructure::keys::{material, KeyStore};
use crate::infrastructure::observability::record_jwks_request;

/// Derives the public verification document from the currently valid keys
///
/// Nothing is cached; every call re-reads and re-derives.
#[derive(Debug, Clone)]
pub struct PublicKeyPublisher {
    store: KeyStore,
    clock: Arc<dyn Clock>,
}

impl PublicKeyPublisher {
    pub fn new(store: KeyStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn publish(&self) -> Result<VerificationDocument, DomainError> {
        record_jwks_request();

        let keys = self.store.list_valid(self.clock.now()).await?;
        let entries: Vec<VerificationEntry> = keys
            .iter()
            .map(|key| {
                let (n, e) = material::public_components(&key.private_key);
                VerificationEntry::rs256(key.id.to_string(), n, e)
            })
            .collect();

        debug!(count = entries.len(), "Published verification keys");
        Ok(VerificationDocument { keys: entries })
    }
}
