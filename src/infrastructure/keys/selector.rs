//! Expiry-based key selection

use std::sync::Arc;

use tracing::debug;

use super::store::KeyStore;
use crate::domain::signing_key::{KeyState, SigningKey};
use crate::domain::{Clock, DomainError};

/// Picks the signing key for an issuance request
///
/// The clock is read on every call.
#[derive(Debug, Clone)]
pub struct KeySelector {
    store: KeyStore,
    clock: Arc<dyn Clock>,
}

impl KeySelector {
    pub fn new(store: KeyStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// The lowest-id key in `state` right now
    pub async fn select(&self, state: KeyState) -> Result<SigningKey, DomainError> {
        let now = self.clock.now();
        let key = self.store.find_one(state, now).await?;
        debug!(key_id = %key.id, state = %state, "Selected signing key");
        Ok(key)
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}
