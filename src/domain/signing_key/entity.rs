//! Signing key entity and related types

use chrono::{DateTime, Utc};
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};

/// Store-assigned signing key identifier
///
/// Rendered as a decimal string wherever it appears as a `kid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SigningKeyId(i64);

impl SigningKeyId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for SigningKeyId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SigningKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of its expiry instant a key must be on to qualify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeyState {
    /// `expires_at > as_of`
    #[default]
    Valid,
    /// `expires_at <= as_of`
    Expired,
}

impl KeyState {
    pub fn from_expired_flag(expired: bool) -> Self {
        if expired { Self::Expired } else { Self::Valid }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Expired => "expired",
        }
    }

    /// Whether a key expiring at `expires_at` qualifies at `as_of`
    pub fn admits(&self, expires_at: i64, as_of: i64) -> bool {
        match self {
            Self::Valid => expires_at > as_of,
            Self::Expired => expires_at <= as_of,
        }
    }
}

impl std::fmt::Display for KeyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted key record exactly as the repository holds it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedSigningKey {
    pub id: SigningKeyId,
    /// Nonce-prefixed AES-GCM ciphertext of the PKCS#1 PEM private key
    pub sealed_material: Vec<u8>,
    /// Unix seconds
    pub expires_at: i64,
}

/// A decrypted signing key, alive for a single operation
#[derive(Clone)]
pub struct SigningKey {
    pub id: SigningKeyId,
    pub expires_at: DateTime<Utc>,
    pub private_key: RsaPrivateKey,
}

impl SigningKey {
    pub fn is_expired_at(&self, as_of: DateTime<Utc>) -> bool {
        self.expires_at <= as_of
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("id", &self.id)
            .field("expires_at", &self.expires_at)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}
