//! AES-GCM encryption of key material at rest
//!
//! The process secret is used directly as the AES key. Its length picks the
//! variant: 16 bytes for AES-128, 24 for AES-192, 32 for AES-256.

use aes_gcm::{
    aead::{Aead, KeyInit, consts::U12},
    aes::Aes192,
    Aes128Gcm, Aes256Gcm, AesGcm, Nonce,
};
use rand::RngCore;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::{DomainError, EncryptionProvider};

/// Environment variable carrying the symmetric secret
pub const SECRET_ENV_VAR: &str = "NOT_MY_KEY";

/// GCM nonce length in bytes
pub const NONCE_LEN: usize = 12;

type Aes192Gcm = AesGcm<Aes192, U12>;

enum Cipher {
    Aes128(Box<Aes128Gcm>),
    Aes192(Box<Aes192Gcm>),
    Aes256(Box<Aes256Gcm>),
}

impl Cipher {
    fn from_key(key: &[u8]) -> Result<Self, DomainError> {
        let invalid = |_| DomainError::configuration("Invalid AES key");
        match key.len() {
            16 => Ok(Self::Aes128(Box::new(
                Aes128Gcm::new_from_slice(key).map_err(invalid)?,
            ))),
            24 => Ok(Self::Aes192(Box::new(
                Aes192Gcm::new_from_slice(key).map_err(invalid)?,
            ))),
            32 => Ok(Self::Aes256(Box::new(
                Aes256Gcm::new_from_slice(key).map_err(invalid)?,
            ))),
            other => Err(DomainError::configuration(format!(
                "{SECRET_ENV_VAR} must be 16, 24 or 32 bytes, got {other}"
            ))),
        }
    }

    fn bits(&self) -> usize {
        match self {
            Self::Aes128(_) => 128,
            Self::Aes192(_) => 192,
            Self::Aes256(_) => 256,
        }
    }

    fn encrypt(&self, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, aes_gcm::Error> {
        let nonce = Nonce::<U12>::from_slice(nonce);
        match self {
            Self::Aes128(c) => c.encrypt(nonce, plaintext),
            Self::Aes192(c) => c.encrypt(nonce, plaintext),
            Self::Aes256(c) => c.encrypt(nonce, plaintext),
        }
    }

    fn decrypt(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, aes_gcm::Error> {
        let nonce = Nonce::<U12>::from_slice(nonce);
        match self {
            Self::Aes128(c) => c.decrypt(nonce, ciphertext),
            Self::Aes192(c) => c.decrypt(nonce, ciphertext),
            Self::Aes256(c) => c.decrypt(nonce, ciphertext),
        }
    }
}

/// [`EncryptionProvider`] backed by AES-GCM with a process-wide secret
pub struct AesGcmEncryptor {
    cipher: Option<Cipher>,
}

impl AesGcmEncryptor {
    /// Build from raw secret bytes. `None` yields an encryptor that refuses
    /// every operation.
    pub fn from_secret(secret: Option<&[u8]>) -> Result<Self, DomainError> {
        let cipher = secret.map(Cipher::from_key).transpose()?;
        if let Some(cipher) = &cipher {
            debug!(bits = cipher.bits(), "AES-GCM encryptor configured");
        }
        Ok(Self { cipher })
    }

    /// Read the secret from `NOT_MY_KEY`. A missing or empty variable is a
    /// configuration error.
    pub fn from_env() -> Result<Self, DomainError> {
        let secret = std::env::var_os(SECRET_ENV_VAR)
            .map(|value| Zeroizing::new(value.into_encoded_bytes()))
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| {
                DomainError::configuration(format!("{SECRET_ENV_VAR} is not set"))
            })?;

        Self::from_secret(Some(secret.as_slice()))
    }

    pub fn is_configured(&self) -> bool {
        self.cipher.is_some()
    }
}

impl std::fmt::Debug for AesGcmEncryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmEncryptor")
            .field("bits", &self.cipher.as_ref().map(Cipher::bits))
            .finish()
    }
}

impl EncryptionProvider for AesGcmEncryptor {
    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, DomainError> {
        let cipher = self
            .cipher
            .as_ref()
            .ok_or_else(|| DomainError::configuration("No encryption secret configured"))?;

        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext)
            .map_err(|_| DomainError::internal("AES-GCM encryption failed"))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, DomainError> {
        let cipher = self
            .cipher
            .as_ref()
            .ok_or_else(|| DomainError::configuration("No encryption secret configured"))?;

        if sealed.len() < NONCE_LEN {
            return Err(DomainError::decryption(format!(
                "Ciphertext shorter than the {NONCE_LEN}-byte nonce"
            )));
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| DomainError::decryption("Authentication tag mismatch"))
    }
}
