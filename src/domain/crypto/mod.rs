//! Symmetric encryption seam for key material at rest

use crate::domain::DomainError;

/// Authenticated symmetric encryption of arbitrary payloads
///
/// `open` either returns the full plaintext or an error. There is no
/// partial output.
pub trait EncryptionProvider: Send + Sync + std::fmt::Debug {
    /// Encrypt under a fresh random nonce; the nonce prefixes the output
    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, DomainError>;

    /// Reverse [`seal`](Self::seal)
    ///
    /// Tampered or truncated input fails with `DomainError::Decryption`. A
    /// provider without a secret fails with `DomainError::Configuration`.
    fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, DomainError>;
}
