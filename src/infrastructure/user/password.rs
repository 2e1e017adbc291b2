//! Password hashing utilities using Argon2id

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher as Argon2PasswordHasher, SaltString},
    Algorithm, Argon2, Params, Version,
};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for password hashing operations
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a password into a PHC string
    fn hash(&self, password: &str) -> Result<String, DomainError>;
}

/// Argon2id hasher
///
/// Defaults: 64 MiB memory, one pass, four lanes, 32-byte output.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub const DEFAULT_MEMORY_KIB: u32 = 64 * 1024;
    pub const DEFAULT_ITERATIONS: u32 = 1;
    pub const DEFAULT_PARALLELISM: u32 = 4;
    pub const OUTPUT_LEN: usize = 32;

    pub fn new() -> Self {
        Self::with_params(
            Self::DEFAULT_MEMORY_KIB,
            Self::DEFAULT_ITERATIONS,
            Self::DEFAULT_PARALLELISM,
        )
        .unwrap_or_else(|_| Self {
            params: Params::default(),
        })
    }

    /// Custom cost parameters
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, DomainError> {
        let params = Params::new(memory_kib, iterations, parallelism, Some(Self::OUTPUT_LEN))
            .map_err(|e| DomainError::configuration(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }
}

#[cfg(test)]
pub(crate) fn cheap_hasher() -> Argon2Hasher {
    Argon2Hasher::with_params(1024, 1, 1).unwrap()
}

/// Check `password` against a PHC string; cost parameters come from the string
#[cfg(test)]
pub(crate) fn verify_phc(password: &str, hash: &str) -> bool {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
