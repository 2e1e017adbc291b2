//! Encryption at rest

mod encryptor;

pub use encryptor::{AesGcmEncryptor, NONCE_LEN, SECRET_ENV_VAR};
