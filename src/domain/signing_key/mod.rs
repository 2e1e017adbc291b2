//! Signing key domain
//!
//! Entities and the persistence seam for the rotating RSA keys tokens are
//! signed with.

mod entity;
mod repository;

pub use entity::{KeyState, SealedSigningKey, SigningKey, SigningKeyId};
pub use repository::SigningKeyRepository;

#[cfg(test)]
pub use repository::MockSigningKeyRepository;
