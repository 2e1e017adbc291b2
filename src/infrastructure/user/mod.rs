//! User infrastructure module
//!
//! Argon2id password hashing, user repositories and the registration service.

mod password;
mod repository;
mod service;
mod sqlite_repository;

pub use password::{Argon2Hasher, PasswordHasher};
pub use repository::InMemoryUserRepository;
pub use service::{Registration, UserService};
pub use sqlite_repository::SqliteUserRepository;

#[cfg(test)]
pub(crate) use password::{cheap_hasher, verify_phc};
