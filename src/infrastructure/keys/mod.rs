//! Signing key lifecycle: material, storage, selection

pub mod in_memory;
pub mod material;
pub mod selector;
pub mod sqlite;
pub mod store;

pub use in_memory::InMemorySigningKeyRepository;
pub use selector::KeySelector;
pub use sqlite::SqliteSigningKeyRepository;
pub use store::KeyStore;
