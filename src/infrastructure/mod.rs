//! Infrastructure layer - Persistence, cryptography and service implementations

pub mod admission;
pub mod audit;
pub mod auth;
pub mod crypto;
pub mod keys;
pub mod logging;
pub mod observability;
pub mod storage;
pub mod user;
