//! Domain layer - Core entities, errors and persistence seams

pub mod audit;
pub mod clock;
pub mod crypto;
pub mod error;
pub mod jwks;
pub mod signing_key;
pub mod token;
pub mod user;

pub use audit::{AuditSink, AuthEvent, AuthLogEntry, AuthLogRepository, NoopAuditSink};
pub use clock::{offset_by_seconds, Clock, ManualClock, SystemClock};
pub use crypto::EncryptionProvider;
pub use error::DomainError;
pub use jwks::{VerificationDocument, VerificationEntry};
pub use signing_key::{KeyState, SealedSigningKey, SigningKey, SigningKeyId, SigningKeyRepository};
pub use token::{IssuedToken, TokenClaims};
pub use user::{NewUser, User, UserRepository, UserValidationError};
