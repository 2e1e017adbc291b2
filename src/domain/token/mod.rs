//! Issued token types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::signing_key::SigningKeyId;

/// Registered claims carried by every issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub iss: String,
    pub sub: String,
    /// Unix seconds
    pub exp: i64,
}

/// A compact-serialized RS256 token and the key that signed it
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub key_id: SigningKeyId,
    pub expires_at: DateTime<Utc>,
}
