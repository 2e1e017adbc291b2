//! RS256 token issuance

use std::sync::Arc;

use jsonwebtoken::{encode, Algorithm, Header};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domain::signing_key::KeyState;
use crate::domain::{
    offset_by_seconds, AuditSink, AuthEvent, DomainError, IssuedToken, TokenClaims,
};
use crate::infrastructure::keys::{material, KeySelector};
use crate::infrastructure::observability::record_token_issued;

/// Configuration for issued tokens
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    /// `iss` claim
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Token lifetime, independent of the signing key's own expiry
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

fn default_issuer() -> String {
    "jwks-server".to_string()
}

fn default_ttl_seconds() -> u64 {
    3600
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            issuer: default_issuer(),
            ttl_seconds: default_ttl_seconds(),
        }
    }
}

/// Signs tokens with the key the selector hands out
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    selector: KeySelector,
    config: TokenConfig,
    audit: Arc<dyn AuditSink>,
}

impl TokenIssuer {
    pub fn new(selector: KeySelector, config: TokenConfig, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            selector,
            config,
            audit,
        }
    }

    /// Issue a token for `subject` signed by a key in `state`
    ///
    /// The subject is taken at face value. `request_origin` only feeds the
    /// audit event.
    #[instrument(skip(self), fields(key_id))]
    pub async fn issue(
        &self,
        subject: &str,
        state: KeyState,
        request_origin: &str,
    ) -> Result<IssuedToken, DomainError> {
        let key = self.selector.select(state).await?;
        let now = self.selector.clock().now();

        let ttl = i64::try_from(self.config.ttl_seconds)
            .map_err(|_| DomainError::configuration("Token TTL out of range"))?;
        let expires_at = offset_by_seconds(now, ttl)?;

        let claims = TokenClaims {
            iss: self.config.issuer.clone(),
            sub: subject.to_string(),
            exp: expires_at.timestamp(),
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(key.id.to_string());

        let encoding_key = material::encoding_key(&key.private_key)?;
        let token = encode(&header, &claims, &encoding_key)
            .map_err(|e| DomainError::issuance(format!("Failed to sign token: {}", e)))?;

        tracing::Span::current().record("key_id", key.id.value());
        record_token_issued(state);
        info!(key_id = %key.id, key_state = %state, "Token issued");

        self.audit.emit(AuthEvent {
            request_ip: request_origin.to_string(),
            subject: subject.to_string(),
            timestamp: now,
        });

        Ok(IssuedToken {
            token,
            key_id: key.id,
            expires_at,
        })
    }
}
