//! Authentication audit domain
//!
//! Token issuance hands an [`AuthEvent`] to an [`AuditSink`] and moves on.
//! Whatever the sink does with it can never fail the request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Something happened on the token endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEvent {
    pub request_ip: String,
    pub subject: String,
    pub timestamp: DateTime<Utc>,
}

/// A row in `auth_logs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthLogEntry {
    pub request_ip: String,
    pub request_timestamp: DateTime<Utc>,
    pub user_id: i64,
}

/// Fire-and-forget receiver of audit events
pub trait AuditSink: Send + Sync + std::fmt::Debug {
    fn emit(&self, event: AuthEvent);
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn emit(&self, _event: AuthEvent) {}
}

/// Persistence for audit log rows
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthLogRepository: Send + Sync + std::fmt::Debug {
    async fn record(&self, entry: AuthLogEntry) -> Result<(), DomainError>;

    /// Entries recorded for a user, oldest first
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<AuthLogEntry>, DomainError>;
}
