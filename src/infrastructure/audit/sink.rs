//! Channel-backed audit sink and its background worker

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::{AuditSink, AuthEvent, AuthLogEntry, AuthLogRepository, UserRepository};
use crate::infrastructure::observability::record_audit_dropped;

/// Pushes events onto a bounded channel without waiting
///
/// A full or closed channel drops the event with a warning.
#[derive(Debug, Clone)]
pub struct ChannelAuditSink {
    sender: mpsc::Sender<AuthEvent>,
}

impl ChannelAuditSink {
    /// Create the sink and spawn the worker that drains it
    ///
    /// The worker exits once every sink clone has been dropped.
    pub fn spawn(
        capacity: usize,
        users: Arc<dyn UserRepository>,
        logs: Arc<dyn AuthLogRepository>,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run_worker(receiver, users, logs));
        (Self { sender }, worker)
    }
}

impl AuditSink for ChannelAuditSink {
    fn emit(&self, event: AuthEvent) {
        if let Err(e) = self.sender.try_send(event) {
            record_audit_dropped();
            warn!(error = %e, "Dropping audit event");
        }
    }
}

async fn run_worker(
    mut receiver: mpsc::Receiver<AuthEvent>,
    users: Arc<dyn UserRepository>,
    logs: Arc<dyn AuthLogRepository>,
) {
    while let Some(event) = receiver.recv().await {
        record_event(users.as_ref(), logs.as_ref(), event).await;
    }
    debug!("Audit worker stopped");
}

/// Resolve the subject and write the log row. Only known users are logged.
async fn record_event(users: &dyn UserRepository, logs: &dyn AuthLogRepository, event: AuthEvent) {
    let user_id = match users.find_id_by_username(&event.subject).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            debug!(subject = %event.subject, "No registered user for audit event");
            return;
        }
        Err(e) => {
            warn!(subject = %event.subject, error = %e, "Failed to resolve audit subject");
            return;
        }
    };

    let entry = AuthLogEntry {
        request_ip: event.request_ip,
        request_timestamp: event.timestamp,
        user_id,
    };

    if let Err(e) = logs.record(entry).await {
        warn!(user_id, error = %e, "Failed to record auth log");
    }
}
