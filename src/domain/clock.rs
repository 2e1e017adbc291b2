//! Injectable time source
//!
//! Key selection and publication read "now" from a [`Clock`] on every call so
//! tests can move time forward without sleeping.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Utc};

use super::DomainError;

/// Source of the current instant
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Utc>;

    /// Current time as unix seconds
    fn now_unix(&self) -> i64 {
        self.now().timestamp()
    }
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests
///
/// Clones share the same underlying instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current_ms: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current_ms: Arc::new(AtomicI64::new(start.timestamp_millis())),
        }
    }

    /// Start at the current wall-clock time
    pub fn from_system_time() -> Self {
        Self::new(Utc::now())
    }

    pub fn advance(&self, delta: Duration) {
        self.current_ms
            .fetch_add(delta.num_milliseconds(), Ordering::SeqCst);
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.current_ms
            .store(instant.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::from_system_time()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let ms = self.current_ms.load(Ordering::SeqCst);
        DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// `instant` moved by `seconds`, or a configuration error when the result
/// falls outside the representable range
pub fn offset_by_seconds(
    instant: DateTime<Utc>,
    seconds: i64,
) -> Result<DateTime<Utc>, DomainError> {
    Duration::try_seconds(seconds)
        .and_then(|delta| instant.checked_add_signed(delta))
        .ok_or_else(|| {
            DomainError::configuration(format!("Offset of {seconds}s is out of range"))
        })
}
