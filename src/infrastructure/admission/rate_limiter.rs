//! Rate limiter implementation
//!
//! A single token bucket shared by every request on the issuance path.

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use tokio::sync::Mutex;

/// Token bucket settings
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Refill rate
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,
    /// Bucket capacity
    #[serde(default = "default_burst")]
    pub burst: u32,
}

fn default_requests_per_second() -> f64 {
    20.0
}

fn default_burst() -> u32 {
    10
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst: default_burst(),
        }
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token-bucket admission gate
///
/// Starts full. Clones share the same bucket.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    config: RateLimitConfig,
    bucket: Arc<Mutex<Bucket>>,
}

impl AdmissionGate {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::starting_at(config, Instant::now())
    }

    fn starting_at(config: RateLimitConfig, now: Instant) -> Self {
        let bucket = Bucket {
            tokens: f64::from(config.burst),
            last_refill: now,
        };
        Self {
            config,
            bucket: Arc::new(Mutex::new(bucket)),
        }
    }

    /// Take one token if available
    pub async fn try_acquire(&self) -> bool {
        self.try_acquire_at(Instant::now()).await
    }

    /// [`try_acquire`](Self::try_acquire) against an explicit instant
    pub async fn try_acquire_at(&self, now: Instant) -> bool {
        let mut bucket = self.bucket.lock().await;

        let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
        let capacity = f64::from(self.config.burst);
        bucket.tokens = (bucket.tokens + elapsed * self.config.requests_per_second).min(capacity);
        bucket.last_refill = bucket.last_refill.max(now);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}
