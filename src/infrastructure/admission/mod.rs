//! Admission control for the issuance path

mod rate_limiter;

pub use rate_limiter::{AdmissionGate, RateLimitConfig};
