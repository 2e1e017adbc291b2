//! Observability infrastructure - Prometheus metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_audit_dropped, record_auth_rejected,
    record_corrupted_key, record_http_request, record_jwks_request, record_token_issued,
    PrometheusMetrics,
};
