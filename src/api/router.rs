use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::auth;
use super::health;
use super::jwks;
use super::middleware::logging_middleware;
use super::register;
use super::state::AppState;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    create_router_with_metrics(state, None)
}

/// Create the router, optionally exposing Prometheus metrics at `path`
pub fn create_router_with_metrics(
    state: AppState,
    metrics: Option<(PrometheusMetrics, String)>,
) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/.well-known/jwks.json", get(jwks::get_jwks))
        .route("/auth", post(auth::issue_token))
        .route("/register", post(register::register))
        .with_state(state);

    if let Some((metrics, path)) = metrics {
        router = router.merge(create_metrics_router(metrics, &path));
    }

    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
