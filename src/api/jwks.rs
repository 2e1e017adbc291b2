//! Public key publication endpoint

use axum::extract::State;
use tracing::error;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::VerificationDocument;

/// GET /.well-known/jwks.json
pub async fn get_jwks(
    State(state): State<AppState>,
) -> Result<Json<VerificationDocument>, ApiError> {
    let document = state.key_publisher.publish().await.map_err(|e| {
        error!(error = %e, "Failed to publish verification keys");
        ApiError::from(e)
    })?;

    Ok(Json(document))
}
