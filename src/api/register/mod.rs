//! Identity registration endpoint

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub password: String,
}

/// POST /register
///
/// Returns the generated password exactly once.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let registration = state
        .user_service
        .register(&request.username, &request.email)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            password: registration.password,
        }),
    ))
}
