//! Token issuance endpoint
//!
//! POST /auth[?expired=true]. The caller names a subject through HTTP Basic
//! credentials or a JSON body; nothing is verified.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::api::middleware::RequestOrigin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::KeyState;
use crate::infrastructure::observability::record_auth_rejected;

/// JSON credentials accepted when no Basic header is present
///
/// A `password` field may be present and is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /auth
pub async fn issue_token(
    State(state): State<AppState>,
    RequestOrigin(origin): RequestOrigin,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TokenResponse>, ApiError> {
    if !state.admission_gate.try_acquire().await {
        record_auth_rejected("rate_limited");
        return Err(ApiError::rate_limited("Too Many Requests"));
    }

    let subject = match basic_auth_username(&headers) {
        Some(username) => username,
        None => match subject_from_body(&body) {
            Some(username) => username,
            None => {
                record_auth_rejected("invalid_body");
                return Err(ApiError::bad_request("Invalid authentication method"));
            }
        },
    };

    let state_flag = KeyState::from_expired_flag(parse_bool_lenient(params.get("expired")));

    let issued = state
        .token_issuer
        .issue(&subject, state_flag, &origin)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                record_auth_rejected("no_signing_key");
                warn!(key_state = %state_flag, "No signing key available");
                ApiError::unavailable("No signing key available")
                    .with_code("signing_key_unavailable")
            } else {
                record_auth_rejected("internal");
                error!(error = %e, "Token issuance failed");
                ApiError::from(e)
            }
        })?;

    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}

/// Username from `Authorization: Basic base64(user:pass)`
fn basic_auth_username(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, _password) = decoded.split_once(':')?;
    Some(username.to_string())
}

/// Username from the first JSON value in the body
///
/// Bytes after that value are ignored. `null` for the body or the username
/// yields an empty subject. An empty or malformed body yields `None`.
fn subject_from_body(body: &[u8]) -> Option<String> {
    let mut values =
        serde_json::Deserializer::from_slice(body).into_iter::<Option<AuthRequest>>();
    let request = values.next()?.ok()?;
    Some(request.unwrap_or_default().username.unwrap_or_default())
}

/// `1`, `t`, `T`, `TRUE`, `true`, `True` are true; anything else is false
fn parse_bool_lenient(value: Option<&String>) -> bool {
    matches!(
        value.map(String::as_str),
        Some("1" | "t" | "T" | "TRUE" | "true" | "True")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn basic(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_basic_auth_username() {
        // userABC:password123
        let headers = basic("Basic dXNlckFCQzpwYXNzd29yZDEyMw==");
        assert_eq!(basic_auth_username(&headers).as_deref(), Some("userABC"));

        let headers = basic("basic dXNlckFCQzpwYXNzd29yZDEyMw==");
        assert_eq!(basic_auth_username(&headers).as_deref(), Some("userABC"));
    }

    #[test]
    fn test_basic_auth_rejects_malformed() {
        assert!(basic_auth_username(&HeaderMap::new()).is_none());
        assert!(basic_auth_username(&basic("Bearer abc")).is_none());
        assert!(basic_auth_username(&basic("Basic !!!")).is_none());
        // "nocolon"
        assert!(basic_auth_username(&basic("Basic bm9jb2xvbg==")).is_none());
    }

    #[test]
    fn test_parse_bool_lenient() {
        for truthy in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(parse_bool_lenient(Some(&truthy.to_string())), "{truthy}");
        }
        for falsy in ["0", "false", "yes", "", "tRuE"] {
            assert!(!parse_bool_lenient(Some(&falsy.to_string())), "{falsy}");
        }
        assert!(!parse_bool_lenient(None));
    }

    #[test]
    fn test_subject_from_body() {
        let subject = subject_from_body(br#"{"username": "userABC", "password": "x"}"#);
        assert_eq!(subject.as_deref(), Some("userABC"));

        let subject = subject_from_body(br#"{"username": "userABC"} trailing"#);
        assert_eq!(subject.as_deref(), Some("userABC"));

        assert_eq!(subject_from_body(b"null").as_deref(), Some(""));
        assert_eq!(subject_from_body(br#"{"username": null}"#).as_deref(), Some(""));
        assert_eq!(subject_from_body(b"{}").as_deref(), Some(""));
    }

    #[test]
    fn test_subject_from_body_rejects_malformed() {
        assert!(subject_from_body(b"").is_none());
        assert!(subject_from_body(b"   ").is_none());
        assert!(subject_from_body(b"not json").is_none());
        assert!(subject_from_body(b"[1, 2]").is_none());
        assert!(subject_from_body(br#"{"username": 5}"#).is_none());
    }
}
