//! Authority handlers
//!
//! Authority registration and the demo login. Login only checks that the
//! authority exists and that some access key was sent; the returned token
//! is a fixed placeholder that no endpoint validates.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use vinledger_core::{Authority, NewAuthority};

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::validation::{is_provided, json_body};

/// Placeholder session token handed out on login
pub const MOCK_SESSION_TOKEN: &str = "mock_jwt_token";

/// Login request
///
/// Both fields are loosely typed: a non-string authority code matches no
/// authority, and any non-empty, non-zero access key is accepted.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Authority code
    #[schema(value_type = String, example = "AUTH001")]
    pub authority_id: Option<Value>,
    /// Access key
    #[schema(value_type = String, example = "secret")]
    pub access_key: Option<Value>,
}

/// Login response
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub authority: Authority,
    /// Placeholder token
    #[schema(example = "mock_jwt_token")]
    pub token: String,
}

/// Register an authority
#[utoipa::path(
    post,
    path = "/api/authorities",
    tag = "Authorities",
    request_body = NewAuthority,
    responses(
        (status = 200, description = "Authority registered", body = Authority),
        (status = 400, description = "Invalid authority data or duplicate authority code")
    )
)]
pub async fn register_authority_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewAuthority>, JsonRejection>,
) -> Result<Json<Authority>, ApiError> {
    let input = json_body(payload, "Invalid authority data")?;
    let authority = state.storage.register_authority(input)?;
    Ok(Json(authority))
}

/// Log in as an authority
#[utoipa::path(
    post,
    path = "/api/authorities/login",
    tag = "Authorities",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Invalid login data"),
        (status = 401, description = "Unknown authority or missing access key")
    )
)]
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let request = json_body(payload, "Invalid login data")?;

    let authority = request
        .authority_id
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|code| state.storage.authority_by_code(code))
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !is_provided(request.access_key.as_ref()) {
        return Err(ApiError::unauthorized("Access key required"));
    }

    tracing::info!(code = %authority.authority_id, "Authority logged in");

    Ok(Json(LoginResponse {
        authority,
        token: MOCK_SESSION_TOKEN.to_string(),
    }))
}
