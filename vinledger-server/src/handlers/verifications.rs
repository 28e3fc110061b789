//! Verification handler
//!
//! Records a verification event. The referenced vehicle is not required
//! to exist.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use vinledger_core::{NewVerification, Verification};

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::validation::json_body;

/// Record a verification
#[utoipa::path(
    post,
    path = "/api/verifications",
    tag = "Verifications",
    request_body = NewVerification,
    responses(
        (status = 200, description = "Verification recorded", body = Verification),
        (status = 400, description = "Invalid verification data")
    )
)]
pub async fn create_verification_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewVerification>, JsonRejection>,
) -> Result<Json<Verification>, ApiError> {
    let input = json_body(payload, "Invalid verification data")?;
    Ok(Json(state.storage.create_verification(input)))
}
