use axum::{extract::State, Json};
use vinledger_core::Statistics;

use crate::handlers::AppState;

/// Registry statistics
///
/// `totalScans` and `activeUsers` are estimates derived from the stored
/// counts, not measured values.
#[utoipa::path(
    get,
    path = "/api/statistics",
    tag = "Statistics",
    responses(
        (status = 200, description = "Current statistics", body = Statistics)
    )
)]
pub async fn statistics_handler(State(state): State<AppState>) -> Json<Statistics> {
    Json(state.storage.statistics())
}
