//! Vehicle search handlers
//!
//! Exact, case-sensitive lookups by VIN, license plate and NFT token id.

use axum::{
    extract::{Path, State},
    Json,
};
use vinledger_core::Vehicle;

use crate::error::ApiError;
use crate::handlers::AppState;

/// Find a vehicle by VIN
#[utoipa::path(
    get,
    path = "/api/search/vin/{vin}",
    tag = "Search",
    params(
        ("vin" = String, Path, description = "Vehicle identification number (exact match)")
    ),
    responses(
        (status = 200, description = "Vehicle found", body = Vehicle),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn search_by_vin_handler(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Result<Json<Vehicle>, ApiError> {
    found(state.storage.vehicle_by_vin(&vin))
}

/// Find a vehicle by license plate
#[utoipa::path(
    get,
    path = "/api/search/plates/{plates}",
    tag = "Search",
    params(
        ("plates" = String, Path, description = "License plate (exact match)")
    ),
    responses(
        (status = 200, description = "Vehicle found", body = Vehicle),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn search_by_plates_handler(
    State(state): State<AppState>,
    Path(plates): Path<String>,
) -> Result<Json<Vehicle>, ApiError> {
    found(state.storage.vehicle_by_plates(&plates))
}

/// Find a vehicle by NFT token id
#[utoipa::path(
    get,
    path = "/api/search/nft/{nft_id}",
    tag = "Search",
    params(
        ("nft_id" = String, Path, description = "NFT token id")
    ),
    responses(
        (status = 200, description = "Vehicle found", body = Vehicle),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn search_by_nft_handler(
    State(state): State<AppState>,
    Path(nft_id): Path<String>,
) -> Result<Json<Vehicle>, ApiError> {
    found(state.storage.vehicle_by_nft_id(&nft_id))
}

fn found(vehicle: Option<Vehicle>) -> Result<Json<Vehicle>, ApiError> {
    vehicle
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Vehicle not found"))
}
