//! Vehicle handlers
//!
//! Registration, retrieval, status transitions, verification history and
//! QR payloads for vehicles.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use vinledger_core::{
    qr_image_url, verification_url, NewVehicle, QrPayload, Vehicle, VehicleStatus, Verification,
    DEFAULT_QR_SIZE,
};

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::validation::{json_body, parse_record_id};

/// Request body for a status transition
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    /// New status: "active", "suspended" or "stolen"
    #[schema(value_type = String, example = "suspended")]
    pub status: Option<serde_json::Value>,
}

/// QR payload plus a rendered image link
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QrResponse {
    #[serde(flatten)]
    pub payload: QrPayload,
    /// Image URL rendering the JSON payload as a QR code
    #[schema(example = "https://api.qrserver.com/v1/create-qr-code/?size=128x128&data=...")]
    pub qr_image_url: String,
}

/// Register a vehicle
///
/// Assigns the id, a simulated NFT token id, the QR reference, status
/// `active` and the registration timestamp. VINs must be unique.
#[utoipa::path(
    post,
    path = "/api/vehicles",
    tag = "Vehicles",
    request_body = NewVehicle,
    responses(
        (status = 200, description = "Vehicle registered", body = Vehicle),
        (status = 400, description = "Invalid vehicle data or duplicate VIN")
    )
)]
pub async fn register_vehicle_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewVehicle>, JsonRejection>,
) -> Result<Json<Vehicle>, ApiError> {
    let input = json_body(payload, "Invalid vehicle data")?;
    let vehicle = state.storage.register_vehicle(input)?;
    Ok(Json(vehicle))
}

/// List all vehicles in registration order
#[utoipa::path(
    get,
    path = "/api/vehicles",
    tag = "Vehicles",
    responses(
        (status = 200, description = "All registered vehicles", body = [Vehicle])
    )
)]
pub async fn list_vehicles_handler(State(state): State<AppState>) -> Json<Vec<Vehicle>> {
    Json(state.storage.vehicles())
}

/// Get a vehicle by id
#[utoipa::path(
    get,
    path = "/api/vehicles/{id}",
    tag = "Vehicles",
    params(
        ("id" = String, Path, description = "Vehicle id")
    ),
    responses(
        (status = 200, description = "Vehicle found", body = Vehicle),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn get_vehicle_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vehicle>, ApiError> {
    find_vehicle(&state, &id).map(Json)
}

/// Change a vehicle's status
///
/// Intended for authorities: suspend a registration, report a theft, or
/// restore a vehicle to `active`. Only the status field changes.
#[utoipa::path(
    patch,
    path = "/api/vehicles/{id}/status",
    tag = "Vehicles",
    params(
        ("id" = String, Path, description = "Vehicle id")
    ),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated", body = Vehicle),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn update_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<Vehicle>, ApiError> {
    let request = json_body(payload, "Invalid request")?;

    let status: VehicleStatus = request
        .status
        .as_ref()
        .and_then(|value| value.as_str())
        .ok_or_else(|| ApiError::bad_request("Invalid status"))?
        .parse()?;

    parse_record_id(&id)
        .and_then(|id| state.storage.update_vehicle_status(id, status))
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Vehicle not found"))
}

/// List verifications recorded for a vehicle
///
/// Returns an empty list both for vehicles without verifications and for
/// ids that match no vehicle.
#[utoipa::path(
    get,
    path = "/api/vehicles/{id}/verifications",
    tag = "Verifications",
    params(
        ("id" = String, Path, description = "Vehicle id")
    ),
    responses(
        (status = 200, description = "Verifications, oldest first", body = [Verification])
    )
)]
pub async fn vehicle_verifications_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Vec<Verification>> {
    let verifications = parse_record_id(&id)
        .map(|id| state.storage.verifications_for_vehicle(id))
        .unwrap_or_default();
    Json(verifications)
}

/// Get the QR payload for a vehicle
///
/// The payload links to the public verification page. Its base URL is
/// `PUBLIC_BASE_URL` when configured, otherwise the request's Host header.
#[utoipa::path(
    get,
    path = "/api/vehicles/{id}/qr",
    tag = "Vehicles",
    params(
        ("id" = String, Path, description = "Vehicle id")
    ),
    responses(
        (status = 200, description = "QR payload", body = QrResponse),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn vehicle_qr_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<QrResponse>, ApiError> {
    let vehicle = find_vehicle(&state, &id)?;

    let base_url = state.public_base_url.clone().unwrap_or_else(|| {
        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("localhost");
        format!("http://{}", host)
    });

    let payload = QrPayload {
        verify_url: verification_url(&base_url, vehicle.id),
        vin: vehicle.vin,
        nft_id: vehicle.nft_id,
    };
    let encoded = serde_json::to_string(&payload)
        .map_err(|e| ApiError::internal(format!("Failed to encode QR payload: {}", e)))?;

    Ok(Json(QrResponse {
        qr_image_url: qr_image_url(&encoded, DEFAULT_QR_SIZE),
        payload,
    }))
}

fn find_vehicle(state: &AppState, id: &str) -> Result<Vehicle, ApiError> {
    parse_record_id(id)
        .and_then(|id| state.storage.vehicle(id))
        .ok_or_else(|| ApiError::not_found("Vehicle not found"))
}
