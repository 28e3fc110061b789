//! HTTP request handlers
//!
//! This module contains all the request handlers for the API endpoints.

pub mod authorities;
pub mod health;
pub mod search;
pub mod statistics;
pub mod vehicles;
pub mod verifications;

pub use crate::state::AppState;
pub use authorities::{
    login_handler, register_authority_handler, LoginRequest, LoginResponse, MOCK_SESSION_TOKEN,
};
pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use search::{search_by_nft_handler, search_by_plates_handler, search_by_vin_handler};
pub use statistics::statistics_handler;
pub use vehicles::{
    get_vehicle_handler, list_vehicles_handler, register_vehicle_handler, update_status_handler,
    vehicle_qr_handler, vehicle_verifications_handler, QrResponse, StatusUpdateRequest,
};
pub use verifications::create_verification_handler;
