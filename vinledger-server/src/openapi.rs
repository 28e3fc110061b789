//! OpenAPI documentation configuration
//!
//! Generates the OpenAPI 3.0 document for the VinLedger registry API.

use utoipa::OpenApi;
use vinledger_core::{
    AccessLevel, Authority, NewAuthority, NewVehicle, NewVerification, QrPayload, Statistics,
    Vehicle, VehicleStatus, Verification, VerificationResult,
};

use crate::handlers::{
    HealthResponse, LoginRequest, LoginResponse, QrResponse, ReadyResponse, StatusUpdateRequest,
};

/// VinLedger API - OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "VinLedger - Vehicle Registry API",
        version = "0.1.0",
        description = r#"
## Vehicle Registration and Verification

VinLedger keeps a registry of vehicles, the authorities that supervise them,
and the verification checks performed against them.

- Every registered vehicle receives a **simulated NFT token id** and a QR reference
- Vehicles can be found by **VIN**, **license plate** or **NFT token id**
- Authorities can **suspend** a registration or flag a vehicle as **stolen**
- Each check of a vehicle is recorded as a **verification**

### How It Works

1. **Register** a vehicle via `POST /api/vehicles`
2. Print the payload from `GET /api/vehicles/{id}/qr` as a QR code
3. A scanner looks the vehicle up and **records** the outcome via `POST /api/verifications`
4. `GET /api/statistics` summarises registry activity

The NFT layer and the authority login are demonstration mocks: no token is
minted on any chain and the login token is not checked by any endpoint.
"#,
        license(name = "MIT OR Apache-2.0")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    tags(
        (name = "Vehicles", description = "Register vehicles, read them back and change their status"),
        (name = "Search", description = "Exact lookups by VIN, license plate or NFT token id"),
        (name = "Authorities", description = "Authority registration and demo login"),
        (name = "Verifications", description = "Record and list vehicle verifications"),
        (name = "Statistics", description = "Registry activity summary"),
        (name = "Health", description = "Service health and readiness endpoints")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::health::ready,
        crate::handlers::vehicles::register_vehicle_handler,
        crate::handlers::vehicles::list_vehicles_handler,
        crate::handlers::vehicles::get_vehicle_handler,
        crate::handlers::vehicles::update_status_handler,
        crate::handlers::vehicles::vehicle_verifications_handler,
        crate::handlers::vehicles::vehicle_qr_handler,
        crate::handlers::search::search_by_vin_handler,
        crate::handlers::search::search_by_plates_handler,
        crate::handlers::search::search_by_nft_handler,
        crate::handlers::authorities::register_authority_handler,
        crate::handlers::authorities::login_handler,
        crate::handlers::verifications::create_verification_handler,
        crate::handlers::statistics::statistics_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ReadyResponse,
            Vehicle,
            NewVehicle,
            VehicleStatus,
            StatusUpdateRequest,
            QrPayload,
            QrResponse,
            Authority,
            NewAuthority,
            AccessLevel,
            LoginRequest,
            LoginResponse,
            Verification,
            NewVerification,
            VerificationResult,
            Statistics,
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/vehicles",
            "/api/vehicles/{id}",
            "/api/vehicles/{id}/status",
            "/api/vehicles/{id}/verifications",
            "/api/vehicles/{id}/qr",
            "/api/search/vin/{vin}",
            "/api/search/plates/{plates}",
            "/api/search/nft/{nft_id}",
            "/api/authorities",
            "/api/authorities/login",
            "/api/verifications",
            "/api/statistics",
            "/health",
            "/ready",
        ] {
            assert!(paths.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_document_serializes() {
        let json = ApiDoc::openapi()
            .to_json()
            .expect("OpenAPI document should serialize");
        assert!(json.contains("VinLedger"));
        assert!(json.contains("\"Vehicle\""));
    }
}
