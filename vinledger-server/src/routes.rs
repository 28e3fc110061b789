//! Router configuration module
//!
//! Configures all routes, middleware layers, and creates the application router.

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, patch, post},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::handlers::{
    create_verification_handler, get_vehicle_handler, health, list_vehicles_handler,
    login_handler, ready, register_authority_handler, register_vehicle_handler,
    search_by_nft_handler, search_by_plates_handler, search_by_vin_handler, statistics_handler,
    update_status_handler, vehicle_qr_handler, vehicle_verifications_handler, AppState,
};
use crate::openapi::ApiDoc;

/// Create the application router with default config (for testing)
pub fn create_router() -> Router {
    create_router_with_config(&Config::default())
}

/// Create the application router with custom configuration
///
/// Builds a fresh in-memory registry, seeded when the configuration asks for it.
pub fn create_router_with_config(config: &Config) -> Router {
    create_router_with_state(config, AppState::from_config(config))
}

/// Create the application router around existing state
pub fn create_router_with_state(config: &Config, state: AppState) -> Router {
    // Configure CORS based on allowed_origins
    let cors = match &config.allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            tracing::info!("CORS: Restricting to {} origin(s)", origins.len());
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        }
        _ => {
            tracing::warn!("CORS: Allowing all origins (dev mode)");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    // Request body limit
    let body_limit = RequestBodyLimitLayer::new(config.body_limit_kb * 1024);

    // Request timeout
    let timeout = TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(config.timeout_secs),
    );

    let api = Router::new()
        .route(
            "/api/vehicles",
            post(register_vehicle_handler).get(list_vehicles_handler),
        )
        .route("/api/vehicles/{id}", get(get_vehicle_handler))
        .route("/api/vehicles/{id}/status", patch(update_status_handler))
        .route(
            "/api/vehicles/{id}/verifications",
            get(vehicle_verifications_handler),
        )
        .route("/api/vehicles/{id}/qr", get(vehicle_qr_handler))
        .route("/api/search/vin/{vin}", get(search_by_vin_handler))
        .route("/api/search/plates/{plates}", get(search_by_plates_handler))
        .route("/api/search/nft/{nft_id}", get(search_by_nft_handler))
        .route("/api/authorities", post(register_authority_handler))
        .route("/api/authorities/login", post(login_handler))
        .route("/api/verifications", post(create_verification_handler))
        .route("/api/statistics", get(statistics_handler))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .with_state(state);

    // Base router with common layers
    let router = api
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(body_limit)
        .layer(timeout)
        .layer(PropagateRequestIdLayer::x_request_id());

    // Conditionally apply rate limiting (disabled in tests, enabled in production)
    let router = if config.rate_limit_enabled {
        match GovernorConfigBuilder::default()
            .per_second(config.rate_limit_per_sec)
            .burst_size(config.rate_limit_burst)
            .finish()
        {
            Some(governor_conf) => {
                tracing::info!(
                    "Rate limiting: {} req/s (burst: {})",
                    config.rate_limit_per_sec,
                    config.rate_limit_burst
                );
                router.layer(GovernorLayer::new(Arc::new(governor_conf)))
            }
            None => {
                tracing::error!(
                    "Rate limiting: invalid settings ({} req/s, burst {}), DISABLED",
                    config.rate_limit_per_sec,
                    config.rate_limit_burst
                );
                router
            }
        }
    } else {
        tracing::warn!("Rate limiting: DISABLED");
        router
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
