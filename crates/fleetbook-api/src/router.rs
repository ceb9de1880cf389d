//! Route definitions for the Fleetbook HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(booking_routes())
        .merge(webhook_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors_allowed_origins);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Booking endpoints: holds, staff bookings, cancel, list, availability
fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings/hold", post(handlers::booking::create_hold))
        .route("/bookings", post(handlers::booking::create_booking))
        .route("/bookings", get(handlers::booking::list_bookings))
        .route(
            "/bookings/{id}/cancel",
            post(handlers::booking::cancel_booking),
        )
        .route(
            "/assets/{id}/availability",
            get(handlers::booking::availability),
        )
}

/// Payment provider callback
fn webhook_routes() -> Router<AppState> {
    Router::new().route("/webhooks/payment", post(handlers::webhook::payment_webhook))
}

/// Health endpoint
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Builds a CORS tower layer from the configured origins.
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let mut layer = CorsLayer::new();

    if allowed_origins.iter().any(|o| o == "*") {
        layer = layer.allow_origin(Any).allow_methods(Any).allow_headers(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer
            .allow_origin(origins)
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request());
    }

    layer
}
