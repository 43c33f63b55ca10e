//! Router configuration for the HTTP adapter.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use super::AppState;
use super::handlers;

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Form UI
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // Gateway operations
        .route("/summarize", post(handlers::summarize))
        .route("/sentiment", post(handlers::sentiment))
        .route("/analyze", post(handlers::analyze))
        // Browser widgets hosted elsewhere call these routes directly
        .layer(CorsLayer::permissive())
        .with_state(state)
}
