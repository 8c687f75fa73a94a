use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{AppState, register_for_event, return_item, search_holdings};

/// Creates the API router with all library endpoints
///
/// Command endpoints (Write operations):
/// - POST /events/:event_id/signups - Register a patron for an event
/// - POST /checkouts/:checkout_id/return - Return a checked-out item
///
/// Query endpoints (Read operations):
/// - GET /holdings?last_name=..&branch=.. - Search holdings by contributor and branch
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Command endpoints (Write operations)
        .route("/events/:event_id/signups", post(register_for_event))
        .route("/checkouts/:checkout_id/return", post(return_item))
        // Query endpoints (Read operations)
        .route("/holdings", get(search_holdings))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
