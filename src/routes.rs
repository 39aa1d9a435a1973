use crate::handlers::{health_check, itinerary_handler};
use axum::{Router, routing::get, routing::post};

/// Creates and configures all application routes
pub fn create_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/itinerary", post(itinerary_handler))
}
