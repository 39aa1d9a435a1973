use std::sync::Arc;

use axum::{Extension, extract::Json, response::Json as ResponseJson};
use tracing::{debug, info};

use crate::app::AppState;
use crate::error::AppResult;
use crate::models::{HealthResponse, ItineraryDocument, ItineraryRequest};
use crate::planner;

/// Health check handler
/// Returns the service status and health information
pub async fn health_check() -> AppResult<ResponseJson<HealthResponse>> {
    debug!("Health check endpoint called");
    Ok(ResponseJson(HealthResponse::ok()))
}

/// Itinerary handler: runs the full generation pipeline for one request.
/// Validation failures come back as 400; everything else the pipeline can
/// surface maps to a generic 500 in the error layer.
pub async fn itinerary_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<ItineraryRequest>,
) -> AppResult<ResponseJson<ItineraryDocument>> {
    info!(
        "Itinerary requested: {} -> {}",
        payload.source, payload.destination
    );

    let document = planner::plan_itinerary(&state, &payload).await?;

    info!(
        "Returning itinerary '{}' with {} days",
        document.title,
        document.days.len()
    );
    Ok(ResponseJson(document))
}
