use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Generic message returned to clients on any server-side failure.
/// Raw provider errors and model output stay in the logs only.
const GENERIC_FAILURE_MESSAGE: &str = "Itinerary generation failed. Please try again later.";

/// Failure taxonomy of the itinerary pipeline.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Malformed or impossible request. Surfaced as a 400, never retried.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Generation service temporarily unavailable. Retried.
    #[error("generation service unavailable: {0}")]
    Transient(String),

    /// Model output failed structural validation. Retried, since a later
    /// attempt may produce a conforming document.
    #[error("generated itinerary failed validation: {0}")]
    Schema(String),

    /// Non-recoverable service failure (auth, quota). Not retried.
    #[error("generation service rejected the request: {0}")]
    Fatal(String),

    /// The retry budget is spent. Carries the last attempt's failure.
    #[error("itinerary generation failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

impl PlanError {
    /// Whether the retry controller may spend another attempt on this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PlanError::Transient(_) | PlanError::Schema(_))
    }
}

/// Custom error type for the application
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    InternalServerError(String),
    ValidationError(String),
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::InternalServerError(msg) => {
                error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    msg,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::Validation(msg) => AppError::ValidationError(msg),
            other => {
                // Log the real failure; the client gets the generic message.
                error!("Itinerary pipeline failed: {}", other);
                AppError::InternalServerError(GENERIC_FAILURE_MESSAGE.to_string())
            }
        }
    }
}

/// Result type for application handlers
pub type AppResult<T> = Result<T, AppError>;
