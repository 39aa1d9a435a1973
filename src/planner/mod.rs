pub mod assemble;
pub mod currency;
pub mod enrich;
pub mod generate;
pub mod parse;
pub mod prompt;
pub mod retry;
pub mod validate;

use std::time::Duration;

use chrono::NaiveDate;

use crate::app::AppState;
use crate::error::PlanError;
use crate::models::{ItineraryDocument, ItineraryRequest, TransportMode};

/// A validated trip request. Created once per inbound call, immutable from
/// then on; `budget` is still in the request currency until normalization.
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub source: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub people: u32,
    pub budget: f64,
    pub transport: TransportMode,
    /// Inclusive day span of the trip, always >= 1.
    pub day_count: u32,
}

/// Runs the full generation pipeline for one request:
/// validate -> normalize -> prompt -> retry{generate -> parse} -> enrich -> assemble.
///
/// The prompt is built once; retries reuse it since it is deterministic.
/// Enrichment cannot fail the request, so everything after a successful
/// retry loop is infallible.
pub async fn plan_itinerary(
    state: &AppState,
    raw: &ItineraryRequest,
) -> Result<ItineraryDocument, PlanError> {
    let trip = validate::validate_request(raw)?;
    let budget_inr = currency::normalize(trip.budget, state.config.exchange_rate);

    let prompt = prompt::build_prompt(&trip, budget_inr);
    let policy = retry::RetryPolicy {
        max_attempts: retry::MAX_ATTEMPTS,
        base_delay: Duration::from_millis(state.config.retry_base_delay_ms),
    };
    let document =
        retry::generate_with_retry(state.generator.as_ref(), &prompt, trip.day_count, &policy)
            .await?;

    let images = enrich::resolve_images(&document, state.images.as_ref(), &trip.destination).await;
    Ok(assemble::merge_images(document, images))
}
