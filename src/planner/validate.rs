use chrono::NaiveDate;
use serde_json::Value;

use super::TripRequest;
use crate::error::PlanError;
use crate::models::{ItineraryRequest, TransportMode};

/// Validates the raw request fields and derives the trip duration.
///
/// Every rejection here is a `PlanError::Validation`, surfaced as a 400 and
/// never retried; the generation client is not touched for invalid input.
pub fn validate_request(raw: &ItineraryRequest) -> Result<TripRequest, PlanError> {
    let source = raw.source.trim();
    if source.is_empty() {
        return Err(PlanError::Validation("Source cannot be empty".to_string()));
    }
    let destination = raw.destination.trim();
    if destination.is_empty() {
        return Err(PlanError::Validation(
            "Destination cannot be empty".to_string(),
        ));
    }

    let start_date = parse_date(&raw.start_date, "startDate")?;
    let end_date = parse_date(&raw.end_date, "endDate")?;
    if end_date < start_date {
        return Err(PlanError::Validation(
            "End date must be after start date".to_string(),
        ));
    }

    let people = coerce_number(&raw.people, "people")?;
    if people.fract() != 0.0 || people < 1.0 {
        return Err(PlanError::Validation(
            "people must be a whole number of at least 1".to_string(),
        ));
    }

    let budget = coerce_number(&raw.budget, "budget")?;

    let transport = TransportMode::parse(&raw.transport).ok_or_else(|| {
        PlanError::Validation(format!(
            "transport must be one of Flight, Train, Car, Bus (got '{}')",
            raw.transport
        ))
    })?;

    // Inclusive span: a same-day trip counts as one day.
    let day_count = (end_date - start_date).num_days() + 1;
    if day_count < 1 {
        return Err(PlanError::Validation(
            "Trip must span at least one day".to_string(),
        ));
    }

    Ok(TripRequest {
        source: source.to_string(),
        destination: destination.to_string(),
        start_date,
        end_date,
        people: people as u32,
        budget,
        transport,
        day_count: day_count as u32,
    })
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, PlanError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| PlanError::Validation(format!("{field} must be a date in YYYY-MM-DD format")))
}

/// Accepts a JSON number or a numeric string, rejecting anything else and
/// anything negative.
fn coerce_number(value: &Value, field: &str) -> Result<f64, PlanError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(PlanError::Validation(format!(
            "{field} must be a non-negative number"
        ))),
    }
}
