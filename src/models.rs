use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request payload for the itinerary endpoint.
///
/// `people` and `budget` are kept as raw JSON values because clients send
/// them either as numbers or as numeric strings; coercion and range checks
/// happen in the request validator so that every malformed field surfaces
/// as the same 400 response.
#[derive(Debug, Clone, Deserialize)]
pub struct ItineraryRequest {
    pub source: String,
    pub destination: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
    pub people: Value,
    pub budget: Value,
    pub transport: String,
}

/// The structured trip plan returned to the caller.
///
/// These types derive `Serialize` only: the language model's raw output is
/// untrusted and is validated field-by-field into this shape by the
/// response parser, never deserialized directly.
#[derive(Debug, Clone, Serialize)]
pub struct ItineraryDocument {
    pub title: String,
    pub details: String,
    pub days: Vec<DayPlan>,
    pub suggested_hotels: Vec<HotelSuggestion>,
    pub suggested_transport: Vec<TransportOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayPlan {
    pub day: u32,
    pub title: String,
    pub activities: Vec<Activity>,
    #[serde(rename = "foodSuggestion")]
    pub food_suggestion: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    pub time: String,
    pub name: String,
    pub description: String,
    pub rating: f64,
    pub positive_review: String,
    pub negative_review: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HotelSuggestion {
    pub name: String,
    pub price_per_night: f64,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransportOption {
    pub name: String,
    pub price_per_person: f64,
    pub rating: f64,
    pub duration: String,
}

/// Transport preference accepted on the inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Flight,
    Train,
    Car,
    Bus,
}

impl TransportMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "flight" => Some(Self::Flight),
            "train" => Some(Self::Train),
            "car" => Some(Self::Car),
            "bus" => Some(Self::Bus),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flight => "Flight",
            Self::Train => "Train",
            Self::Car => "Car",
            Self::Bus => "Bus",
        }
    }
}

/// Response payload for the health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Service is healthy".to_string(),
        }
    }
}
