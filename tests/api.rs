use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use rs_trip_svc::app::{AppState, router_with_state};
use rs_trip_svc::config::Config;
use rs_trip_svc::error::PlanError;
use rs_trip_svc::planner::enrich::ImageSearch;
use rs_trip_svc::planner::generate::ItineraryGenerator;

fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        openrouter_api_key: "test-openrouter-key".to_string(),
        serper_api_key: "test-serper-key".to_string(),
        generation_model: "openai/gpt-4o-mini".to_string(),
        exchange_rate: 83.5,
        retry_base_delay_ms: 0,
    }
}

fn build_app(generator: Arc<dyn ItineraryGenerator>, images: Arc<dyn ImageSearch>) -> Router {
    router_with_state(Arc::new(AppState {
        config: test_config(),
        generator,
        images,
    }))
}

fn three_day_document() -> String {
    let days: Vec<Value> = (1..=3)
        .map(|day| {
            json!({
                "day": day,
                "title": format!("Day {day} in Goa"),
                "activities": [
                    {
                        "time": "09:00 AM",
                        "name": format!("Beach stop {day}"),
                        "description": "Swim and sunbathe",
                        "rating": 4.3,
                        "positive_review": "Clean sand and calm water",
                        "negative_review": "Parking fills up early"
                    },
                    {
                        "time": "04:00 PM",
                        "name": format!("Market walk {day}"),
                        "description": "Local shopping",
                        "rating": 4.0,
                        "positive_review": "Great bargains",
                        "negative_review": "Can get noisy"
                    }
                ],
                "foodSuggestion": "Fish thali at a beach shack"
            })
        })
        .collect();
    json!({
        "title": "Goa Getaway",
        "details": "Three relaxed days along the north Goa coastline.",
        "days": days,
        "suggested_hotels": [
            { "name": "Taj Holiday Village", "price_per_night": 12500.0, "rating": 4.6 },
            { "name": "Casa Vagator", "price_per_night": 4200.0, "rating": 4.2 }
        ],
        "suggested_transport": [
            { "name": "IndiGo 6E-204", "price_per_person": 5800.0, "rating": 4.1, "duration": "2h 30m" }
        ]
    })
    .to_string()
}

fn itinerary_request() -> Value {
    json!({
        "source": "Delhi",
        "destination": "Goa",
        "startDate": "2024-02-01",
        "endDate": "2024-02-03",
        "people": 2,
        "budget": 200,
        "transport": "Flight"
    })
}

async fn post_itinerary(app: Router, payload: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/itinerary")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: Value = serde_json::from_slice(&body).unwrap();
    (status, parsed)
}

struct CannedGenerator {
    body: String,
    calls: AtomicU32,
}

impl CannedGenerator {
    fn new(body: String) -> Self {
        Self {
            body,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl ItineraryGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, PlanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }
}

struct UnavailableGenerator {
    calls: AtomicU32,
}

#[async_trait]
impl ItineraryGenerator for UnavailableGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, PlanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(PlanError::Transient(
            "503 service unavailable".to_string(),
        ))
    }
}

struct RevokedKeyGenerator {
    calls: AtomicU32,
}

#[async_trait]
impl ItineraryGenerator for RevokedKeyGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, PlanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(PlanError::Fatal("401 invalid api key".to_string()))
    }
}

/// Finds nothing, ever; enrichment must fall back to placeholders.
struct NoImages;

#[async_trait]
impl ImageSearch for NoImages {
    async fn find_image(&self, _query: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
}

struct BrokenImages;

#[async_trait]
impl ImageSearch for BrokenImages {
    async fn find_image(&self, _query: &str) -> anyhow::Result<Option<String>> {
        Err(anyhow::anyhow!("image service down"))
    }
}

#[tokio::test]
async fn health_is_ok() {
    let app = build_app(
        Arc::new(CannedGenerator::new(three_day_document())),
        Arc::new(NoImages),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn generates_a_full_itinerary() {
    let app = build_app(
        Arc::new(CannedGenerator::new(three_day_document())),
        Arc::new(NoImages),
    );

    let (status, body) = post_itinerary(app, itinerary_request()).await;
    assert_eq!(status, StatusCode::OK);

    let days = body["days"].as_array().unwrap();
    assert_eq!(days.len(), 3);
    for day in days {
        for activity in day["activities"].as_array().unwrap() {
            assert!(activity["rating"].is_number());
            let image_url = activity["image_url"].as_str().unwrap();
            assert!(!image_url.is_empty());
        }
    }
    for hotel in body["suggested_hotels"].as_array().unwrap() {
        assert!(hotel["price_per_night"].is_number());
        assert!(hotel["rating"].is_number());
        let image_url = hotel["image_url"].as_str().unwrap();
        assert!(!image_url.is_empty());
    }
    for option in body["suggested_transport"].as_array().unwrap() {
        assert!(option["price_per_person"].is_number());
    }
}

#[tokio::test]
async fn fenced_model_output_is_accepted() {
    let fenced = format!("```json\n{}\n```", three_day_document());
    let app = build_app(Arc::new(CannedGenerator::new(fenced)), Arc::new(NoImages));

    let (status, body) = post_itinerary(app, itinerary_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn image_service_outage_still_yields_full_document() {
    let app = build_app(
        Arc::new(CannedGenerator::new(three_day_document())),
        Arc::new(BrokenImages),
    );

    let (status, body) = post_itinerary(app, itinerary_request()).await;
    assert_eq!(status, StatusCode::OK);
    for day in body["days"].as_array().unwrap() {
        for activity in day["activities"].as_array().unwrap() {
            let image_url = activity["image_url"].as_str().unwrap();
            assert!(image_url.starts_with("https://placehold.co/"));
        }
    }
}

#[tokio::test]
async fn inverted_dates_are_rejected_with_400() {
    let generator = Arc::new(CannedGenerator::new(three_day_document()));
    let app = build_app(generator.clone(), Arc::new(NoImages));

    let mut payload = itinerary_request();
    payload["startDate"] = json!("2024-02-03");
    payload["endDate"] = json!("2024-02-01");

    let (status, body) = post_itinerary(app, payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"].as_str().unwrap(),
        "End date must be after start date"
    );
    // The generator is never consulted for an invalid request.
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn numeric_strings_in_the_request_are_coerced() {
    let app = build_app(
        Arc::new(CannedGenerator::new(three_day_document())),
        Arc::new(NoImages),
    );

    let mut payload = itinerary_request();
    payload["people"] = json!("2");
    payload["budget"] = json!("200");

    let (status, _body) = post_itinerary(app, payload).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn exhausted_retries_return_a_generic_500() {
    let generator = Arc::new(UnavailableGenerator {
        calls: AtomicU32::new(0),
    });
    let app = build_app(generator.clone(), Arc::new(NoImages));

    let (status, body) = post_itinerary(app, itinerary_request()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["message"].as_str().unwrap();
    assert!(!message.contains("503"));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn fatal_provider_errors_fail_fast() {
    let generator = Arc::new(RevokedKeyGenerator {
        calls: AtomicU32::new(0),
    });
    let app = build_app(generator.clone(), Arc::new(NoImages));

    let (status, body) = post_itinerary(app, itinerary_request()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["message"].as_str().unwrap();
    assert!(!message.contains("api key"));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn wrong_day_count_from_the_model_exhausts_retries() {
    // The model keeps answering with 3 days for a 2-day trip.
    let generator = Arc::new(CannedGenerator::new(three_day_document()));
    let app = build_app(generator.clone(), Arc::new(NoImages));

    let mut payload = itinerary_request();
    payload["endDate"] = json!("2024-02-02");

    let (status, _body) = post_itinerary(app, payload).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
}
