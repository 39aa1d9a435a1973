use std::sync::Arc;

use axum::{Extension, Router};
use tower_http::cors::CorsLayer;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::planner::enrich::{ImageSearch, SerperImageSearch};
use crate::planner::generate::{ItineraryGenerator, OpenRouterGenerator};
use crate::routes::create_routes;

/// Initialize tracing and logging for the application
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rs_trip_svc=info,tower_http=debug,axum::rejection=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Read-only state shared by every request: the configuration plus the two
/// outbound clients. Built once at startup; requests hold nothing else in
/// common.
pub struct AppState {
    pub config: Config,
    pub generator: Arc<dyn ItineraryGenerator>,
    pub images: Arc<dyn ImageSearch>,
}

/// Create and configure the Axum application with all routes and middleware
pub fn create_app(config: Config) -> Router {
    info!("Initializing application router");

    let generator = OpenRouterGenerator::new(
        config.openrouter_api_key.clone(),
        config.generation_model.clone(),
    );
    let images = SerperImageSearch::new(config.serper_api_key.clone());

    router_with_state(Arc::new(AppState {
        config,
        generator: Arc::new(generator),
        images: Arc::new(images),
    }))
}

/// Router assembly, separated from client construction so tests can inject
/// stub generators and image searchers.
pub fn router_with_state(state: Arc<AppState>) -> Router {
    create_routes()
        .layer(Extension(state))
        .layer(CorsLayer::permissive())
}
