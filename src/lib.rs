pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

// Re-export key functions for convenience
pub mod planner;
pub use app::{AppState, create_app, init_tracing, router_with_state};
