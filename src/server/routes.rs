//! Route definitions for the API server

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Creates the main application router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    // The dashboard front end is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/dataset", get(handlers::dataset_info))
        .route("/summaries", get(handlers::get_summaries))
        .route("/summaries/weather", get(handlers::get_weather))
        .route("/summaries/season", get(handlers::get_season))
        .route("/summaries/timeline", get(handlers::get_timeline))
        .route("/summaries/hourly", get(handlers::get_hourly))
        .route("/summaries/riders", get(handlers::get_riders))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
