use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Chat
        .route("/api/chatbot/select_data", post(handlers::select_data))
        .route("/api/chatbot/generate_response", post(handlers::generate_response))

        // Catalog
        .route("/api/geo_json_data", get(handlers::list_datasets))
        .route("/api/geo_json_data/statistics", get(handlers::catalog_statistics))
        .route("/api/geo_json_data/rescan", post(handlers::rescan_catalog))
        .route("/api/geo_json_data/{name}", get(handlers::show_dataset))

        // Filters
        .route("/api/filters/fields", get(handlers::filter_fields))
        .route("/api/filters/apply", post(handlers::apply_filters))
        .route("/api/filters/clear", post(handlers::clear_filters))

        // External maps
        .route("/api/google_maps/search", post(handlers::maps_search))

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
