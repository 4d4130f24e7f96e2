pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::panels::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis panels
        .route("/api/v1/headline", post(handlers::handle_headline))
        .route("/api/v1/swot", post(handlers::handle_swot))
        .route("/api/v1/suitability", post(handlers::handle_suitability))
        .route("/api/v1/panels/:panel", get(handlers::handle_get_panel))
        .route(
            "/api/v1/panels/:panel/report",
            get(handlers::handle_panel_report),
        )
        // Documents
        .route("/api/v1/extract", post(handlers::handle_extract))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
