pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use rest::{
    analyze_entry_handler, create_entry_handler, delete_entry_handler, get_entry_handler,
    insights_handler, list_entries_handler, record_entry_handler, ApiDoc,
};
pub use state::AppState;

/// Request bodies are small JSON documents; anything larger is rejected.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the `/api` router over the shared state.
pub fn api_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/analyze-entry", post(analyze_entry_handler))
        .route("/api/record-entry", post(record_entry_handler))
        .route(
            "/api/journal-entries",
            get(list_entries_handler).post(create_entry_handler),
        )
        .route(
            "/api/journal-entries/{id}",
            get(get_entry_handler).delete(delete_entry_handler),
        )
        .route("/api/insights", get(insights_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
