//! Route definitions for the Field Trial Analytics Platform

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Analysis sessions
        .nest("/sessions", session_routes())
}

/// Analysis session routes
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_session))
        .route(
            "/:session_id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/:session_id/records", put(handlers::load_records))
        .route(
            "/:session_id/comparisons",
            post(handlers::run_comparisons).get(handlers::list_comparisons),
        )
        .route(
            "/:session_id/comparisons/csv",
            get(handlers::export_comparisons),
        )
        .route("/:session_id/summary/pair", get(handlers::pair_summary))
        .route("/:session_id/summary/group", post(handlers::group_summary))
        .route(
            "/:session_id/benchmarks",
            get(handlers::get_site_benchmarks),
        )
}
