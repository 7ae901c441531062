pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::profile::handlers as profile_handlers;
use crate::search::handlers as search_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Profile API
        .route(
            "/api/v1/profiles",
            post(profile_handlers::handle_analyze_upload),
        )
        .route(
            "/api/v1/profiles/:fingerprint",
            get(profile_handlers::handle_get_profile)
                .delete(profile_handlers::handle_invalidate_profile),
        )
        // Search API
        .route("/api/v1/search", post(search_handlers::handle_search))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
