//! Axum route handlers for the Search API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::search::harvester::{HarvestOptions, HarvestReport};
use crate::session::SearchSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub fingerprint: String,
    #[serde(default = "default_remote_only")]
    pub remote_only: bool,
}

fn default_remote_only() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub fingerprint: String,
    pub queries: Vec<String>,
    /// An empty `links` list is the "no results" outcome, not an error.
    #[serde(flatten)]
    pub report: HarvestReport,
}

/// POST /api/v1/search
///
/// Runs the ATS queries for a previously analyzed profile and returns the
/// links that survived validation. A provider failure yields partial results
/// plus a `warning`, never an error status.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let cached = state
        .profiles
        .get(&request.fingerprint)
        .await
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No profile cached for {}; upload the resume first",
                request.fingerprint
            ))
        })?;

    let session = SearchSession::new(cached, request.remote_only);
    let queries = session.queries();
    let options = HarvestOptions {
        results_per_query: state.config.search_results_per_query,
        recent_only: state.config.search_recent_only,
        delay: state.config.search_delay,
    };

    let report = session
        .harvest(
            &queries,
            state.search.as_ref(),
            &state.link_checker,
            &options,
            |progress| {
                info!(
                    "Search progress: {}/{} queries ({:.0}%)",
                    progress.completed,
                    progress.total,
                    progress.fraction() * 100.0
                )
            },
        )
        .await;

    Ok(Json(SearchResponse {
        fingerprint: session.fingerprint,
        queries,
        report,
    }))
}
