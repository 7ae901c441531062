mod config;
mod errors;
mod extract;
mod llm_client;
mod profile;
mod routes;
mod search;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::profile::cache::ProfileCache;
use crate::routes::build_router;
use crate::search::links::LinkChecker;
use crate::search::provider::DuckDuckGoSearch;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scout API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(&config.gemini_api_url, config.analysis_timeout)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    if config.gemini_api_key.is_some() {
        info!("Gemini API key loaded from environment");
    } else {
        info!("No GEMINI_API_KEY set; clients must send api_key with each upload");
    }

    // Initialize search provider and link checker
    let search = Arc::new(DuckDuckGoSearch::new(
        &config.search_api_url,
        config.search_timeout,
    )?);
    let link_checker = LinkChecker::new(config.link_check_timeout)?;
    info!(
        "Search: {} ({} results/query, recent_only={}, delay={}ms)",
        config.search_api_url,
        config.search_results_per_query,
        config.search_recent_only,
        config.search_delay.as_millis()
    );

    // Build app state
    let state = AppState {
        llm,
        search,
        link_checker,
        profiles: ProfileCache::new(config.max_cached_profiles),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
