use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::profile::cache::ProfileCache;
use crate::search::links::LinkChecker;
use crate::search::provider::SearchProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Pluggable search backend. Default: DuckDuckGoSearch.
    pub search: Arc<dyn SearchProvider>,
    pub link_checker: LinkChecker,
    pub profiles: ProfileCache,
    pub config: Config,
}
