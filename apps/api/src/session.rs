//! The per-search context handed from the analysis stage to the harvest stage.

use crate::profile::cache::CachedProfile;
use crate::profile::Profile;
use crate::search::harvester::{harvest_links, HarvestOptions, HarvestReport, Progress};
use crate::search::links::LinkChecker;
use crate::search::provider::SearchProvider;
use crate::search::queries::generate_search_queries;

#[derive(Debug, Clone)]
pub struct SearchSession {
    pub fingerprint: String,
    pub profile: Profile,
    pub remote_only: bool,
}

impl SearchSession {
    pub fn new(cached: CachedProfile, remote_only: bool) -> Self {
        Self {
            fingerprint: cached.fingerprint,
            profile: cached.profile,
            remote_only,
        }
    }

    /// One query per profile title, index-aligned with `profile.titles`.
    pub fn queries(&self) -> Vec<String> {
        generate_search_queries(&self.profile.titles, self.remote_only)
    }

    pub async fn harvest<F>(
        &self,
        queries: &[String],
        provider: &dyn SearchProvider,
        checker: &LinkChecker,
        options: &HarvestOptions,
        on_progress: F,
    ) -> HarvestReport
    where
        F: FnMut(Progress) + Send,
    {
        harvest_links(
            queries,
            &self.profile.titles,
            provider,
            checker,
            options,
            on_progress,
        )
        .await
    }
}
