//! Link Harvester — runs each query, keeps the links that pass validation and tags
//! them with the title that produced the query.
//!
//! Strictly sequential. The first provider failure ends the run; everything
//! gathered before it is still returned.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::search::links::{source_domain, LinkChecker};
use crate::search::provider::{SearchOptions, SearchProvider};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkResult {
    pub role: String,
    pub source_domain: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Share of queries processed, not of links found.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarvestOptions {
    pub results_per_query: usize,
    pub recent_only: bool,
    /// Politeness pause between consecutive queries.
    pub delay: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct HarvestReport {
    /// Not deduplicated: the same posting can come back for several titles.
    pub links: Vec<LinkResult>,
    pub queries_completed: usize,
    pub queries_total: usize,
    /// Set when the provider failed and the remaining queries were abandoned.
    pub warning: Option<String>,
}

/// `queries[i]` must have been generated from `titles[i]`.
pub async fn harvest_links<F>(
    queries: &[String],
    titles: &[String],
    provider: &dyn SearchProvider,
    checker: &LinkChecker,
    options: &HarvestOptions,
    mut on_progress: F,
) -> HarvestReport
where
    F: FnMut(Progress) + Send,
{
    let search_options = SearchOptions {
        max_results: options.results_per_query,
        recent_only: options.recent_only,
    };
    let total = queries.len();
    let mut links = Vec::new();
    let mut completed = 0;
    let mut warning = None;

    for (i, (query, role)) in queries.iter().zip(titles).enumerate() {
        if i > 0 && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }

        let urls = match provider.search(query, &search_options).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!("Search stopped at query {} of {}: {}", i + 1, total, e);
                warning = Some(format!(
                    "Search stopped early after {completed} of {total} queries ({e}). Showing results found so far."
                ));
                break;
            }
        };

        for url in urls {
            if checker.is_valid_link(&url).await {
                links.push(LinkResult {
                    role: role.clone(),
                    source_domain: source_domain(&url),
                    url,
                });
            }
        }

        completed += 1;
        on_progress(Progress { completed, total });
    }

    info!(
        "Harvest finished: {} links from {} of {} queries",
        links.len(),
        completed,
        total
    );

    HarvestReport {
        links,
        queries_completed: completed,
        queries_total: total,
        warning,
    }
}
