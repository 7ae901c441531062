//! Search Provider — pluggable, trait-based web search returning result URLs.
//!
//! Default: `DuckDuckGoSearch` (HTML endpoint, no API key).
//! `AppState` holds an `Arc<dyn SearchProvider>`; tests swap in stubs.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::info;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const RESULT_LINK_SELECTOR: &str = ".result:not(.result--ad) a.result__a";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-200 replies, including rate limiting and bot-check pages.
    #[error("Search provider returned status {0}")]
    Status(u16),

    #[error("Search results could not be parsed: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_results: usize,
    /// Only results indexed within the last day.
    pub recent_only: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns at most `options.max_results` result URLs, in provider order.
    async fn search(&self, query: &str, options: &SearchOptions)
        -> Result<Vec<String>, SearchError>;
}

// ────────────────────────────────────────────────────────────────────────────
// DuckDuckGoSearch — default implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build search HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<String>, SearchError> {
        let mut params = vec![("q", query)];
        if options.recent_only {
            params.push(("df", "d"));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SearchError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        let urls = parse_result_links(&html, options.max_results)?;
        info!("Search returned {} result links", urls.len());
        Ok(urls)
    }
}

/// Pulls organic result URLs out of a DuckDuckGo HTML results page.
fn parse_result_links(html: &str, max_results: usize) -> Result<Vec<String>, SearchError> {
    let selector =
        Selector::parse(RESULT_LINK_SELECTOR).map_err(|e| SearchError::Parse(e.to_string()))?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(resolve_result_href)
        .take(max_results)
        .collect())
}

/// Result anchors usually point at a `/l/?uddg=<target>` redirect; unwrap it.
fn resolve_result_href(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    let url = Url::parse(&absolute).ok()?;

    let is_redirect = url
        .host_str()
        .map(|host| host.ends_with("duckduckgo.com"))
        .unwrap_or(false)
        && url.path().starts_with("/l/");
    if is_redirect {
        return url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned());
    }

    matches!(url.scheme(), "http" | "https").then(|| absolute)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
        <html><body>
          <div class="result results_links result--ad">
            <a class="result__a" href="https://duckduckgo.com/y.js?ad_domain=indeed.com">Ad</a>
          </div>
          <div class="result results_links">
            <h2><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fjobs.lever.co%2Facme%2F123&amp;rut=abc">Rust Engineer</a></h2>
            <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fignored.example">snippet</a>
          </div>
          <div class="result results_links">
            <h2><a class="result__a" href="https://boards.greenhouse.io/beta/jobs/9">Direct</a></h2>
          </div>
          <div class="result results_links">
            <h2><a class="result__a" href="javascript:void(0)">Broken</a></h2>
          </div>
          <div class="result results_links">
            <h2><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwd5.myworkdayjobs.com%2Fen-US%2Fjob%2F42">Workday</a></h2>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_skips_ads_and_decodes_redirects() {
        let urls = parse_result_links(RESULTS_PAGE, 10).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://jobs.lever.co/acme/123",
                "https://boards.greenhouse.io/beta/jobs/9",
                "https://wd5.myworkdayjobs.com/en-US/job/42",
            ]
        );
    }

    #[test]
    fn test_parse_respects_max_results() {
        let urls = parse_result_links(RESULTS_PAGE, 2).unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0], "https://jobs.lever.co/acme/123");
    }

    #[test]
    fn test_parse_empty_page() {
        assert!(parse_result_links("<html><body>No results.</body></html>", 10)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_resolve_redirect_without_target() {
        assert_eq!(resolve_result_href("//duckduckgo.com/l/?rut=abc"), None);
    }

    #[tokio::test]
    async fn test_search_sends_recency_filter_and_parses() {
        use axum::{extract::Query, routing::get, Router};
        use std::collections::HashMap;

        let router = Router::new().route(
            "/html/",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let recent = params.get("df").map(String::as_str) == Some("d");
                let q = params.get("q").cloned().unwrap_or_default();
                axum::response::Html(format!(
                    r#"<div class="result"><a class="result__a" href="https://jobs.lever.co/x?recent={recent}&amp;q={}">x</a></div>"#,
                    q.len()
                ))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        let provider =
            DuckDuckGoSearch::new(format!("http://{addr}/html/"), Duration::from_secs(5)).unwrap();
        let options = SearchOptions {
            max_results: 5,
            recent_only: true,
        };
        let urls = provider.search("site:lever.co \"Engineer\"", &options).await.unwrap();

        assert_eq!(urls, vec!["https://jobs.lever.co/x?recent=true&q=24"]);
    }

    #[tokio::test]
    async fn test_search_rate_limit_is_an_error() {
        use axum::{http::StatusCode as AxumStatus, routing::get, Router};

        let router = Router::new().route("/html/", get(|| async { AxumStatus::TOO_MANY_REQUESTS }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        let provider =
            DuckDuckGoSearch::new(format!("http://{addr}/html/"), Duration::from_secs(5)).unwrap();
        let options = SearchOptions {
            max_results: 5,
            recent_only: false,
        };
        let result = provider.search("anything", &options).await;

        assert!(matches!(result, Err(SearchError::Status(429))));
    }
}
