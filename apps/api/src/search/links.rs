//! Link validity: generic job boards are rejected outright, everything else
//! must answer a HEAD request with exactly 200.

use std::time::Duration;

use anyhow::Context;
use reqwest::{redirect::Policy, Client, StatusCode};
use tracing::debug;

/// Aggregator boards; results on these are never direct ATS postings.
pub const EXCLUDED_DOMAINS: [&str; 6] = [
    "linkedin.com",
    "indeed.com",
    "glassdoor.com",
    "ziprecruiter.com",
    "monster.com",
    "simplyhired.com",
];

const LIVENESS_USER_AGENT: &str = "Mozilla/5.0";

/// Plain substring match, so it also catches subdomains and redirect wrappers.
pub fn is_excluded_domain(url: &str) -> bool {
    EXCLUDED_DOMAINS.iter().any(|domain| url.contains(domain))
}

/// The host segment of a URL: the third `/`-separated piece (`scheme:`, ``, host).
pub fn source_domain(url: &str) -> String {
    url.split('/').nth(2).unwrap_or_default().to_string()
}

#[derive(Clone)]
pub struct LinkChecker {
    client: Client,
}

impl LinkChecker {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(LIVENESS_USER_AGENT)
            .redirect(Policy::limited(10))
            .timeout(timeout)
            .build()
            .context("Failed to build link-check HTTP client")?;

        Ok(Self { client })
    }

    /// True only for a non-excluded URL whose HEAD request returns 200.
    /// Every failure (timeout, DNS, malformed URL, other status) is a plain `false`.
    pub async fn is_valid_link(&self, url: &str) -> bool {
        if is_excluded_domain(url) {
            debug!("Rejected {url}: job-board domain");
            return false;
        }

        match self.client.head(url).send().await {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                debug!("Rejected {url}: HEAD returned {}", response.status());
                false
            }
            Err(e) => {
                debug!("Rejected {url}: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use axum::{
        http::StatusCode as AxumStatus,
        response::Redirect,
        routing::get,
        Router,
    };

    use super::*;

    /// Local site with one live page, one missing page, a redirect and a slow page.
    pub(crate) async fn serve_test_site() -> String {
        let router = Router::new()
            .route("/live", get(|| async { "open position" }))
            .route("/gone", get(|| async { AxumStatus::NOT_FOUND }))
            .route("/created", get(|| async { AxumStatus::CREATED }))
            .route("/moved", get(|| async { Redirect::temporary("/live") }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    "too late"
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    fn checker() -> LinkChecker {
        LinkChecker::new(Duration::from_millis(500)).unwrap()
    }

    #[test]
    fn test_every_job_board_is_excluded() {
        for url in [
            "https://www.linkedin.com/jobs/view/1",
            "https://indeed.com/viewjob?jk=2",
            "https://www.glassdoor.com/job-listing/3",
            "https://www.ziprecruiter.com/c/4",
            "https://www.monster.com/job-openings/5",
            "https://www.simplyhired.com/job/6",
        ] {
            assert!(is_excluded_domain(url), "{url} should be excluded");
        }
        assert!(!is_excluded_domain("https://jobs.lever.co/acme/1"));
    }

    #[test]
    fn test_source_domain_is_third_segment() {
        assert_eq!(source_domain("https://jobs.lever.co/acme/123"), "jobs.lever.co");
        assert_eq!(source_domain("http://127.0.0.1:8080/live"), "127.0.0.1:8080");
        assert_eq!(source_domain("no-slashes"), "");
    }

    #[tokio::test]
    async fn test_excluded_domain_is_false_without_request() {
        // Unroutable host: would time out if a request were attempted.
        let started = std::time::Instant::now();
        assert!(!checker().is_valid_link("http://10.255.255.1/linkedin.com/jobs").await);
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_excluded_domain_false_even_when_live() {
        let base = serve_test_site().await;
        // The page answers 200 but the URL mentions a job board.
        let url = format!("{base}/live?ref=indeed.com");
        assert!(!checker().is_valid_link(&url).await);
    }

    #[tokio::test]
    async fn test_live_page_is_valid() {
        let base = serve_test_site().await;
        assert!(checker().is_valid_link(&format!("{base}/live")).await);
    }

    #[tokio::test]
    async fn test_redirect_is_followed() {
        let base = serve_test_site().await;
        assert!(checker().is_valid_link(&format!("{base}/moved")).await);
    }

    #[tokio::test]
    async fn test_non_200_is_invalid() {
        let base = serve_test_site().await;
        assert!(!checker().is_valid_link(&format!("{base}/gone")).await);
        assert!(!checker().is_valid_link(&format!("{base}/created")).await);
    }

    #[tokio::test]
    async fn test_timeout_is_invalid() {
        let base = serve_test_site().await;
        assert!(!checker().is_valid_link(&format!("{base}/slow")).await);
    }

    #[tokio::test]
    async fn test_malformed_url_is_invalid() {
        assert!(!checker().is_valid_link("not a url at all").await);
    }
}
