use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every network call gets an explicit timeout from here; nothing relies on library defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server-side Gemini key. When unset, clients must send `api_key` with the upload.
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub analysis_timeout: Duration,
    pub search_api_url: String,
    pub search_timeout: Duration,
    pub search_results_per_query: usize,
    /// Restrict search results to pages indexed within the last day.
    pub search_recent_only: bool,
    /// Politeness delay between consecutive search queries.
    pub search_delay: Duration,
    pub link_check_timeout: Duration,
    pub max_upload_bytes: usize,
    /// Upper bound on cached profiles; the oldest analysis is evicted first.
    pub max_cached_profiles: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_api_url: env_or("GEMINI_API_URL", "https://generativelanguage.googleapis.com"),
            analysis_timeout: Duration::from_secs(parse_env("ANALYSIS_TIMEOUT_SECS", 30)?),
            search_api_url: env_or("SEARCH_API_URL", "https://html.duckduckgo.com/html/"),
            search_timeout: Duration::from_secs(parse_env("SEARCH_TIMEOUT_SECS", 10)?),
            search_results_per_query: parse_env("SEARCH_RESULTS_PER_QUERY", 10)?,
            search_recent_only: parse_env("SEARCH_RECENT_ONLY", true)?,
            search_delay: Duration::from_millis(parse_env("SEARCH_DELAY_MS", 1000)?),
            link_check_timeout: Duration::from_secs(parse_env("LINK_CHECK_TIMEOUT_SECS", 3)?),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            max_cached_profiles: parse_env("MAX_CACHED_PROFILES", 1000)?,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

/// Reads a variable, treating an empty value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default_when_unset() {
        let value: u64 = parse_env("SCOUT_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("SCOUT_TEST_BAD_NUMBER", "ten");
        let result: Result<u64> = parse_env("SCOUT_TEST_BAD_NUMBER", 1);
        assert!(result.is_err());
        std::env::remove_var("SCOUT_TEST_BAD_NUMBER");
    }

    #[test]
    fn test_optional_env_treats_blank_as_unset() {
        std::env::set_var("SCOUT_TEST_BLANK_KEY", "   ");
        assert_eq!(optional_env("SCOUT_TEST_BLANK_KEY"), None);
        std::env::remove_var("SCOUT_TEST_BLANK_KEY");
    }
}
