//! Runtime configuration, loaded once at startup.
//!
//! Everything has a workable default; environment variables (or a `.env`
//! file) override them when pointing the reader at a different deployment of
//! the story service.

use std::env;
use std::time::Duration;

/// Hosted Hack or Snooze API used when no override is configured.
pub const DEFAULT_API_URL: &str = "https://hack-or-snooze-v3.herokuapp.com";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the story service, without a trailing slash.
    pub api_url: String,
    /// Whole-request timeout applied to the HTTP client.
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// defaults. Nothing here is required, so this cannot fail.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_url = env::var("HACK_OR_SNOOZE_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let http_timeout = env::var("HACK_OR_SNOOZE_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));

        Self {
            api_url,
            http_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test covers override and default so the process-global env vars
    // are never touched from two tests running in parallel.
    #[test]
    fn test_config_from_env() {
        env::set_var("HACK_OR_SNOOZE_API_URL", "http://localhost:3000/");
        env::set_var("HACK_OR_SNOOZE_HTTP_TIMEOUT_SECS", "5");

        let config = Config::from_env();
        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.http_timeout, Duration::from_secs(5));

        env::remove_var("HACK_OR_SNOOZE_API_URL");
        env::remove_var("HACK_OR_SNOOZE_HTTP_TIMEOUT_SECS");

        let config = Config::from_env();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_default_matches_hosted_service() {
        let config = Config::default();
        assert!(config.api_url.starts_with("https://"));
        assert!(!config.api_url.ends_with('/'));
    }
}
