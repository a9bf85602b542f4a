//! Loads runtime configuration from the environment (and an optional `.env` file).

use crate::error::AppError;
use crate::models::DEFAULT_HOST;
use std::env;
use tracing::debug;

/// Settings resolved once at startup.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// API token; only required once a request is actually made.
    pub token: Option<String>,
    /// Host the repositories live on, e.g. `github.com`.
    pub host: String,
    /// Base URL of the REST API.
    pub api_url: String,
    /// Default repository from `GH_REPO`.
    pub repo_override: Option<String>,
    /// Set when `GH_PROMPT_DISABLED` is non-empty.
    pub prompt_disabled: bool,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// Values from a `.env` file in the working directory are loaded first but never
    /// override variables that are already set.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let host = non_empty_var("GH_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let api_url = non_empty_var("GH_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| api_url_for_host(&host));

        let config = Self {
            token: non_empty_var("GH_TOKEN").or_else(|| non_empty_var("GITHUB_TOKEN")),
            host,
            api_url,
            repo_override: non_empty_var("GH_REPO"),
            prompt_disabled: non_empty_var("GH_PROMPT_DISABLED").is_some(),
        };

        debug!(
            "Loaded config: host={}, api_url={}, token_set={}, repo_override={:?}",
            config.host,
            config.api_url,
            config.token.is_some(),
            config.repo_override
        );

        config
    }
}

/// Error reported when a request needs a token and none is configured.
pub fn missing_token_error() -> AppError {
    AppError::Config(
        "authentication required: set the GH_TOKEN or GITHUB_TOKEN environment variable"
            .to_string(),
    )
}

/// REST API root for a host; GitHub Enterprise serves it under `/api/v3`.
pub fn api_url_for_host(host: &str) -> String {
    if host.eq_ignore_ascii_case(DEFAULT_HOST) {
        "https://api.github.com".to_string()
    } else {
        format!("https://{}/api/v3", host)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
