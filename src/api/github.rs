//! Provides a client for the GitHub REST API.
//!
//! This module defines the `RepoApi` trait, the seam command handlers depend on,
//! and `GitHubClient`, its reqwest-backed implementation.

use crate::config::missing_token_error;
use crate::error::{AppError, Result};
use crate::models::{ApiErrorBody, RenameRequest, Repository};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use tracing::{debug, error, info};

const USER_AGENT: &str = concat!("repokit/", env!("CARGO_PKG_VERSION"));
const API_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Remote repository operations needed by the `repo` commands.
pub trait RepoApi {
    /// Renames `request.current` to `request.new_name` and returns the updated repository.
    async fn rename_repo(&self, request: &RenameRequest) -> Result<Repository>;
}

/// An asynchronous client for the GitHub REST API.
pub struct GitHubClient {
    client: Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    /// Creates a new `GitHubClient` for the given API root (e.g. `https://api.github.com`).
    ///
    /// A missing token is only reported once a request is attempted, so argument
    /// validation errors still surface first.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(API_MEDIA_TYPE));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Turns a non-success response into `AppError::Http`, preferring the API's own message.
    async fn error_from_response(response: reqwest::Response) -> AppError {
        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();

        let message = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(api_error) => {
                if let Some(docs) = &api_error.documentation_url {
                    debug!("See {} for details", docs);
                }
                api_error.message
            },
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };

        error!("API request to {} failed with status {}: {}", url, status, message);
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            error!("Received 401/403. Check the token's validity and its repository permissions.");
        }

        AppError::Http {
            status: status.as_u16(),
            message,
            url,
        }
    }
}

impl RepoApi for GitHubClient {
    /// Corresponds to `PATCH /repos/{owner}/{repo}` with a `name` body.
    async fn rename_repo(&self, request: &RenameRequest) -> Result<Repository> {
        info!(
            "Renaming repository {} to {}",
            request.current, request.new_name
        );

        let token = self.token.as_deref().ok_or_else(missing_token_error)?;
        let url = format!(
            "{}/repos/{}/{}",
            self.base_url,
            request.current.owner(),
            request.current.name()
        );

        let response = self
            .client
            .patch(&url)
            .bearer_auth(token)
            .json(&request.body())
            .send()
            .await
            .map_err(|e| {
                error!("Error sending rename request to {}: {}", url, e);
                AppError::from(e)
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let repository: Repository = response.json().await.map_err(|e| {
            error!("Error parsing API response JSON: {}", e);
            AppError::from(e)
        })?;

        debug!(
            "Repository is now {}",
            repository
                .full_name
                .as_deref()
                .unwrap_or(repository.name.as_str())
        );

        Ok(repository)
    }
}
