//! Defines repository identity and the payloads exchanged with the GitHub REST API.
//!
//! Includes:
//! - `RepoId`, the host/owner/name triple identifying a repository, with parsers for
//!   `OWNER/REPO`, `HOST/OWNER/REPO` and git remote URLs.
//! - `RenameRequest`, the validated input of a rename.
//! - Response structs (`Repository`, `ApiErrorBody`) for deserializing API replies.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "github.com";

/// Identifies a repository on a given host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    host: String,
    owner: String,
    name: String,
}

impl RepoId {
    /// Creates a `RepoId` on the default host.
    #[cfg(test)]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_host(DEFAULT_HOST, owner, name)
    }

    /// Creates a `RepoId` on an explicit host.
    pub fn with_host(
        host: impl Into<String>,
        owner: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            host: normalize_host(&host.into()),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parses `OWNER/REPO`, `HOST/OWNER/REPO` or a git remote URL.
    ///
    /// `default_host` is used when the input does not name a host.
    pub fn from_full_name(input: &str, default_host: &str) -> Result<Self> {
        let input = input.trim();
        let format_error = || {
            AppError::Resolution(format!(
                "expected the \"[HOST/]OWNER/REPO\" format, got \"{}\"",
                input
            ))
        };

        if input.contains("://") || input.starts_with("git@") {
            return Self::from_remote_url(input).ok_or_else(format_error);
        }

        let parts: Vec<&str> = input.split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(format_error());
        }

        match parts.as_slice() {
            [owner, name] => Ok(Self::with_host(default_host, *owner, *name)),
            [host, owner, name] => Ok(Self::with_host(*host, *owner, *name)),
            _ => Err(format_error()),
        }
    }

    /// Extracts a `RepoId` from a git remote URL.
    ///
    /// Understands `scheme://[user@]host[:port]/owner/repo[.git]` and the scp-like
    /// `[user@]host:owner/repo[.git]`. Returns `None` for anything else (local paths etc).
    pub fn from_remote_url(url: &str) -> Option<Self> {
        let url = url.trim();
        let (authority, path) = match url.split_once("://") {
            Some((_, rest)) => rest.split_once('/')?,
            None => url.split_once(':')?,
        };

        let host = authority.rsplit('@').next()?.split(':').next()?;
        let path = path.trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);

        let mut segments = path.split('/');
        let owner = segments.next()?;
        let name = segments.next()?;
        if segments.next().is_some() || host.is_empty() || owner.is_empty() || name.is_empty() {
            return None;
        }

        Some(Self::with_host(host, owner, name))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `owner/name`, the form used in API paths and user-facing messages.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// HTTPS clone URL for this repository.
    pub fn clone_url(&self) -> String {
        format!("https://{}/{}/{}.git", self.host, self.owner, self.name)
    }

    /// Host, owner and name compared case-insensitively, as the platform does.
    pub fn same_repo(&self, other: &RepoId) -> bool {
        self.host.eq_ignore_ascii_case(&other.host)
            && self.owner.eq_ignore_ascii_case(&other.owner)
            && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.to_ascii_lowercase();
    match host.as_str() {
        "www.github.com" | "ssh.github.com" => DEFAULT_HOST.to_string(),
        _ => host,
    }
}

/// Rejects names the platform would read as `owner/name`.
pub fn validate_new_name(new_name: &str) -> Result<()> {
    if new_name.contains('/') {
        return Err(AppError::Validation(
            "new repository name cannot contain '/'".to_string(),
        ));
    }
    Ok(())
}

/// A validated rename: `new_name` never contains `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRequest {
    pub current: RepoId,
    pub new_name: String,
}

impl RenameRequest {
    pub fn new(current: RepoId, new_name: impl Into<String>) -> Result<Self> {
        let new_name = new_name.into();
        validate_new_name(&new_name)?;
        Ok(Self { current, new_name })
    }

    /// JSON body for `PATCH /repos/{owner}/{repo}`.
    pub fn body(&self) -> UpdateRepositoryBody<'_> {
        UpdateRepositoryBody {
            name: &self.new_name,
        }
    }
}

/// Body of the repository update call; only the name is ever sent.
#[derive(Debug, Serialize)]
pub struct UpdateRepositoryBody<'a> {
    pub name: &'a str,
}

/// Owner of a repository as returned by the API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepositoryOwner {
    pub login: String,
}

/// Repository as returned by the API (only the fields we use).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Repository {
    pub name: String,
    pub full_name: Option<String>,
    pub owner: RepositoryOwner,
    /// HTTPS clone URL; preferred over a derived one when rewriting remotes.
    pub clone_url: Option<String>,
}

impl Repository {
    /// Identity of this repository on `host`.
    pub fn repo_id(&self, host: &str) -> RepoId {
        RepoId::with_host(host, self.owner.login.as_str(), self.name.as_str())
    }
}

/// Error payload the API sends alongside non-2xx statuses.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub message: String,
    pub documentation_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("owner/repo", "github.com", "owner", "repo")]
    #[case("example.org/owner/repo", "example.org", "owner", "repo")]
    #[case("GitHub.com/Owner/Repo", "github.com", "Owner", "Repo")]
    #[case("https://github.com/owner/repo.git", "github.com", "owner", "repo")]
    #[case("git@github.com:owner/repo.git", "github.com", "owner", "repo")]
    fn test_from_full_name(
        #[case] input: &str,
        #[case] host: &str,
        #[case] owner: &str,
        #[case] name: &str,
    ) {
        let repo = RepoId::from_full_name(input, DEFAULT_HOST).unwrap();
        assert_eq!(repo.host(), host);
        assert_eq!(repo.owner(), owner);
        assert_eq!(repo.name(), name);
    }

    #[test]
    fn test_from_full_name_uses_default_host() {
        let repo = RepoId::from_full_name("owner/repo", "ghe.example.com").unwrap();
        assert_eq!(repo.host(), "ghe.example.com");
    }

    #[rstest]
    #[case("")]
    #[case("repo")]
    #[case("owner/")]
    #[case("/repo")]
    #[case("a/b/c/d")]
    fn test_from_full_name_rejects_malformed(#[case] input: &str) {
        let err = RepoId::from_full_name(input, DEFAULT_HOST).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "expected the \"[HOST/]OWNER/REPO\" format, got \"{}\"",
                input
            )
        );
    }

    #[rstest]
    #[case("https://github.com/owner/repo", "github.com")]
    #[case("https://github.com/owner/repo.git", "github.com")]
    #[case("https://token@github.com/owner/repo.git/", "github.com")]
    #[case("ssh://git@github.com/owner/repo.git", "github.com")]
    #[case("ssh://git@ssh.github.com:443/owner/repo.git", "github.com")]
    #[case("git@github.com:owner/repo.git", "github.com")]
    #[case("git@ghe.example.com:owner/repo", "ghe.example.com")]
    fn test_from_remote_url(#[case] url: &str, #[case] host: &str) {
        let repo = RepoId::from_remote_url(url).unwrap();
        assert_eq!(repo.host(), host);
        assert_eq!(repo.full_name(), "owner/repo");
    }

    #[rstest]
    #[case("/srv/git/repo.git")]
    #[case("../relative/repo")]
    #[case("https://github.com/owner")]
    #[case("https://github.com/owner/repo/tree/main")]
    fn test_from_remote_url_rejects_non_repo_urls(#[case] url: &str) {
        assert!(RepoId::from_remote_url(url).is_none());
    }

    #[test]
    fn test_display_and_clone_url() {
        let repo = RepoId::new("owner", "repo");
        assert_eq!(repo.to_string(), "owner/repo");
        assert_eq!(repo.clone_url(), "https://github.com/owner/repo.git");
        assert_eq!(
            RepoId::new("owner", "newname").clone_url(),
            "https://github.com/owner/newname.git"
        );
    }

    #[test]
    fn test_same_repo_is_case_insensitive() {
        let a = RepoId::new("Owner", "Repo");
        let b = RepoId::from_remote_url("git@github.com:owner/repo.git").unwrap();
        assert!(a.same_repo(&b));
        assert!(!a.same_repo(&RepoId::new("owner", "other")));
        assert!(!a.same_repo(&RepoId::with_host("example.org", "owner", "repo")));
    }

    #[rstest]
    #[case("org/newname")]
    #[case("/newname")]
    #[case("newname/")]
    #[case("a/b/c")]
    fn test_validate_new_name_rejects_slash_anywhere(#[case] name: &str) {
        let err = validate_new_name(name).unwrap_err();
        assert_eq!(err.to_string(), "new repository name cannot contain '/'");
    }

    #[test]
    fn test_rename_request_body() {
        let request = RenameRequest::new(RepoId::new("owner", "repo"), "newname").unwrap();
        let body = serde_json::to_value(request.body()).unwrap();
        assert_eq!(body, serde_json::json!({ "name": "newname" }));

        assert!(RenameRequest::new(RepoId::new("owner", "repo"), "org/newname").is_err());
    }
}
