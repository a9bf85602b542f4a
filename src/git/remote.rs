use crate::error::Result;
use crate::models::RepoId;
use git2::{ErrorCode, Repository};
use std::path::Path;
use tracing::{debug, info};

/// A git remote that points at a repository on the configured host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: String,
    pub repo: RepoId,
}

/// Lower sorts first: `upstream`, then `github`, then `origin`, then the rest.
fn remote_priority(name: &str) -> u8 {
    match name {
        "upstream" => 0,
        "github" => 1,
        "origin" => 2,
        _ => 3,
    }
}

/// Opens the repository containing `path`, or `None` when `path` is not inside one.
fn discover(path: &Path) -> Result<Option<Repository>> {
    match Repository::discover(path) {
        Ok(repo) => Ok(Some(repo)),
        Err(e) if e.code() == ErrorCode::NotFound => {
            debug!("{} is not inside a git repository", path.display());
            Ok(None)
        },
        Err(e) => Err(e.into()),
    }
}

/// Lists the remotes of the checkout at `path` whose URL names a repository on `host`,
/// most preferred first.
pub fn list_remotes(path: &Path, host: &str) -> Result<Vec<Remote>> {
    let Some(repo) = discover(path)? else {
        return Ok(Vec::new());
    };

    let mut remotes = Vec::new();
    for name in repo.remotes()?.iter().flatten() {
        let remote = repo.find_remote(name)?;
        let Some(url) = remote.url() else {
            continue;
        };
        match RepoId::from_remote_url(url) {
            Some(id) if id.host().eq_ignore_ascii_case(host) => remotes.push(Remote {
                name: name.to_string(),
                url: url.to_string(),
                repo: id,
            }),
            _ => debug!("Ignoring remote {} ({})", name, url),
        }
    }

    remotes.sort_by(|a, b| {
        remote_priority(&a.name)
            .cmp(&remote_priority(&b.name))
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(remotes)
}

/// The repository the checkout at `path` most likely belongs to.
pub fn default_remote_repo(path: &Path, host: &str) -> Result<Option<RepoId>> {
    Ok(list_remotes(path, host)?
        .into_iter()
        .next()
        .map(|remote| remote.repo))
}

/// URL for `repo` in the same style (https or ssh) as `existing`.
///
/// `https_url` is the clone URL reported by the API, used as-is for https remotes.
pub fn remote_url_like(existing: &str, repo: &RepoId, https_url: Option<&str>) -> String {
    let is_ssh = existing.starts_with("ssh://")
        || existing.starts_with("git@")
        || (!existing.contains("://") && existing.contains('@'));

    if is_ssh {
        format!("git@{}:{}/{}.git", repo.host(), repo.owner(), repo.name())
    } else {
        https_url
            .map(str::to_string)
            .unwrap_or_else(|| repo.clone_url())
    }
}

/// Points every remote of the checkout at `path` that referenced `old` at `new` instead.
///
/// Returns the names of the remotes that were rewritten.
pub fn update_remotes(
    path: &Path,
    old: &RepoId,
    new: &RepoId,
    https_url: Option<&str>,
) -> Result<Vec<String>> {
    let Some(repo) = discover(path)? else {
        return Ok(Vec::new());
    };

    let mut updated = Vec::new();
    for remote in list_remotes(path, old.host())? {
        if !remote.repo.same_repo(old) {
            continue;
        }
        let new_url = remote_url_like(&remote.url, new, https_url);
        repo.remote_set_url(&remote.name, &new_url)?;
        info!("Updated remote {}: {} -> {}", remote.name, remote.url, new_url);
        updated.push(remote.name);
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_repo_with_remotes(
        remotes: &[(&str, &str)],
    ) -> std::result::Result<(TempDir, Repository), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let repo = Repository::init(temp_dir.path())?;
        for (name, url) in remotes {
            repo.remote(name, url)?;
        }
        Ok((temp_dir, repo))
    }

    fn remote_url(path: &Path, name: &str) -> String {
        Repository::open(path)
            .unwrap()
            .find_remote(name)
            .unwrap()
            .url()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_default_remote_prefers_upstream() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let (dir, _repo) = init_repo_with_remotes(&[
            ("origin", "git@github.com:me/fork.git"),
            ("upstream", "https://github.com/owner/repo.git"),
            ("mirror", "https://gitlab.com/owner/repo.git"),
        ])?;

        let found = default_remote_repo(dir.path(), "github.com")?;
        assert_eq!(found, Some(RepoId::new("owner", "repo")));

        let remotes = list_remotes(dir.path(), "github.com")?;
        let names: Vec<&str> = remotes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["upstream", "origin"]);

        Ok(())
    }

    #[test]
    fn test_default_remote_ignores_other_hosts() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let (dir, _repo) = init_repo_with_remotes(&[("origin", "https://gitlab.com/o/r.git")])?;
        assert_eq!(default_remote_repo(dir.path(), "github.com")?, None);
        Ok(())
    }

    #[test]
    fn test_not_a_git_repository() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        assert_eq!(default_remote_repo(dir.path(), "github.com")?, None);
        assert!(update_remotes(
            dir.path(),
            &RepoId::new("owner", "repo"),
            &RepoId::new("owner", "newname"),
            None
        )?
        .is_empty());
        Ok(())
    }

    #[test]
    fn test_remote_url_like_keeps_protocol() {
        let new = RepoId::new("owner", "newname");
        assert_eq!(
            remote_url_like("https://github.com/owner/repo.git", &new, None),
            "https://github.com/owner/newname.git"
        );
        assert_eq!(
            remote_url_like("git@github.com:owner/repo.git", &new, None),
            "git@github.com:owner/newname.git"
        );
        assert_eq!(
            remote_url_like("ssh://git@github.com/owner/repo.git", &new, None),
            "git@github.com:owner/newname.git"
        );
    }

    #[test]
    fn test_remote_url_like_prefers_api_clone_url_for_https() {
        let new = RepoId::new("owner", "newname");
        let api_url = Some("https://github.com/Owner/NewName.git");
        assert_eq!(
            remote_url_like("https://github.com/owner/repo", &new, api_url),
            "https://github.com/Owner/NewName.git"
        );
        assert_eq!(
            remote_url_like("git@github.com:owner/repo.git", &new, api_url),
            "git@github.com:owner/newname.git"
        );
    }

    #[test]
    fn test_update_remotes_only_touches_renamed_repo(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let (dir, _repo) = init_repo_with_remotes(&[
            ("origin", "git@github.com:Owner/Repo.git"),
            ("upstream", "https://github.com/owner/repo"),
            ("other", "https://github.com/someone/else.git"),
        ])?;

        let old = RepoId::new("owner", "repo");
        let new = RepoId::new("owner", "newname");
        let mut updated = update_remotes(dir.path(), &old, &new, None)?;
        updated.sort();

        assert_eq!(updated, vec!["origin".to_string(), "upstream".to_string()]);
        assert_eq!(remote_url(dir.path(), "origin"), "git@github.com:owner/newname.git");
        assert_eq!(
            remote_url(dir.path(), "upstream"),
            "https://github.com/owner/newname.git"
        );
        assert_eq!(
            remote_url(dir.path(), "other"),
            "https://github.com/someone/else.git"
        );

        Ok(())
    }
}
