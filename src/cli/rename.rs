//! `repo rename`: renames the current repository on the remote platform.

use crate::api::RepoApi;
use crate::cli::prompt::{spinner, Prompter};
use crate::error::{AppError, Result};
use crate::git;
use crate::models::{validate_new_name, RenameRequest, RepoId};
use clap::Args;
use colored::*;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Resolves the repository a command operates on.
pub type BaseRepoFn = Box<dyn Fn() -> Result<RepoId> + Send + Sync>;

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// New name for the repository
    #[arg(value_name = "NEW_NAME")]
    pub args: Vec<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Select another repository using the [HOST/]OWNER/REPO format
    #[arg(short = 'R', long, value_name = "[HOST/]OWNER/REPO")]
    pub repo: Option<String>,
}

/// Everything `rename_run` needs for one invocation.
pub struct RenameOptions {
    /// New name from the command line; prompted for when absent.
    pub new_name: Option<String>,
    pub base_repo: BaseRepoFn,
    /// Whether the user can be prompted.
    pub interactive: bool,
    pub skip_confirm: bool,
    /// Print the success lines (stdout is a terminal).
    pub stdout_tty: bool,
    /// Show a spinner while the request runs (stderr is a terminal).
    pub show_progress: bool,
    /// Checkout whose remotes should follow the rename. `None` when the repository
    /// was picked with `--repo`/`GH_REPO`.
    pub remote_dir: Option<PathBuf>,
}

/// Checks the positional arguments: at most one, and exactly one when prompting is impossible.
pub fn new_name_from_args(args: &[String], interactive: bool) -> Result<Option<String>> {
    match args {
        [] if !interactive => Err(AppError::Validation(
            "new name argument required when not running interactively".to_string(),
        )),
        [] => Ok(None),
        [name] => Ok(Some(name.clone())),
        _ => Err(AppError::Usage(format!(
            "accepts at most 1 arg(s), received {}",
            args.len()
        ))),
    }
}

/// Renames the repository returned by `opts.base_repo` and reports the outcome on `out`.
pub async fn rename_run<A, P, W>(
    opts: &RenameOptions,
    api: &A,
    prompter: &P,
    out: &mut W,
) -> Result<()>
where
    A: RepoApi,
    P: Prompter,
    W: Write,
{
    let (new_name, prompted) = match &opts.new_name {
        Some(name) => (name.clone(), false),
        None if opts.interactive => (prompter.input("Rename repository to")?, true),
        None => {
            return Err(AppError::Validation(
                "new name argument required when not running interactively".to_string(),
            ))
        },
    };

    validate_new_name(&new_name)?;

    let current = (opts.base_repo)()?;

    if !prompted && opts.interactive && !opts.skip_confirm {
        let proceed = prompter.confirm(&format!("Rename {} to {}?", current, new_name))?;
        if !proceed {
            info!("Rename of {} declined", current);
            return Ok(());
        }
    }

    let request = RenameRequest::new(current, new_name)?;

    let pb = spinner(
        opts.show_progress,
        format!("Renaming {}", request.current.full_name()),
    )?;
    let result = api.rename_repo(&request).await;
    pb.finish_and_clear();
    let renamed = result?;

    let new_repo = renamed.repo_id(request.current.host());
    info!("Renamed {} to {}", request.current, new_repo);
    if opts.stdout_tty {
        writeln!(
            out,
            "{} Renamed repository {}",
            "✓".green(),
            new_repo.full_name()
        )?;
    }

    if let Some(dir) = &opts.remote_dir {
        // The rename already happened; a stale remote is only worth a warning.
        match git::update_remotes(
            dir,
            &request.current,
            &new_repo,
            renamed.clone_url.as_deref(),
        ) {
            Ok(updated) => {
                for name in updated {
                    if opts.stdout_tty {
                        writeln!(out, "{} Updated the {:?} remote", "✓".green(), name)?;
                    }
                }
            },
            Err(e) => warn!("Failed to update git remotes in {}: {}", dir.display(), e),
        }
    }

    Ok(())
}
