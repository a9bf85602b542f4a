use crate::api::GitHubClient;
use crate::cli::prompt::DialoguerPrompter;
use crate::cli::rename::{new_name_from_args, rename_run, BaseRepoFn, RenameArgs, RenameOptions};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::git;
use crate::models::RepoId;
use clap::{Parser, Subcommand};
use std::env;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing::{debug, info};

/// CLI tool for managing GitHub repositories
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with repositories
    #[command(subcommand)]
    Repo(RepoCommands),
}

#[derive(Subcommand, Debug)]
pub enum RepoCommands {
    /// Rename a repository
    ///
    /// With no argument, the new name is prompted for interactively.
    Rename(RenameArgs),
}

/// Which standard streams are attached to a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Terminal {
    pub stdin: bool,
    pub stdout: bool,
    pub stderr: bool,
}

impl Terminal {
    pub fn detect() -> Self {
        Self {
            stdin: io::stdin().is_terminal(),
            stdout: io::stdout().is_terminal(),
            stderr: io::stderr().is_terminal(),
        }
    }
}

/// CLI application
pub struct App {
    config: Config,
    api_client: GitHubClient,
    prompter: DialoguerPrompter,
    terminal: Terminal,
    work_dir: PathBuf,
}

impl App {
    /// Create a new CLI application from the environment
    pub fn new() -> Result<Self> {
        let config = Config::from_env();
        let work_dir = env::current_dir()?;
        Self::with_parts(config, Terminal::detect(), work_dir)
    }

    /// Create an application with explicit configuration, terminal state and working directory
    pub fn with_parts(config: Config, terminal: Terminal, work_dir: PathBuf) -> Result<Self> {
        let api_client = GitHubClient::new(&config.api_url, config.token.clone())?;

        Ok(Self {
            config,
            api_client,
            prompter: DialoguerPrompter::new(),
            terminal,
            work_dir,
        })
    }

    /// Whether the user can be asked questions.
    pub fn can_prompt(&self) -> bool {
        !self.config.prompt_disabled && self.terminal.stdin && self.terminal.stdout
    }

    /// Run the CLI application
    pub async fn run(&self, cli: Cli) -> Result<()> {
        self.run_with_output(cli, &mut io::stdout()).await
    }

    /// Run the CLI application, writing user-facing output to `out`
    pub async fn run_with_output<W: Write>(&self, cli: Cli, out: &mut W) -> Result<()> {
        match cli.command {
            Commands::Repo(RepoCommands::Rename(args)) => self.rename(args, out).await?,
        }

        Ok(())
    }

    /// Rename the current repository
    async fn rename<W: Write>(&self, args: RenameArgs, out: &mut W) -> Result<()> {
        let interactive = self.can_prompt();
        let new_name = new_name_from_args(&args.args, interactive)?;

        let repo_override = args.repo.or_else(|| self.config.repo_override.clone());
        let remote_dir = match repo_override {
            Some(_) => None,
            None => Some(self.work_dir.clone()),
        };
        debug!(
            "rename: interactive={}, repo_override={:?}",
            interactive, repo_override
        );

        let opts = RenameOptions {
            new_name,
            base_repo: self.base_repo_resolver(repo_override),
            interactive,
            skip_confirm: args.yes,
            stdout_tty: self.terminal.stdout,
            show_progress: self.terminal.stderr,
            remote_dir,
        };

        rename_run(&opts, &self.api_client, &self.prompter, out).await?;
        info!("rename command finished");

        Ok(())
    }

    /// Resolver for the target repository: `--repo`/`GH_REPO` if given, else the git remotes.
    fn base_repo_resolver(&self, repo_override: Option<String>) -> BaseRepoFn {
        let host = self.config.host.clone();
        let work_dir = self.work_dir.clone();

        Box::new(move || match &repo_override {
            Some(selector) => RepoId::from_full_name(selector, &host),
            None => git::default_remote_repo(&work_dir, &host)?.ok_or_else(|| {
                AppError::Resolution(
                    "unable to determine the current repository; use --repo OWNER/REPO"
                        .to_string(),
                )
            }),
        })
    }
}
