mod api;
mod cli;
mod config;
mod error;
mod git;
mod models;

use clap::Parser;
use cli::{App, Cli};
use colored::*;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Parsed command: {:?}", cli.command);

    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {:?}", e);
            eprintln!("{}", e.to_string().red());
            return ExitCode::FAILURE;
        },
    };

    match app.run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command execution failed: {:?}", e);
            eprintln!("{}", e.to_string().red());
            ExitCode::FAILURE
        },
    }
}
