//! Jotter CLI - keep a list of titled notes from the command line
//!
//! Every command passes through the session gate first, then works on the
//! signed-in user's notes through the note list synchronizer.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;
mod prompt;
mod surface;


use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{
    add::run_add, auth_cmd::run_auth, config::run_config, delete::run_delete, edit::run_edit,
    list::run_list,
};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        if error.already_shown() {
            tracing::debug!("Command failed: {}", error);
        } else {
            eprintln!("Error: {error}");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jotter=warn")),
        )
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::List { json } => run_list(json, profile).await,
        Commands::Add { title, description } => {
            run_add(&title, description.as_deref(), profile).await
        }
        Commands::Edit {
            target,
            title,
            description,
        } => run_edit(&target, title, description, profile).await,
        Commands::Delete { target, yes } => run_delete(&target, yes, profile).await,
        Commands::Config { command } => run_config(command, profile),
        Commands::Auth { command } => run_auth(command, profile).await,
    }
}
