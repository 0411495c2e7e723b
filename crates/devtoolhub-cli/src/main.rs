//! DevToolHub CLI - developer tools with a local-first personal vault
//!
//! Stateless tools run offline. Favorites, history and the password vault
//! live in local snapshots and sync to Supabase when a profile is signed in.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;

#[cfg(test)]
mod tests;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::common::resolve_data_dir;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::convert::run_convert;
use crate::commands::cron::run_cron;
use crate::commands::encode::run_encode;
use crate::commands::favorites::run_favorites;
use crate::commands::history::run_history;
use crate::commands::json::run_json;
use crate::commands::jwt::run_jwt;
use crate::commands::mock::run_mock;
use crate::commands::password::run_password;
use crate::commands::regex::run_regex;
use crate::commands::timestamp::run_timestamp;
use crate::commands::tools_cmd::run_tools;
use crate::commands::url::run_url;
use crate::commands::uuid::run_uuid;
use crate::commands::vault::run_vault;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("devtoolhub=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Tools { command } => run_tools(command)?,
        Commands::Favorites { command } => {
            let data_dir = resolve_data_dir(cli.data_dir)?;
            run_favorites(command, &data_dir, profile).await?;
        }
        Commands::History { command } => {
            let data_dir = resolve_data_dir(cli.data_dir)?;
            run_history(command, &data_dir, profile).await?;
        }
        Commands::Vault {
            passphrase,
            command,
        } => {
            let data_dir = resolve_data_dir(cli.data_dir)?;
            run_vault(command, passphrase, &data_dir, profile).await?;
        }
        Commands::Json { command } => run_json(command)?,
        Commands::Password { command } => run_password(command)?,
        Commands::Jwt { command } => run_jwt(command)?,
        Commands::Timestamp { command } => run_timestamp(command)?,
        Commands::Regex { command } => run_regex(command)?,
        Commands::Url { command } => run_url(command)?,
        Commands::Cron { command } => run_cron(command)?,
        Commands::Uuid {
            count,
            uppercase,
            no_hyphens,
        } => run_uuid(count, uppercase, no_hyphens)?,
        Commands::Encode { command } => run_encode(command)?,
        Commands::Mock { kind, count } => run_mock(kind, count)?,
        Commands::Convert { command } => run_convert(command, profile).await?,
        Commands::Config { command } => run_config(command, profile)?,
        Commands::Auth { command } => run_auth(command, profile).await?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
