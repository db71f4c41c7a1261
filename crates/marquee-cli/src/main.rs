//! Marquee CLI - search movies as you type and keep a list of favorites
//!
//! Results go to stdout; diagnostics go to stderr through `tracing`.

mod cli;
mod commands;
mod error;


use clap::{CommandFactory, Parser};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::common::{resolve_config_path, resolve_db_path};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::details::run_details;
use crate::commands::favorites::run_favorites;
use crate::commands::live::run_live;
use crate::commands::search::run_search;
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
    init_tracing();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);
    let config_path = resolve_config_path(cli.config_path);

    match cli.command {
        Some(Commands::Search { query, json }) => {
            run_search(&query, json, &db_path, &config_path).await?;
        }
        Some(Commands::Details { id, json }) => {
            run_details(&id, json, &db_path, &config_path).await?;
        }
        Some(Commands::Favorites { command }) => {
            run_favorites(command, &db_path, &config_path).await?;
        }
        Some(Commands::Live) => run_live(&db_path, &config_path).await?,
        Some(Commands::Config { command }) => run_config(command, &config_path)?,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}

fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "marquee=info".parse::<Directive>() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
