//! Requisite - component requirement installer
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use requisite::cli::args::{ConfigAction, ConfigArgs};
use requisite::cli::{Cli, Commands};
use requisite::config::{Config, ConfigManager};
use requisite::error::RequisiteResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> RequisiteResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    // config init must work even when the existing file does not parse
    let config = match cli.command {
        Commands::Config(ConfigArgs {
            action: Some(ConfigAction::Init { .. }),
        }) => Config::default(),
        _ => config_manager.load().await?,
    };

    // 0 = warn, 1 = info, 2+ = debug; general.verbose counts as -v
    let level = cli.verbose.max(u8::from(config.general.verbose));
    let filter = match level {
        0 => EnvFilter::new("requisite=warn"),
        1 => EnvFilter::new("requisite=info"),
        _ => EnvFilter::new("requisite=debug"),
    };

    if config.general.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .init();
    }

    debug!("Using config {}", config_manager.path().display());

    match cli.command {
        Commands::Install(args) => requisite::cli::commands::install(args, &config).await,
        Commands::Check(args) => requisite::cli::commands::check(args, &config).await,
        Commands::Component(args) => requisite::cli::commands::component(args, &config).await,
        Commands::Status(args) => {
            requisite::cli::commands::status(args, &config, &config_manager).await
        }
        Commands::Config(args) => {
            requisite::cli::commands::config(args, &config, &config_manager).await
        }
    }
}
