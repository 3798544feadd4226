//! dcdump - Discord cache dump
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use dcdump::cli::{Cli, Commands};
use dcdump::config::{ConfigManager, LogFormat};
use dcdump::error::DumpResult;
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

async fn run() -> DumpResult<()> {
    let cli = Cli::parse();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = config_manager.load().await?;

    // 0 = warn (spinners only), 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("dcdump=warn"),
        1 => EnvFilter::new("dcdump=info"),
        _ => EnvFilter::new("dcdump=debug"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    match config.general.log_format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }
    debug!("Using config {}", config_manager.path().display());

    dcdump::ui::init_theme();

    match cli.command {
        Commands::Dump(args) => dcdump::cli::commands::dump(args, cli.home, &config).await,
        Commands::Locate(args) => dcdump::cli::commands::locate(args, cli.home, &config).await,
        Commands::Extract(args) => dcdump::cli::commands::extract(args).await,
        Commands::Config(args) => {
            dcdump::cli::commands::config(args, &config_manager, &config).await
        }
    }
}
