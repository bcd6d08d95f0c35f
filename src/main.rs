//! pkgstash - bounded on-disk cache for package artifacts
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use pkgstash::cli::{self, Cli, Commands};
use pkgstash::config::ConfigManager;
use pkgstash::error::StashResult;
use pkgstash::ui;
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

async fn run() -> StashResult<()> {
    let cli = Cli::parse();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    let file_config = config_manager.load().await?;

    init_logging(cli.verbose, &file_config.general.log_format);
    ui::init_theme();
    debug!("Loaded configuration from {}", config_manager.path().display());

    let mut config = file_config.clone();
    cli::apply_overrides(&mut config, cli.cache_dir, cli.no_cache);

    match cli.command {
        Commands::Download(args) => cli::commands::download(args, &config).await,
        Commands::Delete(args) => cli::commands::delete(args, &config).await,
        Commands::List(args) => cli::commands::list(args, &config).await,
        Commands::Prune(args) => cli::commands::prune(args, &config).await,
        Commands::Clear(args) => cli::commands::clear(args, &config).await,
        Commands::Config(args) => {
            cli::commands::config(args, &file_config, &config_manager).await
        }
    }
}

/// 0 = warn (spinners only), 1 = info, 2 = debug, 3+ = trace
fn init_logging(verbose: u8, log_format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("pkgstash=warn"),
        1 => EnvFilter::new("pkgstash=info"),
        2 => EnvFilter::new("pkgstash=debug"),
        _ => EnvFilter::new("pkgstash=trace"),
    };

    // Logs go to stderr; stdout carries artifact paths and listings
    if log_format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init();
    }
}
