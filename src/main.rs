//! Chanko - package arena manager
//!
//! CLI entry point that dispatches to subcommands.

use chanko::arena::ArenaSettings;
use chanko::cli::{Cli, Commands};
use chanko::config::ConfigManager;
use chanko::error::ChankoResult;
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
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

async fn run() -> ChankoResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("chanko=warn"),
        1 => EnvFilter::new("chanko=info"),
        _ => EnvFilter::new("chanko=debug"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    if config.general.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    debug!("Using config {}", config_manager.path().display());

    let settings = ArenaSettings::from_config(&config, cli.base.clone())
        .with_lock(cli.lock || config.arena.lock);

    match cli.command {
        Commands::Init(args) => chanko::cli::commands::init(args, &settings).await,
        Commands::Status(args) => chanko::cli::commands::status(args, &settings).await,
        Commands::Refresh(args) => chanko::cli::commands::refresh(args, &settings, &config).await,
        Commands::Config(args) => {
            chanko::cli::commands::config(args, &config, &config_manager).await
        }
    }
}
