//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Chanko - package arena manager
///
/// Initializes `arena.union` arenas and keeps their package caches in
/// step with the arena's sources.list.
#[derive(Parser, Debug)]
#[command(name = "chanko")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CHANKO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Arena base directory (defaults to current directory)
    #[arg(short, long, global = true, env = "CHANKO_BASE")]
    pub base: Option<PathBuf>,

    /// Hold an exclusive lock on the arena while it is created or opened
    #[arg(long, global = true)]
    pub lock: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize an arena from a sources.list
    Init(InitArgs),

    /// Show arena state without refreshing anything
    Status(StatusArgs),

    /// Activate the arena and refresh its caches
    Refresh(RefreshArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// sources.list to copy into the arena
    pub sources_list: PathBuf,
}

/// Arguments for the status command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the refresh command
///
/// Without flags the remote cache is refreshed, once.
#[derive(Parser, Debug)]
pub struct RefreshArgs {
    /// Refresh only the local cache
    #[arg(long)]
    pub local: bool,

    /// Refresh both caches
    #[arg(long, conflicts_with = "local")]
    pub all: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., arena.lock)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for the status command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple key=value lines
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_init() {
        let cli = Cli::parse_from(["chanko", "init", "/etc/apt/sources.list"]);
        match cli.command {
            Commands::Init(args) => {
                assert_eq!(args.sources_list, PathBuf::from("/etc/apt/sources.list"))
            }
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn cli_init_requires_sources_list() {
        assert!(Cli::try_parse_from(["chanko", "init"]).is_err());
    }

    #[test]
    fn cli_parses_status_format() {
        let cli = Cli::parse_from(["chanko", "status", "--format", "json"]);
        match cli.command {
            Commands::Status(args) => assert!(matches!(args.format, OutputFormat::Json)),
            _ => panic!("expected Status command"),
        }
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "chanko",
            "refresh",
            "--base",
            "/srv/arena.union",
            "--lock",
            "-vv",
        ]);
        assert_eq!(cli.base, Some(PathBuf::from("/srv/arena.union")));
        assert!(cli.lock);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Refresh(args) => {
                assert!(!args.local);
                assert!(!args.all);
            }
            _ => panic!("expected Refresh command"),
        }
    }

    #[test]
    fn cli_refresh_flags_conflict() {
        assert!(Cli::try_parse_from(["chanko", "refresh", "--local", "--all"]).is_err());
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["chanko", "config", "set", "arena.lock", "true"]);
        match cli.command {
            Commands::Config(ConfigArgs {
                action: Some(ConfigAction::Set { key, value }),
            }) => {
                assert_eq!(key, "arena.lock");
                assert_eq!(value, "true");
            }
            _ => panic!("expected Config Set command"),
        }
    }

    #[test]
    fn cli_parses_bare_config() {
        let cli = Cli::parse_from(["chanko", "config"]);
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigArgs { action: None })
        ));
    }
}
