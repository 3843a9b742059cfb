//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for lastseen using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// lastseen - most recent GBIF sighting per country for tracked taxa
#[derive(Parser, Debug)]
#[command(name = "lastseen")]
#[command(version, about, long_about = None)]
#[command(author = "lastseen Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "lastseen.toml", env = "LASTSEEN_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LASTSEEN_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch and store the latest observations for a single taxon
    Fetch(commands::fetch::FetchArgs),

    /// Run one batch over explicit taxa or a sample of outdated ones
    Sync(commands::sync::SyncArgs),

    /// Run batches on a fixed interval until interrupted
    Schedule(commands::schedule::ScheduleArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show store statistics
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_sync() {
        let cli = Cli::parse_from(["lastseen", "sync"]);
        assert_eq!(cli.config, "lastseen.toml");
        match cli.command {
            Commands::Sync(args) => {
                assert!(args.taxon_ids.is_empty());
                assert!(args.sample.is_none());
                assert!(!args.dry_run);
            }
            other => panic!("expected sync, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_sync_with_ids_and_flags() {
        let cli = Cli::parse_from([
            "lastseen", "sync", "4492208", "2480506", "--sample", "20", "--dry-run",
        ]);
        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.taxon_ids, vec!["4492208", "2480506"]);
                assert_eq!(args.sample, Some(20));
                assert!(args.dry_run);
            }
            other => panic!("expected sync, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_fetch() {
        let cli = Cli::parse_from(["lastseen", "fetch", "4492208"]);
        match cli.command {
            Commands::Fetch(args) => assert_eq!(args.taxon_id, "4492208"),
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_fetch_requires_taxon() {
        assert!(Cli::try_parse_from(["lastseen", "fetch"]).is_err());
    }

    #[test]
    fn test_cli_parse_schedule_interval() {
        let cli = Cli::parse_from(["lastseen", "schedule", "--interval", "3600"]);
        match cli.command {
            Commands::Schedule(args) => assert_eq!(args.interval, Some(3600)),
            other => panic!("expected schedule, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["lastseen", "--config", "custom.toml", "status"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["lastseen", "--log-level", "debug", "status"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["lastseen", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["lastseen", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
