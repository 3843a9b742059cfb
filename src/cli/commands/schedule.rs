//! Schedule command implementation
//!
//! Keeps running sample batches on a fixed interval until SIGINT or SIGTERM.

use crate::adapters::database::create_taxon_store;
use crate::config::load_config;
use crate::core::sync::{Scheduler, SyncOrchestrator};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Arguments for the schedule command
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Override sync.schedule_interval_seconds
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Override sync.sample_size
    #[arg(long, value_name = "N")]
    pub sample: Option<usize>,

    /// Crawl GBIF but write nothing
    #[arg(long)]
    pub dry_run: bool,
}

impl ScheduleArgs {
    /// Execute the schedule command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if let Some(interval) = self.interval {
            config.sync.schedule_interval_seconds = interval;
        }
        if let Some(sample) = self.sample {
            config.sync.sample_size = sample;
        }
        if self.dry_run {
            config.application.dry_run = true;
        }
        if let Err(e) = config.validate() {
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let store = match create_taxon_store(&config).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create taxon store");
                eprintln!("Failed to connect to database: {e}");
                return Ok(4);
            }
        };

        let orchestrator = match SyncOrchestrator::new(&config, store, shutdown_signal.clone()) {
            Ok(o) => Arc::new(o),
            Err(e) => {
                eprintln!("Failed to initialize sync: {e}");
                return Ok(5);
            }
        };

        let scheduler = match Scheduler::new(
            orchestrator,
            Duration::from_secs(config.sync.schedule_interval_seconds),
            config.sync.sample_size,
        ) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{e}");
                eprintln!("Set sync.schedule_interval_seconds or pass --interval");
                return Ok(2);
            }
        };

        println!(
            "⏱️  Scheduling a batch of {} taxa every {}s (Ctrl+C to stop)",
            config.sync.sample_size, config.sync.schedule_interval_seconds
        );

        let report = scheduler.run(shutdown_signal).await;

        println!();
        println!("📊 Scheduler Summary:");
        println!("  Runs: {}", report.runs);
        println!("  Taxa updated: {}", report.taxa_updated);
        println!("  Taxa failed: {}", report.taxa_failed);
        println!("  Selection errors: {}", report.selection_errors);

        Ok(130)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_schedule_without_interval_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"database_target = \"memory\"\n").unwrap();
        file.flush().unwrap();

        let args = ScheduleArgs {
            interval: None,
            sample: None,
            dry_run: false,
        };
        let (_tx, rx) = watch::channel(false);
        let code = args
            .execute(file.path().to_str().unwrap(), rx)
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_schedule_stops_on_shutdown() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"database_target = \"memory\"\n").unwrap();
        file.flush().unwrap();

        let args = ScheduleArgs {
            interval: Some(3600),
            sample: None,
            dry_run: true,
        };
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let code = args
            .execute(file.path().to_str().unwrap(), rx)
            .await
            .unwrap();
        assert_eq!(code, 130);
    }
}
