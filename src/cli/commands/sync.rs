//! Sync command implementation
//!
//! Runs one batch, either over the taxa given on the command line or over a
//! random sample of outdated taxa taken from the store.

use super::{parse_taxon_ids, report_summary, shutdown_deadline};
use crate::adapters::database::create_taxon_store;
use crate::config::load_config;
use crate::core::sync::SyncOrchestrator;
use clap::Args;
use std::time::Duration;
use tokio::sync::watch;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Taxon keys to sync; when omitted, outdated taxa are sampled from the store
    #[arg(value_name = "TAXON_ID")]
    pub taxon_ids: Vec<String>,

    /// Override sync.sample_size for this run
    #[arg(long, value_name = "N")]
    pub sample: Option<usize>,

    /// Crawl GBIF but write nothing, not even fetch timestamps
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting sync command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if let Some(sample) = self.sample {
            tracing::info!(sample, "Overriding sample size from CLI");
            config.sync.sample_size = sample;
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let explicit_ids = match parse_taxon_ids(&self.taxon_ids) {
            Ok(ids) => ids,
            Err(e) => {
                eprintln!("{e}");
                return Ok(2);
            }
        };

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - Nothing will be written to the database");
            println!();
        }

        let store = match create_taxon_store(&config).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create taxon store");
                eprintln!("Failed to connect to database: {e}");
                return Ok(4);
            }
        };

        let grace = Duration::from_secs(config.sync.shutdown_timeout_secs);
        let orchestrator = match SyncOrchestrator::new(&config, store, shutdown_signal.clone()) {
            Ok(o) => o,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build sync engine");
                eprintln!("Failed to initialize sync: {e}");
                return Ok(5);
            }
        };

        let taxon_ids = if explicit_ids.is_empty() {
            match orchestrator.select_outdated(config.sync.sample_size).await {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to select outdated taxa");
                    eprintln!("Failed to select taxa: {e}");
                    return Ok(5);
                }
            }
        } else {
            explicit_ids
        };

        if taxon_ids.is_empty() {
            println!("No outdated taxa found. Nothing to do.");
            return Ok(0);
        }

        println!("🚀 Syncing {} taxa...", taxon_ids.len());

        let summary = tokio::select! {
            summary = orchestrator.run_batch(&taxon_ids) => summary,
            _ = shutdown_deadline(shutdown_signal, grace) => {
                tracing::warn!(grace_secs = grace.as_secs(), "Shutdown timeout exceeded, abandoning sync run");
                eprintln!("Shutdown timeout exceeded; abandoning the in-flight taxon");
                return Ok(130);
            }
        };

        Ok(report_summary(&summary))
    }
}
