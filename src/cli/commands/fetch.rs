//! Fetch command implementation
//!
//! Interactive single-taxon fetch: resolves synonyms, crawls GBIF and writes
//! the result straight away.

use super::shutdown_deadline;
use crate::adapters::database::create_taxon_store;
use crate::config::load_config;
use crate::core::sync::{StoreOutcome, SyncOrchestrator};
use crate::domain::{SyncError, TaxonId};
use clap::Args;
use std::time::Duration;
use tokio::sync::watch;

/// Arguments for the fetch command
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// GBIF taxon key
    #[arg(value_name = "TAXON_ID")]
    pub taxon_id: String,

    /// Crawl GBIF but write nothing
    #[arg(long)]
    pub dry_run: bool,
}

impl FetchArgs {
    /// Execute the fetch command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let taxon_id = match TaxonId::new(self.taxon_id.as_str()) {
            Ok(id) => id,
            Err(e) => {
                eprintln!("Invalid taxon id: {e}");
                return Ok(2);
            }
        };
        tracing::info!(taxon_id = %taxon_id, "Starting fetch command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

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
            Ok(o) => o.with_dry_run(self.dry_run || config.application.dry_run),
            Err(e) => {
                eprintln!("Failed to initialize fetch: {e}");
                return Ok(5);
            }
        };

        println!("🔎 Fetching latest observations for taxon {taxon_id}...");

        let outcome = tokio::select! {
            outcome = orchestrator.fetch_and_store(&taxon_id) => outcome,
            _ = shutdown_deadline(shutdown_signal, grace) => {
                eprintln!("Shutdown timeout exceeded; abandoning fetch");
                return Ok(130);
            }
        };

        match outcome {
            Ok(StoreOutcome::Stored { taxon_id, written }) => {
                println!("✅ Stored {written} observation(s) for taxon {taxon_id}");
                Ok(0)
            }
            Ok(StoreOutcome::Skipped { taxon_id, found }) => {
                println!("🔍 DRY RUN: found {found} observation(s) for taxon {taxon_id}, nothing written");
                Ok(0)
            }
            Ok(StoreOutcome::NoData { taxon_id }) => {
                println!("No usable observations found on GBIF for taxon {taxon_id}");
                Ok(0)
            }
            Err(SyncError::TaxonNotFound(id)) => {
                eprintln!("Taxon {id} is not in the local taxonomy");
                Ok(1)
            }
            Err(e) if e.is_cancelled() => {
                println!("⚠️  Fetch interrupted");
                Ok(130)
            }
            Err(e) => {
                tracing::error!(error = %e, "Fetch failed");
                eprintln!("Fetch failed: {e}");
                Ok(5)
            }
        }
    }
}
