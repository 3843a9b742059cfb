//! Status command implementation
//!
//! This module implements the `status` command for displaying store
//! statistics.

use crate::adapters::database::create_taxon_store;
use crate::config::load_config;
use chrono::{Months, Utc};
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Window in months for the "fetched recently" count
    #[arg(long, default_value_t = 12)]
    pub months: u32,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking store status");

        println!("📊 lastseen Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {}", e);
                return Ok(2);
            }
        };

        let store = match create_taxon_store(&config).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to connect to database");
                println!("   Error: {}", e);
                return Ok(4);
            }
        };

        let now = Utc::now();
        let since = now.checked_sub_months(Months::new(self.months)).unwrap_or(now);

        let stats = match store.statistics(since).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to read statistics");
                println!("   Error: {}", e);
                return Ok(5);
            }
        };

        println!("  Backend: {}", store.backend_name());
        println!("  Taxa: {}", stats.taxa);
        println!("  Observations: {}", stats.observations);
        println!(
            "  Fetched in the last {} month(s): {}",
            self.months, stats.fetched_since
        );
        println!();

        if stats.taxa == 0 {
            println!("No taxa found. Load a taxonomy before running 'lastseen sync'.");
        }

        Ok(0)
    }
}
