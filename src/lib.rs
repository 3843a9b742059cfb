//! # lastseen - latest GBIF sightings per country
//!
//! lastseen keeps, for every tracked taxon, the most recent occurrence record
//! per country as reported by the GBIF occurrence search API. Synonyms are
//! folded into their accepted taxon, and taxa are refreshed in small random
//! batches so a large taxonomy is covered over time.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Sync engine (date cleanup, discovery, crawl, persistence, batches)
//! - [`adapters`] - External integrations (GBIF, PostgreSQL, in-memory store)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lastseen::adapters::database::create_taxon_store;
//! use lastseen::config::load_config;
//! use lastseen::core::sync::SyncOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("lastseen.toml")?;
//!     let store = create_taxon_store(&config).await?;
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//!     let orchestrator = SyncOrchestrator::new(&config, store, shutdown_rx)?;
//!     let ids = orchestrator.select_outdated(config.sync.sample_size).await?;
//!     let summary = orchestrator.run_batch(&ids).await;
//!
//!     println!("Updated {} taxa", summary.updated);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`], backed by [`domain::SyncError`].
//! GBIF failures never surface as errors during a crawl; they end the affected
//! query and are logged.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
