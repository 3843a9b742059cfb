//! External system integrations for lastseen.
//!
//! - [`gbif`] - GBIF occurrence search client
//! - [`database`] - Storage abstraction layer (trait-based)
//! - [`postgresql`] - PostgreSQL implementation
//! - [`memory`] - In-memory implementation for tests and local runs
//!
//! # Design Pattern
//!
//! The storage layer is a trait object chosen at startup from
//! `database_target`, so the sync engine never names a backend.
//!
//! ```rust,no_run
//! use lastseen::adapters::database::create_taxon_store;
//! use lastseen::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("lastseen.toml")?;
//! let store = create_taxon_store(&config).await?;
//! println!("using {}", store.backend_name());
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod gbif;
pub mod memory;
pub mod postgresql;
