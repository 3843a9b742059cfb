//! Configuration management for lastseen.
//!
//! Configuration is read from a TOML file (by default `lastseen.toml`) with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `LASTSEEN_<SECTION>_<KEY>` overrides applied after parsing
//! - Defaults for every optional setting
//! - Validation before anything connects
//!
//! # Example Configuration
//!
//! ```toml
//! database_target = "postgresql"
//!
//! [application]
//! log_level = "info"
//!
//! [gbif]
//! user_agent_prefix = "museum"
//! page_delay_ms = 1000
//!
//! [sync]
//! sample_size = 5
//! schedule_interval_seconds = 3600
//!
//! [postgresql]
//! connection_string = "${LASTSEEN_PG_DSN}"
//! ssl_mode = "disable"
//! ```
//!
//! ```rust,no_run
//! use lastseen::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("lastseen.toml")?;
//! println!("GBIF: {}", config.gbif.base_url);
//! println!("Sample size: {}", config.sync.sample_size);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, DatabaseTarget, GbifConfig, LastseenConfig, LoggingConfig, MemoryConfig,
    PostgreSQLConfig, SyncConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
