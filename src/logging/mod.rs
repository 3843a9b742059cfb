//! Logging and observability
//!
//! Structured logging through `tracing`, plus a few macros so the sync engine
//! reports the same fields everywhere.
//!
//! ```no_run
//! use lastseen::logging::init_logging;
//! use lastseen::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(taxon_id = "4492208", "Fetching taxon");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a per-taxon sync
///
/// ```no_run
/// use lastseen::log_sync_start;
/// use lastseen::domain::TaxonId;
///
/// let taxon_id = TaxonId::new("4492208").unwrap();
/// log_sync_start!(&taxon_id);
/// ```
#[macro_export]
macro_rules! log_sync_start {
    ($taxon_id:expr) => {
        tracing::info!(taxon_id = %$taxon_id, "Starting taxon sync");
    };
}

/// Log the completion of a per-taxon sync
#[macro_export]
macro_rules! log_sync_complete {
    ($taxon_id:expr, $count:expr, $duration:expr) => {
        tracing::info!(
            taxon_id = %$taxon_id,
            observations = $count,
            duration_ms = $duration.as_millis() as u64,
            "Taxon sync completed"
        );
    };
}

/// Log an error with context
///
/// ```no_run
/// use lastseen::log_error_with_context;
/// use lastseen::domain::SyncError;
///
/// let error = SyncError::Database("connection reset".to_string());
/// log_error_with_context!(&error, "Failed to replace observations");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log crawl progress for one country
#[macro_export]
macro_rules! log_page_progress {
    ($country:expr, $offset:expr, $count:expr) => {
        tracing::debug!(
            country = %$country,
            offset = $offset,
            count = $count,
            "Fetched occurrence page"
        );
    };
}
