//! Batch run summary and reporting

use crate::domain::TaxonId;
use std::time::Duration;

/// Outcome counters for one batch run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Taxa a fetch was started for
    pub attempted: usize,

    /// Taxa whose observations were replaced
    pub updated: usize,

    /// Taxa that yielded no observations
    pub empty: usize,

    /// Taxa that failed
    pub failed: usize,

    /// Observation rows inserted (or that would be, in dry-run mode)
    pub observations_written: u64,

    pub duration: Duration,

    pub errors: Vec<TaxonFailure>,

    /// Whether the batch stopped early on a shutdown signal
    pub interrupted: bool,

    pub dry_run: bool,
}

impl RunSummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Count a failure and keep its message
    pub fn record_failure(&mut self, taxon_id: &TaxonId, message: impl Into<String>) {
        self.failed += 1;
        self.errors.push(TaxonFailure {
            taxon_id: taxon_id.clone(),
            message: message.into(),
        });
    }

    pub fn is_successful(&self) -> bool {
        self.failed == 0 && !self.interrupted
    }

    pub fn log_summary(&self) {
        tracing::info!(
            attempted = self.attempted,
            updated = self.updated,
            empty = self.empty,
            failed = self.failed,
            observations_written = self.observations_written,
            duration_secs = self.duration.as_secs(),
            interrupted = self.interrupted,
            dry_run = self.dry_run,
            "Sync run completed"
        );

        for failure in &self.errors {
            tracing::warn!(
                taxon_id = %failure.taxon_id,
                message = %failure.message,
                "Taxon sync failed"
            );
        }
    }
}

/// A taxon that failed during a batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonFailure {
    pub taxon_id: TaxonId,
    pub message: String,
}
