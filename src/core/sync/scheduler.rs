//! Periodic batch scheduling
//!
//! Runs `select_outdated` + `run_batch` on a fixed interval. Runs never overlap:
//! a run that outlasts the interval delays the next tick.

use super::orchestrator::SyncOrchestrator;
use super::summary::RunSummary;
use crate::domain::{Result, SyncError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

pub struct Scheduler {
    orchestrator: Arc<SyncOrchestrator>,
    interval: Duration,
    sample_size: usize,
}

/// Totals over every run of a scheduler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleReport {
    pub runs: usize,
    pub taxa_updated: usize,
    pub taxa_failed: usize,
    pub selection_errors: usize,
}

impl ScheduleReport {
    fn add(&mut self, summary: &RunSummary) {
        self.runs += 1;
        self.taxa_updated += summary.updated;
        self.taxa_failed += summary.failed;
    }
}

impl Scheduler {
    /// # Errors
    ///
    /// Returns a configuration error for a zero interval; a zero interval means
    /// scheduling is disabled.
    pub fn new(
        orchestrator: Arc<SyncOrchestrator>,
        interval: Duration,
        sample_size: usize,
    ) -> Result<Self> {
        if interval.is_zero() {
            return Err(SyncError::Configuration(
                "sync.schedule_interval_seconds is 0; scheduling is disabled".to_string(),
            ));
        }

        Ok(Self {
            orchestrator,
            interval,
            sample_size,
        })
    }

    /// Run batches until shutdown is requested
    ///
    /// The first batch starts immediately.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> ScheduleReport {
        let mut report = ScheduleReport::default();
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            sample_size = self.sample_size,
            "Scheduler started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.wait_for(|requested| *requested) => break,
            }

            let ids = match self.orchestrator.select_outdated(self.sample_size).await {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to select taxa, skipping run");
                    report.selection_errors += 1;
                    continue;
                }
            };

            let summary = self.orchestrator.run_batch(&ids).await;
            report.add(&summary);
            if summary.interrupted {
                break;
            }
        }

        tracing::info!(runs = report.runs, "Scheduler stopped");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTaxonStore;
    use crate::config::{
        ApplicationConfig, DatabaseTarget, GbifConfig, LastseenConfig, LoggingConfig,
        MemoryConfig, SyncConfig,
    };

    fn orchestrator(shutdown: watch::Receiver<bool>) -> Arc<SyncOrchestrator> {
        let config = LastseenConfig {
            application: ApplicationConfig::default(),
            gbif: GbifConfig {
                base_url: "http://127.0.0.1:1".to_string(),
                page_delay_ms: 0,
                ..Default::default()
            },
            sync: SyncConfig::default(),
            database_target: DatabaseTarget::Memory,
            postgresql: None,
            memory: MemoryConfig::default(),
            logging: LoggingConfig::default(),
        };
        Arc::new(
            SyncOrchestrator::new(&config, Arc::new(InMemoryTaxonStore::new()), shutdown).unwrap(),
        )
    }

    #[test]
    fn test_zero_interval_disables() {
        let (_tx, rx) = watch::channel(false);
        let result = Scheduler::new(orchestrator(rx), Duration::ZERO, 5);
        assert!(matches!(result, Err(SyncError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_runs_until_shutdown() {
        let (tx, rx) = watch::channel(false);
        let scheduler = Scheduler::new(orchestrator(rx.clone()), Duration::from_millis(20), 5).unwrap();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(90)).await;
            let _ = tx.send(true);
        });

        let report = tokio::time::timeout(Duration::from_secs(5), scheduler.run(rx))
            .await
            .expect("scheduler stops on shutdown");

        assert!(report.runs >= 1);
        assert_eq!(report.selection_errors, 0);
    }
}
