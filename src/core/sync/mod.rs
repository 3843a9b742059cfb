//! Batch and single-taxon synchronization
//!
//! - [`SyncOrchestrator`] - per-taxon fetch, batch runs and taxon selection
//! - [`Scheduler`] - periodic batch runs
//! - [`RunSummary`] - counters reported after each batch

pub mod orchestrator;
pub mod scheduler;
pub mod summary;

pub use orchestrator::{FetchedObservations, StoreOutcome, SyncOrchestrator};
pub use scheduler::{ScheduleReport, Scheduler};
pub use summary::{RunSummary, TaxonFailure};
