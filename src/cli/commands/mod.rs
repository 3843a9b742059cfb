//! CLI command implementations
//!
//! Exit codes shared by every command:
//! 0 success, 1 partial failure, 2 configuration error, 4 connection error,
//! 5 fatal error, 130 interrupted.

pub mod fetch;
pub mod init;
pub mod schedule;
pub mod status;
pub mod sync;
pub mod validate;

use crate::core::sync::RunSummary;
use crate::domain::TaxonId;
use std::time::Duration;
use tokio::sync::watch;

/// Resolves once shutdown was requested and the grace period has run out
///
/// Never resolves if the signal sender goes away without requesting shutdown.
pub(crate) async fn shutdown_deadline(mut shutdown: watch::Receiver<bool>, grace: Duration) {
    if shutdown.wait_for(|requested| *requested).await.is_err() {
        std::future::pending::<()>().await;
    }
    tracing::info!(grace_secs = grace.as_secs(), "Waiting for in-flight taxon to finish");
    tokio::time::sleep(grace).await;
}

/// Parse CLI taxon ids, reporting the first invalid one
pub(crate) fn parse_taxon_ids(raw: &[String]) -> Result<Vec<TaxonId>, String> {
    raw.iter()
        .map(|id| TaxonId::new(id.trim()).map_err(|e| format!("invalid taxon id '{id}': {e}")))
        .collect()
}

/// Print a batch summary and map it to an exit code
pub(crate) fn report_summary(summary: &RunSummary) -> i32 {
    println!();
    println!("📊 Sync Summary:");
    println!("  Taxa attempted: {}", summary.attempted);
    println!("  Updated: {}", summary.updated);
    println!("  Without observations: {}", summary.empty);
    println!("  Failed: {}", summary.failed);
    if summary.dry_run {
        println!("  Observations found (not written): {}", summary.observations_written);
    } else {
        println!("  Observations written: {}", summary.observations_written);
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.errors.is_empty() {
        println!("⚠️  Errors encountered:");
        for failure in &summary.errors {
            println!("  - {}: {}", failure.taxon_id, failure.message);
        }
        println!();
    }

    if summary.interrupted {
        println!("⚠️  Sync interrupted gracefully. Remaining taxa stay outdated.");
        tracing::info!("Sync interrupted by user signal");
        130
    } else if summary.is_successful() {
        println!("✅ Sync completed successfully!");
        0
    } else {
        println!("⚠️  Sync completed with failures");
        1
    }
}
