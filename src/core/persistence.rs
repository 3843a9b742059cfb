//! Serialized writes to the taxon store
//!
//! Every write from the interactive path and the scheduled batch goes through one
//! [`PersistenceCoordinator`], whose write lane admits one operation at a time.

use crate::adapters::database::TaxonStore;
use crate::domain::{Observation, Result, TaxonId};
use chrono::{SubsecRound, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct PersistenceCoordinator {
    store: Arc<dyn TaxonStore>,
    write_lane: Mutex<()>,
}

impl PersistenceCoordinator {
    pub fn new(store: Arc<dyn TaxonStore>) -> Self {
        Self {
            store,
            write_lane: Mutex::new(()),
        }
    }

    /// Record a fetch attempt for `taxon_id` and every synonym pointing at it
    ///
    /// Called before crawling so an aborted crawl still counts as an attempt.
    /// Returns the number of taxa touched.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the update fails.
    pub async fn mark_fetched(&self, taxon_id: &TaxonId) -> Result<u64> {
        let fetched_at = Utc::now().trunc_subsecs(0);

        let _lane = self.write_lane.lock().await;
        let touched = self.store.mark_fetched(taxon_id, fetched_at).await?;

        tracing::debug!(
            taxon_id = %taxon_id,
            touched,
            fetched_at = %fetched_at.to_rfc3339(),
            "Marked taxon as fetched"
        );
        Ok(touched)
    }

    /// Replace the stored observations of `taxon_id` with `observations`
    ///
    /// # Errors
    ///
    /// Returns the store's error; the previous rows are left intact in that case.
    pub async fn replace(&self, taxon_id: &TaxonId, observations: &[Observation]) -> Result<u64> {
        let _lane = self.write_lane.lock().await;
        self.store.replace_observations(taxon_id, observations).await
    }
}
