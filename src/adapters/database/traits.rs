//! Storage abstraction traits
//!
//! The sync engine talks to storage only through [`TaxonStore`], so the
//! PostgreSQL and in-memory backends are interchangeable.

use crate::domain::{Observation, Result, Taxon, TaxonId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Row counts reported by `lastseen status`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Taxa that are not synonyms
    pub taxa: u64,

    /// Stored observation rows
    pub observations: u64,

    /// Non-synonym taxa with a fetch at or after the `since` bound
    pub fetched_since: u64,
}

/// Storage for taxa and their latest observations
///
/// Implementations make [`TaxonStore::replace_observations`] atomic. Write
/// serialization across callers is the job of the persistence coordinator.
#[async_trait]
pub trait TaxonStore: Send + Sync {
    /// Human-readable backend name for logs
    fn backend_name(&self) -> &'static str;

    /// Test that the backend is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Create tables and indexes if they don't exist
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    async fn ensure_schema(&self) -> Result<()>;

    /// Look up a taxon by its own identifier
    ///
    /// # Errors
    ///
    /// Returns an error on storage failure; a missing row is `Ok(None)`.
    async fn find_taxon(&self, taxon_id: &TaxonId) -> Result<Option<Taxon>>;

    /// Set `last_fetch` on every taxon whose taxon or synonym ID equals `taxon_id`
    ///
    /// Returns the number of rows updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    async fn mark_fetched(&self, taxon_id: &TaxonId, fetched_at: DateTime<Utc>) -> Result<u64>;

    /// Delete every observation of `taxon_id` and insert `observations` in one
    /// transaction, ignoring rows whose (taxon, country) key is already present
    ///
    /// Returns the number of rows inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if either step fails; nothing is committed in that case.
    async fn replace_observations(
        &self,
        taxon_id: &TaxonId,
        observations: &[Observation],
    ) -> Result<u64>;

    /// Random sample of up to `limit` non-synonym taxa whose `last_fetch` is
    /// null or later than `fetched_after`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn sample_taxa(&self, limit: usize, fetched_after: DateTime<Utc>)
        -> Result<Vec<TaxonId>>;

    /// Stored observations of a canonical taxon, ordered by country
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn observations_for(&self, taxon_id: &TaxonId) -> Result<Vec<Observation>>;

    /// Row counts for status reporting
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn statistics(&self, since: DateTime<Utc>) -> Result<StoreStatistics>;
}
