//! In-memory implementation of [`TaxonStore`]
//!
//! Used for dry local runs and tests. Taxa can be seeded from a JSON file holding
//! an array of taxa in their serde form.

use crate::adapters::database::traits::{StoreStatistics, TaxonStore};
use crate::domain::{CountryCode, Observation, Result, SyncError, Taxon, TaxonId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryTaxonStore {
    taxa: RwLock<BTreeMap<TaxonId, Taxon>>,
    observations: RwLock<BTreeMap<TaxonId, Vec<Observation>>>,
}

impl InMemoryTaxonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `taxa`
    pub fn with_taxa(taxa: impl IntoIterator<Item = Taxon>) -> Self {
        let taxa = taxa
            .into_iter()
            .map(|taxon| (taxon.taxon_id.clone(), taxon))
            .collect();
        Self {
            taxa: RwLock::new(taxa),
            observations: RwLock::default(),
        }
    }

    /// Store seeded from a JSON array of taxa
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SyncError::Configuration(format!("Failed to read taxa file {}: {}", path.display(), e))
        })?;
        let taxa: Vec<Taxon> = serde_json::from_str(&contents)?;

        tracing::info!(path = %path.display(), taxa = taxa.len(), "Seeded in-memory store");
        Ok(Self::with_taxa(taxa))
    }

    /// Insert or overwrite a taxon
    pub async fn insert_taxon(&self, taxon: Taxon) {
        self.taxa
            .write()
            .await
            .insert(taxon.taxon_id.clone(), taxon);
    }
}

fn sample(mut candidates: Vec<TaxonId>, limit: usize) -> Vec<TaxonId> {
    let mut rng = rand::thread_rng();
    candidates.shuffle(&mut rng);
    candidates.truncate(limit);
    candidates
}

#[async_trait]
impl TaxonStore for InMemoryTaxonStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn find_taxon(&self, taxon_id: &TaxonId) -> Result<Option<Taxon>> {
        Ok(self.taxa.read().await.get(taxon_id).cloned())
    }

    async fn mark_fetched(&self, taxon_id: &TaxonId, fetched_at: DateTime<Utc>) -> Result<u64> {
        let mut taxa = self.taxa.write().await;
        let mut updated = 0;
        for taxon in taxa.values_mut() {
            if &taxon.taxon_id == taxon_id || taxon.synonym_id.as_ref() == Some(taxon_id) {
                taxon.last_fetch = Some(fetched_at);
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn replace_observations(
        &self,
        taxon_id: &TaxonId,
        observations: &[Observation],
    ) -> Result<u64> {
        let mut seen: HashSet<&CountryCode> = HashSet::new();
        let rows: Vec<Observation> = observations
            .iter()
            .filter(|observation| seen.insert(&observation.country_code))
            .map(|observation| Observation {
                taxon_id: taxon_id.clone(),
                ..observation.clone()
            })
            .collect();
        let inserted = rows.len() as u64;

        // A single write guard makes delete and insert one step for readers
        let mut stored = self.observations.write().await;
        if rows.is_empty() {
            stored.remove(taxon_id);
        } else {
            stored.insert(taxon_id.clone(), rows);
        }

        Ok(inserted)
    }

    async fn sample_taxa(
        &self,
        limit: usize,
        fetched_after: DateTime<Utc>,
    ) -> Result<Vec<TaxonId>> {
        let candidates: Vec<TaxonId> = self
            .taxa
            .read()
            .await
            .values()
            .filter(|taxon| !taxon.is_synonym)
            .filter(|taxon| taxon.last_fetch.map_or(true, |at| at > fetched_after))
            .map(|taxon| taxon.taxon_id.clone())
            .collect();

        Ok(sample(candidates, limit))
    }

    async fn observations_for(&self, taxon_id: &TaxonId) -> Result<Vec<Observation>> {
        let mut rows = self
            .observations
            .read()
            .await
            .get(taxon_id)
            .cloned()
            .unwrap_or_default();
        rows.sort_by(|a, b| a.country_code.cmp(&b.country_code));
        Ok(rows)
    }

    async fn statistics(&self, since: DateTime<Utc>) -> Result<StoreStatistics> {
        let taxa = self.taxa.read().await;
        let observations = self.observations.read().await;

        let canonical = taxa.values().filter(|taxon| !taxon.is_synonym);
        Ok(StoreStatistics {
            taxa: canonical.clone().count() as u64,
            observations: observations.values().map(Vec::len).sum::<usize>() as u64,
            fetched_since: canonical
                .filter(|taxon| taxon.last_fetch.is_some_and(|at| at >= since))
                .count() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::io::Write;

    fn taxon(id: &str) -> Taxon {
        Taxon::builder().taxon_id(id).unwrap().build().unwrap()
    }

    fn observation(taxon: &str, country: &str, date: &str) -> Observation {
        Observation::new(
            format!("{taxon}-{country}-{date}"),
            TaxonId::new(taxon).unwrap(),
            CountryCode::new(country).unwrap(),
            date,
            date,
        )
    }

    #[tokio::test]
    async fn test_mark_fetched_touches_synonyms() {
        let synonym = Taxon::builder()
            .taxon_id("8071112")
            .unwrap()
            .synonym_of("4492208")
            .unwrap()
            .build()
            .unwrap();
        let store = InMemoryTaxonStore::with_taxa(vec![taxon("4492208"), synonym, taxon("1")]);

        let now = Utc::now();
        let updated = store
            .mark_fetched(&TaxonId::new("4492208").unwrap(), now)
            .await
            .unwrap();

        assert_eq!(updated, 2);
        let other = store.find_taxon(&TaxonId::new("1").unwrap()).await.unwrap().unwrap();
        assert!(other.last_fetch.is_none());
    }

    #[tokio::test]
    async fn test_replace_ignores_duplicate_countries() {
        let store = InMemoryTaxonStore::new();
        let taxon_id = TaxonId::new("4492208").unwrap();

        let inserted = store
            .replace_observations(
                &taxon_id,
                &[
                    observation("4492208", "AT", "2020-01-01"),
                    observation("4492208", "AT", "2021-01-01"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(inserted, 1);
        let rows = store.observations_for(&taxon_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].observation_date, "2020-01-01");
    }

    #[tokio::test]
    async fn test_sample_respects_limit_and_predicate() {
        let now = Utc::now();
        let cutoff = now - Duration::days(180);

        let recent = Taxon::builder()
            .taxon_id("2")
            .unwrap()
            .last_fetch(now - Duration::days(10))
            .build()
            .unwrap();
        let stale = Taxon::builder()
            .taxon_id("3")
            .unwrap()
            .last_fetch(now - Duration::days(400))
            .build()
            .unwrap();
        let store = InMemoryTaxonStore::with_taxa(vec![taxon("1"), recent, stale]);

        let mut sampled = store.sample_taxa(10, cutoff).await.unwrap();
        sampled.sort();
        let ids: Vec<&str> = sampled.iter().map(TaxonId::as_str).collect();
        assert_eq!(ids, vec!["1", "2"]);

        assert_eq!(store.sample_taxa(1, cutoff).await.unwrap().len(), 1);
        assert!(store.sample_taxa(0, cutoff).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_statistics() {
        let now = Utc::now();
        let fetched = Taxon::builder()
            .taxon_id("2")
            .unwrap()
            .last_fetch(now)
            .build()
            .unwrap();
        let store = InMemoryTaxonStore::with_taxa(vec![taxon("1"), fetched]);
        store
            .replace_observations(
                &TaxonId::new("2").unwrap(),
                &[observation("2", "AT", "2020-01-01"), observation("2", "DE", "2019-01-01")],
            )
            .await
            .unwrap();

        let stats = store.statistics(now - Duration::days(365)).await.unwrap();
        assert_eq!(
            stats,
            StoreStatistics {
                taxa: 2,
                observations: 2,
                fetched_since: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_from_json_file() {
        let taxa = vec![taxon("4492208")];
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&taxa).unwrap().as_bytes())
            .unwrap();
        file.flush().unwrap();

        let store = InMemoryTaxonStore::from_json_file(file.path()).unwrap();
        let found = store.find_taxon(&TaxonId::new("4492208").unwrap()).await.unwrap();
        assert!(found.is_some());
    }
}
