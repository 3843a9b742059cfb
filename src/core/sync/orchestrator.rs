//! Sync orchestrator
//!
//! Composes synonym resolution, facet discovery, crawling and persistence into a
//! per-taxon fetch and a sequential batch run. Taxa are never processed in
//! parallel so the remote API sees one request at a time.

use super::summary::RunSummary;
use crate::adapters::database::TaxonStore;
use crate::adapters::gbif::GbifClient;
use crate::config::LastseenConfig;
use crate::core::fetch::{FacetDiscovery, ObservationCrawler};
use crate::core::persistence::PersistenceCoordinator;
use crate::core::shutdown;
use crate::core::synonyms::SynonymResolver;
use crate::domain::{Observation, Resolution, Result, SyncError, TaxonId};
use crate::{log_error_with_context, log_sync_complete, log_sync_start};
use chrono::{DateTime, Months, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Months after which a fetch no longer counts as recent
const STALENESS_MONTHS: u32 = 6;

/// Observations gathered for one canonical taxon
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedObservations {
    /// How the requested identifier was resolved
    pub resolution: Resolution,

    /// One observation per country, never empty
    pub observations: Vec<Observation>,
}

impl FetchedObservations {
    pub fn taxon_id(&self) -> &TaxonId {
        self.resolution.canonical()
    }
}

/// Outcome of an interactive single-taxon fetch
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOutcome {
    /// Observations were written
    Stored { taxon_id: TaxonId, written: u64 },

    /// Dry run: observations were found but not written
    Skipped { taxon_id: TaxonId, found: usize },

    /// GBIF reported nothing usable for the taxon
    NoData { taxon_id: TaxonId },
}

/// Entry point of the sync engine
///
/// # Example
///
/// ```no_run
/// use lastseen::adapters::database::create_taxon_store;
/// use lastseen::config::load_config;
/// use lastseen::core::sync::SyncOrchestrator;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("lastseen.toml")?;
/// let store = create_taxon_store(&config).await?;
/// let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
///
/// let orchestrator = SyncOrchestrator::new(&config, store, shutdown_rx)?;
/// let ids = orchestrator.select_outdated(config.sync.sample_size).await?;
/// let summary = orchestrator.run_batch(&ids).await;
/// println!("updated {} of {}", summary.updated, summary.attempted);
/// # Ok(())
/// # }
/// ```
pub struct SyncOrchestrator {
    store: Arc<dyn TaxonStore>,
    resolver: SynonymResolver,
    persistence: PersistenceCoordinator,
    discovery: FacetDiscovery,
    crawler: ObservationCrawler,
    dry_run: bool,
    shutdown: watch::Receiver<bool>,
}

impl SyncOrchestrator {
    /// Build the engine from configuration around an existing store
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the GBIF client cannot be built.
    pub fn new(
        config: &LastseenConfig,
        store: Arc<dyn TaxonStore>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        let client = GbifClient::new(&config.gbif)?;

        tracing::debug!(
            user_agent = %client.user_agent(),
            base_url = %config.gbif.base_url,
            backend = store.backend_name(),
            "Sync engine configured"
        );

        Ok(Self {
            resolver: SynonymResolver::new(store.clone()),
            persistence: PersistenceCoordinator::new(store.clone()),
            discovery: FacetDiscovery::new(client.clone(), config.gbif.max_years),
            crawler: ObservationCrawler::from_config(client, &config.gbif),
            store,
            dry_run: config.application.dry_run,
            shutdown,
        })
    }

    /// Override the configured dry-run flag
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn store(&self) -> &Arc<dyn TaxonStore> {
        &self.store
    }

    /// Random sample of up to `sample_size` non-synonym taxa that were never
    /// fetched or were fetched within the last six months
    ///
    /// # Errors
    ///
    /// Returns the store's error if the query fails.
    pub async fn select_outdated(&self, sample_size: usize) -> Result<Vec<TaxonId>> {
        let ids = self
            .store
            .sample_taxa(sample_size, staleness_cutoff(Utc::now()))
            .await?;

        tracing::info!(requested = sample_size, selected = ids.len(), "Selected taxa for sync");
        Ok(ids)
    }

    /// Resolve, mark as fetched, discover and crawl one taxon
    ///
    /// Returns `None` when no years, countries or usable records were found.
    ///
    /// # Errors
    ///
    /// [`SyncError::TaxonNotFound`] for unknown taxa, [`SyncError::Cancelled`] on
    /// shutdown, and storage errors from marking the fetch.
    pub async fn fetch_one(&self, taxon_id: &TaxonId) -> Result<Option<FetchedObservations>> {
        let resolution = self.resolver.resolve(taxon_id).await?;
        let observations = self.fetch_resolved(resolution.canonical()).await?;

        if observations.is_empty() {
            return Ok(None);
        }
        Ok(Some(FetchedObservations {
            resolution,
            observations,
        }))
    }

    async fn fetch_resolved(&self, canonical: &TaxonId) -> Result<Vec<Observation>> {
        if self.dry_run {
            tracing::info!(taxon_id = %canonical, "DRY RUN: not marking taxon as fetched");
        } else {
            self.persistence.mark_fetched(canonical).await?;
        }

        let years = self.discovery.discover_years(canonical, &self.shutdown).await?;
        if years.is_empty() {
            tracing::info!(taxon_id = %canonical, "No observation years reported");
            return Ok(Vec::new());
        }

        let countries = self
            .discovery
            .discover_countries(canonical, &years, &self.shutdown)
            .await?;
        let observations = self
            .crawler
            .crawl_all(canonical, &countries, &self.shutdown)
            .await?;

        if observations.is_empty() {
            tracing::info!(taxon_id = %canonical, countries = countries.len(), "No usable observations");
        }
        Ok(observations)
    }

    /// Fetch each taxon in turn and persist non-empty results
    ///
    /// Failures are recorded in the summary and never stop the batch. A shutdown
    /// signal stops it before the next taxon and marks the summary interrupted.
    pub async fn run_batch(&self, taxon_ids: &[TaxonId]) -> RunSummary {
        let start = Instant::now();
        let mut summary = RunSummary::new(self.dry_run);

        tracing::info!(taxa = taxon_ids.len(), dry_run = self.dry_run, "Starting sync run");

        for taxon_id in taxon_ids {
            if shutdown::is_requested(&self.shutdown) {
                tracing::info!(remaining = taxon_ids.len() - summary.attempted, "Sync run interrupted");
                summary.interrupted = true;
                break;
            }

            summary.attempted += 1;
            let taxon_start = Instant::now();
            log_sync_start!(taxon_id);

            let fetched = match self.fetch_one(taxon_id).await {
                Ok(Some(fetched)) => fetched,
                Ok(None) => {
                    summary.empty += 1;
                    continue;
                }
                Err(e) if e.is_cancelled() => {
                    tracing::info!(taxon_id = %taxon_id, "Taxon sync cancelled");
                    summary.interrupted = true;
                    break;
                }
                Err(e) => {
                    log_error_with_context!(&e, "Taxon fetch failed");
                    summary.record_failure(taxon_id, e.to_string());
                    continue;
                }
            };

            match self.persist(&fetched).await {
                Ok(written) => {
                    summary.updated += 1;
                    summary.observations_written += written;
                    log_sync_complete!(fetched.taxon_id(), written, taxon_start.elapsed());
                }
                Err(e) => {
                    log_error_with_context!(&e, "Failed to replace observations");
                    summary.record_failure(taxon_id, e.to_string());
                }
            }
        }

        let summary = summary.with_duration(start.elapsed());
        summary.log_summary();
        summary
    }

    /// Interactive single-taxon fetch with immediate persistence
    ///
    /// # Errors
    ///
    /// Unlike [`SyncOrchestrator::run_batch`], every failure is returned,
    /// including persistence errors.
    pub async fn fetch_and_store(&self, taxon_id: &TaxonId) -> Result<StoreOutcome> {
        let start = Instant::now();
        log_sync_start!(taxon_id);

        let resolution = self.resolver.resolve(taxon_id).await?;
        let observations = self.fetch_resolved(resolution.canonical()).await?;
        let canonical = resolution.canonical().clone();

        if observations.is_empty() {
            return Ok(StoreOutcome::NoData {
                taxon_id: canonical,
            });
        }
        let fetched = FetchedObservations {
            resolution,
            observations,
        };

        if self.dry_run {
            return Ok(StoreOutcome::Skipped {
                taxon_id: canonical,
                found: fetched.observations.len(),
            });
        }

        let written = self.persist(&fetched).await?;
        log_sync_complete!(canonical, written, start.elapsed());
        Ok(StoreOutcome::Stored {
            taxon_id: canonical,
            written,
        })
    }

    async fn persist(&self, fetched: &FetchedObservations) -> Result<u64> {
        if self.dry_run {
            tracing::info!(
                taxon_id = %fetched.taxon_id(),
                count = fetched.observations.len(),
                "DRY RUN: would replace observations"
            );
            return Ok(fetched.observations.len() as u64);
        }

        self.persistence
            .replace(fetched.taxon_id(), &fetched.observations)
            .await
    }
}

/// Fetches after this instant count as recent
fn staleness_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(STALENESS_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
