//! PostgreSQL implementation of [`TaxonStore`]

use crate::adapters::database::traits::{StoreStatistics, TaxonStore};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{
    observation_from_row, taxon_from_row, OBSERVATION_COLUMNS, TAXON_COLUMNS,
};
use crate::domain::{Observation, Result, SyncError, Taxon, TaxonId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

const INSERT_OBSERVATION: &str = r#"
    INSERT INTO observations (
        taxon_id, country_code, observation_id, observation_date, observation_date_original
    )
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (taxon_id, country_code) DO NOTHING
"#;

pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }
}

fn db_error(context: &str) -> impl FnOnce(tokio_postgres::Error) -> SyncError + '_ {
    move |e| SyncError::Database(format!("{context}: {e}"))
}

#[async_trait]
impl TaxonStore for PostgreSQLAdapter {
    fn backend_name(&self) -> &'static str {
        "postgresql"
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn find_taxon(&self, taxon_id: &TaxonId) -> Result<Option<Taxon>> {
        let query = format!("SELECT {TAXON_COLUMNS} FROM taxa WHERE taxon_id = $1");
        let rows = self.client.query(&query, &[&taxon_id.as_str()]).await?;
        rows.first().map(taxon_from_row).transpose()
    }

    async fn mark_fetched(&self, taxon_id: &TaxonId, fetched_at: DateTime<Utc>) -> Result<u64> {
        self.client
            .execute(
                "UPDATE taxa SET last_fetch = $1 WHERE taxon_id = $2 OR synonym_id = $2",
                &[&fetched_at, &taxon_id.as_str()],
            )
            .await
    }

    async fn replace_observations(
        &self,
        taxon_id: &TaxonId,
        observations: &[Observation],
    ) -> Result<u64> {
        let mut conn = self.client.get_connection().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let deleted = tx
            .execute(
                "DELETE FROM observations WHERE taxon_id = $1",
                &[&taxon_id.as_str()],
            )
            .await
            .map_err(db_error("Failed to delete observations"))?;

        let insert = tx
            .prepare_cached(INSERT_OBSERVATION)
            .await
            .map_err(db_error("Failed to prepare insert"))?;

        let mut inserted = 0;
        for observation in observations {
            inserted += tx
                .execute(
                    &insert,
                    &[
                        &taxon_id.as_str(),
                        &observation.country_code.as_str(),
                        &observation.observation_id,
                        &observation.observation_date,
                        &observation.original_date,
                    ],
                )
                .await
                .map_err(db_error("Failed to insert observation"))?;
        }

        // Dropping the transaction without commit rolls back the delete
        tx.commit()
            .await
            .map_err(db_error("Failed to commit observations"))?;

        tracing::debug!(taxon_id = %taxon_id, deleted, inserted, "Observations replaced");
        Ok(inserted)
    }

    async fn sample_taxa(
        &self,
        limit: usize,
        fetched_after: DateTime<Utc>,
    ) -> Result<Vec<TaxonId>> {
        let limit = i64::try_from(limit)
            .map_err(|_| SyncError::Validation(format!("Sample size too large: {limit}")))?;

        let rows = self
            .client
            .query(
                r#"
                SELECT taxon_id FROM taxa
                WHERE (last_fetch IS NULL OR last_fetch > $1)
                  AND is_synonym = FALSE
                ORDER BY random()
                LIMIT $2
                "#,
                &[&fetched_after, &limit],
            )
            .await?;

        rows.iter()
            .map(|row| {
                let id: String = row
                    .try_get("taxon_id")
                    .map_err(db_error("Failed to read taxon_id"))?;
                TaxonId::new(id).map_err(SyncError::Validation)
            })
            .collect()
    }

    async fn observations_for(&self, taxon_id: &TaxonId) -> Result<Vec<Observation>> {
        let query = format!(
            "SELECT {OBSERVATION_COLUMNS} FROM observations WHERE taxon_id = $1 ORDER BY country_code"
        );
        let rows = self.client.query(&query, &[&taxon_id.as_str()]).await?;
        rows.iter().map(observation_from_row).collect()
    }

    async fn statistics(&self, since: DateTime<Utc>) -> Result<StoreStatistics> {
        let row = self
            .client
            .query_one(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM taxa WHERE is_synonym = FALSE) AS taxa,
                    (SELECT COUNT(*) FROM observations) AS observations,
                    (SELECT COUNT(*) FROM taxa
                        WHERE is_synonym = FALSE AND last_fetch >= $1) AS fetched_since
                "#,
                &[&since],
            )
            .await?;

        let count = |name: &str| -> Result<u64> {
            let value: i64 = row
                .try_get(name)
                .map_err(|e| SyncError::Database(format!("Failed to read {name}: {e}")))?;
            Ok(u64::try_from(value).unwrap_or_default())
        };

        Ok(StoreStatistics {
            taxa: count("taxa")?,
            observations: count("observations")?,
            fetched_since: count("fetched_since")?,
        })
    }
}
