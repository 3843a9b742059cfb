//! Storage backend factory

use crate::adapters::database::traits::TaxonStore;
use crate::adapters::memory::InMemoryTaxonStore;
use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::schema::{DatabaseTarget, LastseenConfig};
use crate::domain::{Result, SyncError};
use std::sync::Arc;

/// Create the storage backend selected by `database_target`
///
/// # Errors
///
/// Returns an error if the backend's section is missing or the backend cannot be
/// initialized.
pub async fn create_taxon_store(config: &LastseenConfig) -> Result<Arc<dyn TaxonStore>> {
    match config.database_target {
        DatabaseTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                SyncError::Configuration(
                    "postgresql configuration is required when database_target = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL taxon store");
            let client = PostgreSQLClient::new(pg_config.clone()).await?;
            let adapter = PostgreSQLAdapter::new(client);

            // The pool connects lazily; fail here rather than on the first taxon
            adapter.test_connection().await?;
            adapter.ensure_schema().await?;
            Ok(Arc::new(adapter))
        }
        DatabaseTarget::Memory => {
            tracing::info!("Creating in-memory taxon store");
            let store = match &config.memory.taxa_file {
                Some(path) => InMemoryTaxonStore::from_json_file(path)?,
                None => InMemoryTaxonStore::new(),
            };
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ApplicationConfig, GbifConfig, LoggingConfig, MemoryConfig, SyncConfig,
    };

    fn config(target: DatabaseTarget) -> LastseenConfig {
        LastseenConfig {
            application: ApplicationConfig::default(),
            gbif: GbifConfig::default(),
            sync: SyncConfig::default(),
            database_target: target,
            postgresql: None,
            memory: MemoryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = create_taxon_store(&config(DatabaseTarget::Memory)).await.unwrap();
        assert_eq!(store.backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_postgresql_requires_section() {
        let result = create_taxon_store(&config(DatabaseTarget::PostgreSQL)).await;
        assert!(matches!(result, Err(SyncError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_missing_taxa_file() {
        let mut config = config(DatabaseTarget::Memory);
        config.memory.taxa_file = Some("/nonexistent/taxa.json".to_string());
        assert!(create_taxon_store(&config).await.is_err());
    }
}
