//! Row mapping between PostgreSQL and domain models
//!
//! Column lists are kept next to the mapping so SELECTs and `try_get` calls stay
//! in sync.

use crate::domain::{CountryCode, Observation, Result, SyncError, Taxon, TaxonId, TaxonRanks};
use chrono::{DateTime, Utc};
use tokio_postgres::Row;

/// Columns read by [`taxon_from_row`]
pub const TAXON_COLUMNS: &str = r#"taxon_id, synonym_id, scientific_name, synonym_name,
    kingdom, phylum, class, "order", family, genus, is_synonym, last_fetch"#;

/// Columns read by [`observation_from_row`]
pub const OBSERVATION_COLUMNS: &str =
    "taxon_id, country_code, observation_id, observation_date, observation_date_original";

fn column<'a, T: tokio_postgres::types::FromSql<'a>>(row: &'a Row, name: &str) -> Result<T> {
    row.try_get(name)
        .map_err(|e| SyncError::Database(format!("Failed to read column {name}: {e}")))
}

/// Map a `taxa` row to a [`Taxon`]
///
/// An empty `synonym_id` is read as no mapping.
pub fn taxon_from_row(row: &Row) -> Result<Taxon> {
    let taxon_id: String = column(row, "taxon_id")?;
    let synonym_id: Option<String> = column(row, "synonym_id")?;
    let last_fetch: Option<DateTime<Utc>> = column(row, "last_fetch")?;

    let taxon_id = TaxonId::new(taxon_id).map_err(SyncError::Validation)?;
    let synonym_id = synonym_id
        .filter(|id| !id.trim().is_empty())
        .map(TaxonId::new)
        .transpose()
        .map_err(SyncError::Validation)?;

    Ok(Taxon {
        taxon_id,
        synonym_id,
        scientific_name: column(row, "scientific_name")?,
        synonym_name: column(row, "synonym_name")?,
        ranks: TaxonRanks {
            kingdom: column(row, "kingdom")?,
            phylum: column(row, "phylum")?,
            class: column(row, "class")?,
            order: column(row, "order")?,
            family: column(row, "family")?,
            genus: column(row, "genus")?,
        },
        is_synonym: column(row, "is_synonym")?,
        last_fetch,
    })
}

/// Map an `observations` row to an [`Observation`]
pub fn observation_from_row(row: &Row) -> Result<Observation> {
    let taxon_id: String = column(row, "taxon_id")?;
    let country_code: String = column(row, "country_code")?;

    Ok(Observation::new(
        column::<String>(row, "observation_id")?,
        TaxonId::new(taxon_id).map_err(SyncError::Validation)?,
        CountryCode::new(country_code).map_err(SyncError::Validation)?,
        column::<String>(row, "observation_date")?,
        column::<String>(row, "observation_date_original")?,
    ))
}
