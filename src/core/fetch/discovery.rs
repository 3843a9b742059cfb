//! Year and country facet discovery

use crate::adapters::gbif::{GbifClient, SearchQuery, COUNTRY_FACET, YEAR_FACET};
use crate::core::shutdown;
use crate::domain::{CountryCode, Result, SyncError, TaxonId};
use chrono::{Datelike, Utc};
use std::collections::BTreeMap;
use tokio::sync::watch;

/// Representative (most recent within the lookback window) year per country
pub type CountryYears = BTreeMap<CountryCode, i32>;

/// Upper bound for discovered years: next calendar year
pub fn year_cap() -> i32 {
    Utc::now().year() + 1
}

/// Finds the years and countries in which a taxon has been observed
#[derive(Debug, Clone)]
pub struct FacetDiscovery {
    client: GbifClient,
    max_years: usize,
}

impl FacetDiscovery {
    /// `max_years` bounds how many of the newest years are searched for countries
    pub fn new(client: GbifClient, max_years: usize) -> Self {
        Self { client, max_years }
    }

    /// Years with observations of the taxon, newest first
    ///
    /// A failed request or a response without a year facet yields an empty list.
    ///
    /// # Errors
    ///
    /// Only [`SyncError::Cancelled`], when shutdown was requested before the request.
    pub async fn discover_years(
        &self,
        taxon_id: &TaxonId,
        signal: &watch::Receiver<bool>,
    ) -> Result<Vec<i32>> {
        if shutdown::is_requested(signal) {
            return Err(SyncError::Cancelled(format!(
                "year discovery for taxon {taxon_id}"
            )));
        }

        let cap = year_cap();
        let Some(response) = self
            .client
            .search(&SearchQuery::year_facet(taxon_id, cap))
            .await
            .into_data()
        else {
            return Ok(Vec::new());
        };

        let mut years: Vec<i32> = response
            .facet_counts(YEAR_FACET)
            .iter()
            .filter_map(|bucket| match bucket.name.trim().parse::<i32>() {
                Ok(year) if year <= cap => Some(year),
                Ok(_) => None,
                Err(_) => {
                    tracing::debug!(taxon_id = %taxon_id, name = %bucket.name, "Skipping non-numeric year bucket");
                    None
                }
            })
            .collect();

        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();

        tracing::debug!(taxon_id = %taxon_id, years = years.len(), "Discovered observation years");
        Ok(years)
    }

    /// Countries with observations of the taxon, each mapped to the first year in
    /// `years` that reports it
    ///
    /// Only the first `max_years` entries of `years` are queried. A failed year
    /// query contributes nothing and the next year is tried.
    ///
    /// # Errors
    ///
    /// Only [`SyncError::Cancelled`], checked before every request.
    pub async fn discover_countries(
        &self,
        taxon_id: &TaxonId,
        years: &[i32],
        signal: &watch::Receiver<bool>,
    ) -> Result<CountryYears> {
        let mut countries = CountryYears::new();

        for &year in years.iter().take(self.max_years) {
            if shutdown::is_requested(signal) {
                return Err(SyncError::Cancelled(format!(
                    "country discovery for taxon {taxon_id}"
                )));
            }

            let Some(response) = self
                .client
                .search(&SearchQuery::country_facet(taxon_id, year))
                .await
                .into_data()
            else {
                continue;
            };

            for bucket in response.facet_counts(COUNTRY_FACET) {
                if bucket.name.trim().is_empty() {
                    continue;
                }
                match CountryCode::new(bucket.name.as_str()) {
                    Ok(country) => {
                        countries.entry(country).or_insert(year);
                    }
                    Err(e) => {
                        tracing::warn!(taxon_id = %taxon_id, year, error = %e, "Skipping country bucket");
                    }
                }
            }
        }

        tracing::debug!(
            taxon_id = %taxon_id,
            countries = countries.len(),
            "Discovered observation countries"
        );
        Ok(countries)
    }
}
