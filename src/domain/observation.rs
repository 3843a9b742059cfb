//! Observation domain model

use super::ids::{CountryCode, TaxonId};
use serde::{Deserialize, Serialize};

/// The newest known occurrence of a taxon in one country
///
/// At most one observation is stored per (taxon, country). `observation_date` is
/// the normalized `YYYY-MM-DD` form used for ordering; `original_date` keeps the
/// raw GBIF `eventDate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// GBIF occurrence key
    pub observation_id: String,

    /// Canonical taxon the observation is stored under
    pub taxon_id: TaxonId,

    pub country_code: CountryCode,

    /// Normalized event date
    pub observation_date: String,

    /// Event date as delivered by GBIF
    pub original_date: String,
}

impl Observation {
    pub fn new(
        observation_id: impl Into<String>,
        taxon_id: TaxonId,
        country_code: CountryCode,
        observation_date: impl Into<String>,
        original_date: impl Into<String>,
    ) -> Self {
        Self {
            observation_id: observation_id.into(),
            taxon_id,
            country_code,
            observation_date: observation_date.into(),
            original_date: original_date.into(),
        }
    }
}
