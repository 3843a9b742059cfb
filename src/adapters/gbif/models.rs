//! GBIF occurrence search API models
//!
//! Only the members the sync engine reads are modelled. Every member defaults, so a
//! sparse body (e.g. a facet-only response without `results`) still decodes.

use serde::{Deserialize, Deserializer, Serialize};

/// Facet field names as GBIF reports them
pub const YEAR_FACET: &str = "YEAR";
pub const COUNTRY_FACET: &str = "COUNTRY";

/// Treat an explicit `null` like a missing member
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `GET /occurrence/search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub offset: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub limit: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub end_of_records: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<SearchResult>,
    #[serde(deserialize_with = "null_as_default")]
    pub facets: Vec<Facet>,
}

impl SearchResponse {
    /// Buckets of the facet named `field` (case-insensitive), or an empty slice
    /// when the response carries no such facet
    pub fn facet_counts(&self, field: &str) -> &[FacetCount] {
        self.facets
            .iter()
            .find(|facet| facet.field.eq_ignore_ascii_case(field))
            .map(|facet| facet.counts.as_slice())
            .unwrap_or_default()
    }
}

/// One occurrence record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResult {
    /// GBIF occurrence key
    #[serde(deserialize_with = "null_as_default")]
    pub key: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub dataset_key: String,
    /// Raw event date, anything from `1999` to `1999-05-03T10:00:00/1999-05-04`
    #[serde(deserialize_with = "null_as_default")]
    pub event_date: String,
}

/// A facet breakdown such as `YEAR` or `COUNTRY`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Facet {
    #[serde(deserialize_with = "null_as_default")]
    pub field: String,
    #[serde(deserialize_with = "null_as_default")]
    pub counts: Vec<FacetCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetCount {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub count: i64,
}
