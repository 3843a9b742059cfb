//! GBIF occurrence search client
//!
//! Every request is a bounded `GET <base>/occurrence/search`. Failures never become
//! hard errors: the caller receives a [`FetchOutcome`] and treats anything but
//! [`FetchOutcome::Data`] as "no data".

use super::models::SearchResponse;
use crate::config::GbifConfig;
use crate::domain::ids::{CountryCode, TaxonId};
use crate::domain::{GbifError, Result, SyncError};
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;

/// Fixed part of the User-Agent header
pub const USER_AGENT_NAME: &str = "gbif-extinct";

/// Endpoint path below the configured base URL
pub const SEARCH_PATH: &str = "/occurrence/search";

/// Basis-of-record values accepted as evidence of presence
pub const BASIS_OF_RECORD: [&str; 4] = [
    "MACHINE_OBSERVATION",
    "OBSERVATION",
    "HUMAN_OBSERVATION",
    "PRESERVED_SPECIMEN",
];

/// Facet bucket limit for year and country breakdowns
pub const FACET_LIMIT: u32 = 5000;

/// Builds the User-Agent header value for an optional prefix
///
/// ```
/// use lastseen::adapters::gbif::client::user_agent;
///
/// assert_eq!(user_agent(None), "gbif-extinct");
/// assert_eq!(user_agent(Some("museum")), "museum_gbif-extinct");
/// ```
pub fn user_agent(prefix: Option<&str>) -> String {
    match prefix.map(str::trim) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}_{USER_AGENT_NAME}"),
        _ => USER_AGENT_NAME.to_string(),
    }
}

/// Query parameters for one occurrence search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    params: Vec<(&'static str, String)>,
}

impl SearchQuery {
    /// Year breakdown for a taxon, restricted to years up to `year_cap`
    pub fn year_facet(taxon_id: &TaxonId, year_cap: i32) -> Self {
        Self::default()
            .param("facet", "year")
            .param("facetMultiselect", "true")
            .param("facetLimit", FACET_LIMIT.to_string())
            .param("limit", "0")
            .param("taxonKey", taxon_id.as_str())
            .param("year", year_cap.to_string())
    }

    /// Country breakdown for a taxon within one year
    pub fn country_facet(taxon_id: &TaxonId, year: i32) -> Self {
        Self::default()
            .param("facet", "country")
            .param("facetLimit", FACET_LIMIT.to_string())
            .param("limit", "0")
            .param("taxonKey", taxon_id.as_str())
            .param("year", year.to_string())
    }

    /// One page of present occurrences for (taxon, country, year)
    pub fn occurrences(
        taxon_id: &TaxonId,
        country: &CountryCode,
        year: i32,
        offset: usize,
        limit: usize,
    ) -> Self {
        let mut query = Self::default();
        for basis in BASIS_OF_RECORD {
            query = query.param("basis_of_record", basis);
        }
        query
            .param("occurrenceStatus", "PRESENT")
            .param("taxonKey", taxon_id.as_str())
            .param("country", country.as_str())
            .param("year", year.to_string())
            .param("offset", offset.to_string())
            .param("limit", limit.to_string())
    }

    fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }
}

/// Result of one search request
#[derive(Debug)]
pub enum FetchOutcome {
    /// A decoded response; may legitimately hold no results or facets
    Data(SearchResponse),

    /// Transport failure, timeout, non-200 status or empty body
    Unavailable(GbifError),

    /// A 200 response whose body is not a search response
    Malformed(GbifError),
}

impl FetchOutcome {
    /// The decoded response, discarding the reason for a failure
    pub fn into_data(self) -> Option<SearchResponse> {
        match self {
            FetchOutcome::Data(response) => Some(response),
            FetchOutcome::Unavailable(_) | FetchOutcome::Malformed(_) => None,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, FetchOutcome::Data(_))
    }
}

/// HTTP client for the GBIF occurrence search endpoint
///
/// # Example
///
/// ```no_run
/// use lastseen::adapters::gbif::{GbifClient, SearchQuery};
/// use lastseen::config::GbifConfig;
/// use lastseen::domain::TaxonId;
///
/// # async fn example() -> lastseen::domain::Result<()> {
/// let client = GbifClient::new(&GbifConfig::default())?;
/// let taxon_id = TaxonId::new("4492208").unwrap();
/// let outcome = client.search(&SearchQuery::year_facet(&taxon_id, 2027)).await;
/// println!("got data: {}", outcome.is_data());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GbifClient {
    client: Client,
    search_url: String,
    user_agent: String,
}

impl GbifClient {
    /// Create a client with the configured timeout and User-Agent
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &GbifConfig) -> Result<Self> {
        let user_agent = user_agent(config.user_agent_prefix.as_deref());

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(user_agent.clone())
            .build()
            .map_err(|e| SyncError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            search_url: format!("{}{}", config.base_url.trim_end_matches('/'), SEARCH_PATH),
            user_agent,
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Issue one search request
    ///
    /// Failures are logged here and folded into the outcome; nothing is retried.
    pub async fn search(&self, query: &SearchQuery) -> FetchOutcome {
        let bytes = match self.get(query).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(url = %self.search_url, error = %e, "GBIF request failed");
                return FetchOutcome::Unavailable(e);
            }
        };

        match serde_json::from_slice::<SearchResponse>(&bytes) {
            Ok(response) => FetchOutcome::Data(response),
            Err(e) => {
                tracing::warn!(url = %self.search_url, error = %e, "Undecodable GBIF response");
                FetchOutcome::Malformed(GbifError::InvalidResponse(e.to_string()))
            }
        }
    }

    async fn get(&self, query: &SearchQuery) -> std::result::Result<Vec<u8>, GbifError> {
        tracing::trace!(url = %self.search_url, params = ?query.params(), "GET");

        let response = self
            .client
            .get(&self.search_url)
            .query(query.params())
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GbifError::HttpStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.bytes().await.map_err(classify)?;
        if body.is_empty() {
            return Err(GbifError::InvalidResponse("empty response body".to_string()));
        }

        Ok(body.to_vec())
    }
}

fn classify(error: reqwest::Error) -> GbifError {
    if error.is_timeout() {
        GbifError::Timeout(error.to_string())
    } else {
        GbifError::ConnectionFailed(error.to_string())
    }
}
