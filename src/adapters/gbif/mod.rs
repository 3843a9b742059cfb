//! GBIF adapter
//!
//! HTTP client and wire models for the GBIF occurrence search API.

pub mod client;
pub mod models;

pub use client::{user_agent, FetchOutcome, GbifClient, SearchQuery};
pub use models::{Facet, FacetCount, SearchResponse, SearchResult, COUNTRY_FACET, YEAR_FACET};
