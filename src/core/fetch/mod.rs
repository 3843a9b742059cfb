//! Remote discovery and crawling against the GBIF occurrence API
//!
//! [`FacetDiscovery`] finds where and when a taxon was observed; the
//! [`ObservationCrawler`] then pages through each (country, year) pair and keeps
//! the newest occurrence.

pub mod crawler;
pub mod discovery;

pub use crawler::ObservationCrawler;
pub use discovery::{year_cap, CountryYears, FacetDiscovery};
