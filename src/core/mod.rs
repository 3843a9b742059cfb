//! Core sync engine for lastseen.
//!
//! # Modules
//!
//! - [`dates`] - event date normalization
//! - [`fetch`] - facet discovery and paginated crawling against GBIF
//! - [`synonyms`] - synonym to canonical taxon resolution
//! - [`persistence`] - serialized writes to the taxon store
//! - [`sync`] - orchestration, batch runs and scheduling
//! - [`shutdown`] - cooperative cancellation
//!
//! # Per-taxon flow
//!
//! 1. **Resolve** the identifier to its canonical taxon
//! 2. **Mark fetched** so a crash mid-crawl still counts as an attempt
//! 3. **Discover** observation years, then one representative year per country
//! 4. **Crawl** each (country, year) and keep the newest record
//! 5. **Replace** the taxon's stored observations in one transaction

pub mod dates;
pub mod fetch;
pub mod persistence;
pub mod shutdown;
pub mod sync;
pub mod synonyms;
