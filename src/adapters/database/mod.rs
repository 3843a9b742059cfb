//! Storage abstraction layer
//!
//! [`TaxonStore`] is implemented by the PostgreSQL and in-memory backends;
//! [`create_taxon_store`] picks one from configuration.

pub mod factory;
pub mod traits;

pub use factory::create_taxon_store;
pub use traits::{StoreStatistics, TaxonStore};
