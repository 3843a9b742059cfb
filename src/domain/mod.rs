//! Domain models and types for lastseen.
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`TaxonId`], [`CountryCode`])
//! - **Domain models** ([`Taxon`], [`Observation`])
//! - **Error types** ([`SyncError`], [`GbifError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! ```rust
//! use lastseen::domain::{CountryCode, TaxonId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let taxon_id = TaxonId::new("4492208")?;
//! let country = CountryCode::new("AT")?;
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: TaxonId = country;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod observation;
pub mod result;
pub mod taxon;

pub use errors::{GbifError, SyncError};
pub use ids::{CountryCode, TaxonId};
pub use observation::Observation;
pub use result::Result;
pub use taxon::{Resolution, Taxon, TaxonBuilder, TaxonRanks};
