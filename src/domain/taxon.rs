//! Taxon domain model
//!
//! Taxa are created by the taxonomy import and are read-only for the sync engine,
//! except for `last_fetch`.

use super::ids::TaxonId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Higher classification of a taxon
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxonRanks {
    pub kingdom: Option<String>,
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
}

/// A tracked taxon
///
/// # Examples
///
/// ```
/// use lastseen::domain::taxon::Taxon;
///
/// let taxon = Taxon::builder()
///     .taxon_id("8071112").unwrap()
///     .synonym_of("4492208").unwrap()
///     .scientific_name("Urocerus gigas")
///     .build()
///     .unwrap();
///
/// assert!(taxon.is_synonym);
/// assert_eq!(taxon.canonical_id().as_str(), "4492208");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Taxon {
    /// GBIF taxon key
    pub taxon_id: TaxonId,

    /// Accepted taxon key; `None` when the import left the mapping empty
    pub synonym_id: Option<TaxonId>,

    /// Accepted scientific name
    pub scientific_name: Option<String>,

    /// Name under which the synonym was published
    pub synonym_name: Option<String>,

    /// Classification
    pub ranks: TaxonRanks,

    /// Whether this entry redirects to another taxon
    pub is_synonym: bool,

    /// Start of the most recent fetch attempt
    pub last_fetch: Option<DateTime<Utc>>,
}

impl Taxon {
    /// Returns a builder for constructing a taxon
    pub fn builder() -> TaxonBuilder {
        TaxonBuilder::default()
    }

    /// The identifier observations are stored under
    pub fn canonical_id(&self) -> &TaxonId {
        self.synonym_id.as_ref().unwrap_or(&self.taxon_id)
    }
}

/// Builder for constructing Taxon instances
#[derive(Debug, Default)]
pub struct TaxonBuilder {
    taxon_id: Option<TaxonId>,
    synonym_id: Option<TaxonId>,
    scientific_name: Option<String>,
    synonym_name: Option<String>,
    ranks: TaxonRanks,
    is_synonym: bool,
    last_fetch: Option<DateTime<Utc>>,
}

impl TaxonBuilder {
    /// Creates a new TaxonBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the taxon ID
    pub fn taxon_id(mut self, id: impl Into<String>) -> Result<Self, String> {
        self.taxon_id = Some(TaxonId::new(id)?);
        Ok(self)
    }

    /// Sets the canonical ID without flagging the taxon as a synonym
    pub fn synonym_id(mut self, id: impl Into<String>) -> Result<Self, String> {
        self.synonym_id = Some(TaxonId::new(id)?);
        Ok(self)
    }

    /// Marks the taxon as a synonym of `accepted`
    pub fn synonym_of(mut self, accepted: impl Into<String>) -> Result<Self, String> {
        self.synonym_id = Some(TaxonId::new(accepted)?);
        self.is_synonym = true;
        Ok(self)
    }

    pub fn scientific_name(mut self, name: impl Into<String>) -> Self {
        self.scientific_name = Some(name.into());
        self
    }

    pub fn synonym_name(mut self, name: impl Into<String>) -> Self {
        self.synonym_name = Some(name.into());
        self
    }

    pub fn ranks(mut self, ranks: TaxonRanks) -> Self {
        self.ranks = ranks;
        self
    }

    pub fn last_fetch(mut self, last_fetch: DateTime<Utc>) -> Self {
        self.last_fetch = Some(last_fetch);
        self
    }

    /// Builds the taxon
    ///
    /// # Errors
    ///
    /// Returns an error if the taxon ID is missing or a synonym has no target
    pub fn build(self) -> Result<Taxon, String> {
        let taxon_id = self.taxon_id.ok_or("taxon_id is required")?;
        if self.is_synonym && self.synonym_id.is_none() {
            return Err("synonym taxa require a synonym_id".to_string());
        }

        Ok(Taxon {
            taxon_id,
            synonym_id: self.synonym_id,
            scientific_name: self.scientific_name,
            synonym_name: self.synonym_name,
            ranks: self.ranks,
            is_synonym: self.is_synonym,
            last_fetch: self.last_fetch,
        })
    }
}

/// Outcome of resolving an identifier to its canonical form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The identifier is canonical itself (no synonym mapping, or it maps to itself)
    Canonical(TaxonId),

    /// The identifier is a synonym of another taxon
    Redirected { from: TaxonId, to: TaxonId },
}

impl Resolution {
    /// The identifier to fetch and store observations under
    pub fn canonical(&self) -> &TaxonId {
        match self {
            Resolution::Canonical(id) => id,
            Resolution::Redirected { to, .. } => to,
        }
    }

    pub fn into_canonical(self) -> TaxonId {
        match self {
            Resolution::Canonical(id) => id,
            Resolution::Redirected { to, .. } => to,
        }
    }
}
