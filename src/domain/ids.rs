//! Domain identifier types with validation
//!
//! Newtype wrappers for GBIF identifiers so taxon keys and country codes can't be
//! mixed up at call sites.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// GBIF taxon key newtype wrapper
///
/// # Examples
///
/// ```
/// use lastseen::domain::ids::TaxonId;
/// use std::str::FromStr;
///
/// let taxon_id = TaxonId::from_str("4492208").unwrap();
/// assert_eq!(taxon_id.as_str(), "4492208");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct TaxonId(String);

impl TaxonId {
    /// Creates a new TaxonId, trimming surrounding whitespace
    ///
    /// # Returns
    ///
    /// Returns `Ok(TaxonId)` if the ID is non-empty and contains no whitespace
    /// or query-string metacharacters, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let id = id.trim();
        if id.is_empty() {
            return Err("Taxon ID cannot be empty".to_string());
        }
        if id
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '&' | '=' | '?' | '#'))
        {
            return Err(format!("Invalid taxon ID: {id}"));
        }
        Ok(Self(id.to_string()))
    }

    /// Returns the taxon ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TaxonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaxonId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TaxonId {
    type Error = String;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl AsRef<str> for TaxonId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// ISO 3166-1 alpha-2 country code as reported by the GBIF country facet
///
/// Codes are normalized to upper case. GBIF also uses user-assigned codes such as
/// `XK` and `ZZ`, which are accepted like any other two-letter code.
///
/// # Examples
///
/// ```
/// use lastseen::domain::ids::CountryCode;
///
/// let code = CountryCode::new("at").unwrap();
/// assert_eq!(code.as_str(), "AT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Creates a new CountryCode from a two-letter string
    pub fn new(code: impl Into<String>) -> Result<Self, String> {
        let code = code.into();
        let code = code.trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!(
                "Country code must be two ASCII letters, got: '{code}'"
            ));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Returns the country code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CountryCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = String;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
