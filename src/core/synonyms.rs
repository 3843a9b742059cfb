//! Synonym resolution

use crate::adapters::database::TaxonStore;
use crate::domain::{Resolution, Result, SyncError, TaxonId};
use std::sync::Arc;

/// Maps taxon identifiers to the canonical identifier observations are stored under
#[derive(Clone)]
pub struct SynonymResolver {
    store: Arc<dyn TaxonStore>,
}

impl SynonymResolver {
    pub fn new(store: Arc<dyn TaxonStore>) -> Self {
        Self { store }
    }

    /// Resolve `taxon_id` to its canonical form
    ///
    /// A taxon without a synonym mapping (or mapped to itself) is canonical.
    ///
    /// # Errors
    ///
    /// [`SyncError::TaxonNotFound`] when no taxon row exists; storage errors are
    /// passed through.
    pub async fn resolve(&self, taxon_id: &TaxonId) -> Result<Resolution> {
        let taxon = self
            .store
            .find_taxon(taxon_id)
            .await?
            .ok_or_else(|| SyncError::TaxonNotFound(taxon_id.to_string()))?;

        match taxon.synonym_id {
            Some(canonical) if &canonical != taxon_id => {
                tracing::debug!(taxon_id = %taxon_id, canonical = %canonical, "Resolved synonym");
                Ok(Resolution::Redirected {
                    from: taxon_id.clone(),
                    to: canonical,
                })
            }
            _ => Ok(Resolution::Canonical(taxon_id.clone())),
        }
    }
}
