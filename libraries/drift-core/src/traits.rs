/// Core traits for Drift
use crate::error::Result;
use crate::types::Catalog;
use async_trait::async_trait;

/// Source of the track catalog
///
/// Implemented over HTTP by `drift-catalog-client`; tests use in-memory
/// sources. Must return `Ok` with an empty catalog when the listing is
/// readable but has no tracks.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// List the available tracks
    ///
    /// # Errors
    /// Returns `CatalogError::Unavailable` if the listing cannot be read
    async fn list_tracks(&self) -> Result<Catalog>;
}

/// Fixed in-memory catalog
#[async_trait]
impl CatalogSource for Catalog {
    async fn list_tracks(&self) -> Result<Catalog> {
        Ok(self.clone())
    }
}
