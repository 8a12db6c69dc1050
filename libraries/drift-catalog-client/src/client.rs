//! HTTP catalog client.

use crate::error::{CatalogClientError, Result};
use async_trait::async_trait;
use drift_core::{Catalog, CatalogSource, TrackListing};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default audio extension kept from listings
pub const DEFAULT_EXTENSION: &str = "mp3";

/// Error body returned by the catalog service
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the catalog service's `GET /api/tracks`.
///
/// # Example
///
/// ```ignore
/// use drift_catalog_client::HttpCatalogClient;
/// use drift_core::CatalogSource;
///
/// let client = HttpCatalogClient::new("http://localhost:8080")?;
/// let catalog = client.list_tracks().await?;
/// println!("Found {} tracks", catalog.len());
/// ```
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: Client,
    base_url: String,
    extension: String,
}

impl HttpCatalogClient {
    /// Create a client keeping `.mp3` tracks.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_extension(base_url, DEFAULT_EXTENSION)
    }

    /// Create a client keeping tracks with the given extension.
    pub fn with_extension(base_url: impl Into<String>, extension: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();

        // Validate URL
        if base_url.is_empty() {
            return Err(CatalogClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CatalogClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Drift/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CatalogClientError::Request)?;

        Ok(Self {
            http,
            base_url,
            extension: extension.into().trim_start_matches('.').to_string(),
        })
    }

    /// Service URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Extension used to filter listings.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Fetch the raw listing.
    pub async fn fetch_listing(&self) -> Result<TrackListing> {
        let url = format!("{}/api/tracks", self.base_url);
        debug!(url = %url, "Fetching track listing");

        let response = self.http.get(&url).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                CatalogClientError::ServerUnreachable(e.to_string())
            } else {
                CatalogClientError::Request(e)
            }
        })?;

        let status = response.status();

        if status.is_success() {
            let listing: TrackListing = response.json().await.map_err(|e| {
                CatalogClientError::ParseError(format!("Failed to parse track listing: {}", e))
            })?;

            debug!(tracks = listing.tracks.len(), "Fetched track listing");
            Ok(listing)
        } else {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);

            warn!(status = status.as_u16(), message = %message, "Track listing request failed");
            Err(CatalogClientError::ServerError {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Fetch the listing and keep playable tracks.
    pub async fn fetch_catalog(&self) -> Result<Catalog> {
        let catalog = self.fetch_listing().await?.into_catalog(&self.extension);
        info!(tracks = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogClient {
    async fn list_tracks(&self) -> drift_core::Result<Catalog> {
        Ok(self.fetch_catalog().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = HttpCatalogClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn leading_dot_is_dropped_from_extension() {
        let client = HttpCatalogClient::with_extension("http://localhost", ".ogg").unwrap();
        assert_eq!(client.extension(), "ogg");
    }
}
