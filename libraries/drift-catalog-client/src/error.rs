//! Error types for the catalog client.

use drift_core::CatalogError;
use thiserror::Error;

/// Errors that can occur when talking to the catalog service.
#[derive(Error, Debug)]
pub enum CatalogClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Service returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Invalid service URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse the listing
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Service is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

/// Result type for catalog client operations.
pub type Result<T> = std::result::Result<T, CatalogClientError>;

impl From<CatalogClientError> for CatalogError {
    fn from(error: CatalogClientError) -> Self {
        match error {
            CatalogClientError::ServerError { status, message } => {
                CatalogError::unavailable_with_status(status, message)
            }
            CatalogClientError::InvalidUrl(message) => CatalogError::InvalidSource(message),
            other => CatalogError::unavailable(other.to_string()),
        }
    }
}
