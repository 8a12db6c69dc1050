/// Core error types for Drift
use thiserror::Error;

/// Result type alias using `CatalogError`
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Failure to read the track catalog.
///
/// An empty catalog is NOT an error: it is returned as `Ok` with
/// `Catalog::is_empty() == true` so callers can tell "add files" apart
/// from "reload".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The listing could not be read (directory missing, read failure,
    /// unreachable service, malformed body)
    #[error("Catalog unavailable{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Unavailable {
        /// HTTP status when the failure came from a response
        status: Option<u16>,
        /// Human readable cause
        message: String,
    },

    /// Catalog source configuration is invalid
    #[error("Invalid catalog source: {0}")]
    InvalidSource(String),
}

impl CatalogError {
    /// Create an unavailable error without a status code
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            status: None,
            message: message.into(),
        }
    }

    /// Create an unavailable error carrying the response status
    pub fn unavailable_with_status(status: u16, message: impl Into<String>) -> Self {
        Self::Unavailable {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Status code of the failed response, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unavailable { status, .. } => *status,
            Self::InvalidSource(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_message_includes_status() {
        let err = CatalogError::unavailable_with_status(404, "music directory not found");
        assert_eq!(
            err.to_string(),
            "Catalog unavailable (404): music directory not found"
        );
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn unavailable_without_status() {
        let err = CatalogError::unavailable("connection refused");
        assert_eq!(err.to_string(), "Catalog unavailable: connection refused");
        assert_eq!(err.status(), None);
    }
}
