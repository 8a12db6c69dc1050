//! Error types for playback management

use thiserror::Error;

/// Playback errors returned by session operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// No track is currently selected
    #[error("No track selected")]
    NoTrackSelected,

    /// Audio may only start after a user gesture
    #[error("Playback requires a user activation gesture first")]
    ActivationRequired,

    /// The catalog was read but has no tracks
    #[error("No tracks available")]
    CatalogEmpty,

    /// The catalog could not be read
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// The session driver is no longer running
    #[error("Session driver has stopped")]
    DriverStopped,
}

/// Audio graph (context + analysis tap) errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The audio context could not be created
    #[error("Failed to create audio context: {0}")]
    ContextCreate(String),

    /// The audio context could not be resumed
    #[error("Failed to resume audio context: {0}")]
    ContextResume(String),

    /// Closing the audio context failed
    #[error("Failed to close audio context: {0}")]
    ContextClose(String),

    /// The element is already sourced into an audio context
    ///
    /// The element-to-source binding is one-time-only on the platform, so a
    /// second bind (even into a fresh context) is refused.
    #[error("Media element is already bound to an audio context")]
    AlreadyBound,

    /// Creating or wiring an analyser node failed
    #[error("Audio graph wiring failed: {0}")]
    Wiring(String),
}

/// Media output (play/pause) errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// The platform refused to start playback (autoplay policy)
    #[error("Playback not allowed: {0}")]
    NotAllowed(String),

    /// A later load or pause aborted this play request
    #[error("Playback aborted: {0}")]
    Aborted(String),

    /// The track could not be fetched or decoded
    #[error("Media source failed: {0}")]
    Source(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
