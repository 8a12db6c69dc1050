//! Drift Server Library
//!
//! Catalog service for the Drift shuffle player: lists the audio files in a
//! music directory and serves them for playback.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod library;
pub mod state;

// Re-export commonly used types for convenience
pub use api::create_router;
pub use config::{LibrarySettings, ServerConfig, ServerSettings};
pub use error::{Result, ServerError};
pub use state::AppState;
