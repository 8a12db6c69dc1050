/// Shared application state
use crate::config::LibrarySettings;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<LibrarySettings>,
}

impl AppState {
    pub fn new(library: LibrarySettings) -> Self {
        Self {
            library: Arc::new(library),
        }
    }
}
