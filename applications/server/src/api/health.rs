/// Health check route
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Whether the music directory currently exists
    pub library: bool,
}

/// GET /api/health
///
/// Reports `degraded` while the music directory is missing; the catalog
/// answers 404 in that case.
pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let library = tokio::fs::metadata(&app_state.library.music_dir)
        .await
        .is_ok_and(|meta| meta.is_dir());

    Json(HealthResponse {
        status: if library { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        library,
    })
}
