/// Track catalog API routes
use crate::{error::Result, library, state::AppState};
use axum::{extract::State, Json};
use drift_core::TrackListing;

/// GET /api/tracks
///
/// `404` when the music directory is absent, `500` when it cannot be read.
pub async fn list_tracks(State(app_state): State<AppState>) -> Result<Json<TrackListing>> {
    let settings = &app_state.library;
    let tracks = library::scan(&settings.music_dir, &settings.extension).await?;

    Ok(Json(TrackListing { tracks }))
}
