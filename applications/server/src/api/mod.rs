/// API route modules
pub mod health;
pub mod tracks;

use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router
///
/// Serves the catalog under `/api` and the audio files under the configured
/// media prefix.
pub fn create_router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health))
        .route("/tracks", get(tracks::list_tracks));

    let media = ServeDir::new(&app_state.library.music_dir);

    Router::new()
        .nest("/api", api_routes)
        .nest_service(&app_state.library.media_prefix, media)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
