use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{health, index, sessions, video_feed};
use crate::state::AppState;

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(index::index))
        .route("/health", get(health::health_check))
        .route("/video_feed", post(video_feed::video_feed))
        .route("/sessions", get(sessions::list_sessions))
        .route("/sessions/{id}", delete(sessions::cancel_session))
        .route("/sessions/{id}/pause", post(sessions::pause_session))
        .route("/sessions/{id}/resume", post(sessions::resume_session))
        .route("/sessions/{id}/toggle", post(sessions::toggle_session))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
