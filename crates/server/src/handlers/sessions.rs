use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pose_stream_core::pipeline::stream_session::StreamSession;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::session_registry::SessionStatus;
use crate::state::AppState;

fn find(state: &AppState, id: Uuid) -> AppResult<StreamSession> {
    state
        .sessions
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("No active stream {id}")))
}

fn status(id: Uuid, session: &StreamSession) -> Json<SessionStatus> {
    Json(SessionStatus {
        id,
        paused: session.is_paused(),
    })
}

/// GET /sessions
pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<SessionStatus>> {
    Json(state.sessions.list())
}

/// POST /sessions/{id}/pause
pub async fn pause_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionStatus>> {
    let session = find(&state, id)?;
    session.pause();
    log::info!("Stream {id} paused");
    Ok(status(id, &session))
}

/// POST /sessions/{id}/resume
pub async fn resume_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionStatus>> {
    let session = find(&state, id)?;
    session.resume();
    log::info!("Stream {id} resumed");
    Ok(status(id, &session))
}

/// POST /sessions/{id}/toggle
pub async fn toggle_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionStatus>> {
    let session = find(&state, id)?;
    let paused = session.toggle();
    log::info!("Stream {id} {}", if paused { "paused" } else { "resumed" });
    Ok(Json(SessionStatus { id, paused }))
}

/// DELETE /sessions/{id}
///
/// Cancels the stream; its worker stops at the next step and drops the
/// session from the registry.
pub async fn cancel_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    find(&state, id)?.cancel();
    log::info!("Stream {id} cancelled");
    Ok(StatusCode::NO_CONTENT)
}
