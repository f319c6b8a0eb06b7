use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use pose_stream_core::pipeline::pipeline_logger::SummaryPipelineLogger;
use pose_stream_core::pipeline::pose_stream_use_case::PoseStreamUseCase;
use pose_stream_core::pipeline::stream_session::StreamSession;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::streaming::{spawn_stream, MULTIPART_CONTENT_TYPE};
use crate::upload::{has_video_extension, save_upload};

/// Form field carrying the uploaded video.
pub const VIDEO_FIELD: &str = "video";

/// Response header carrying the id used by the `/sessions` endpoints.
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Frames between progress lines in the per-stream log.
const PROGRESS_THROTTLE_FRAMES: usize = 30;

/// POST /video_feed
///
/// Saves the uploaded video and answers with a `multipart/x-mixed-replace`
/// body carrying one annotated JPEG per decoded frame. The stream ends when
/// the video does; a file that cannot be decoded yields an empty body.
pub async fn video_feed(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(AppError::BadRequest("No video file selected".into()));
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some((file_name, data.to_vec()));
        break;
    }

    let Some((file_name, data)) = upload else {
        return Err(AppError::BadRequest(format!(
            "Missing '{VIDEO_FIELD}' file field"
        )));
    };
    if !has_video_extension(&file_name) {
        log::warn!("Upload {file_name:?} has no usual video extension; trying to decode anyway");
    }

    let id = Uuid::new_v4();
    let path = save_upload(&state.config.upload_dir, id, &file_name, &data)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to save upload: {e}")))?;
    log::info!(
        "Stream {id}: saved {} bytes to {}",
        data.len(),
        path.display()
    );

    let factory = state.factory.clone();
    let components = tokio::task::spawn_blocking(move || factory.create())
        .await
        .map_err(|e| AppError::Internal(format!("Pipeline setup panicked: {e}")))?
        .map_err(|e| AppError::Internal(format!("Failed to build pipeline: {e}")))?;

    let session = StreamSession::new();
    let use_case = PoseStreamUseCase::new(components, session.clone())
        .with_logger(Box::new(SummaryPipelineLogger::new(
            id.to_string(),
            PROGRESS_THROTTLE_FRAMES,
        )))
        .with_poll_interval(state.config.pause_poll);

    state.sessions.insert(id, session);
    let parts = match spawn_stream(id, use_case, path, state.sessions.clone()) {
        Ok(parts) => parts,
        Err(e) => {
            state.sessions.remove(&id);
            return Err(AppError::Internal(format!("Failed to start stream: {e}")));
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, MULTIPART_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, "no-cache")
        .header(SESSION_ID_HEADER, id.to_string())
        .body(Body::from_stream(parts))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
