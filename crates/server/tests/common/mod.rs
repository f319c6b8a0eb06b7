#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use pose_stream_core::annotation::domain::frame_annotator::{FrameAnnotator, PersonPose};
use pose_stream_core::detection::domain::person_detector::PersonDetector;
use pose_stream_core::pipeline::pose_stream_use_case::StreamComponents;
use pose_stream_core::pose::domain::landmark::Pose;
use pose_stream_core::pose::domain::pose_estimator::PoseEstimator;
use pose_stream_core::shared::bounding_box::BoundingBox;
use pose_stream_core::shared::frame::Frame;
use pose_stream_core::shared::video_metadata::VideoMetadata;
use pose_stream_core::shared::BoxError;
use pose_stream_core::video::domain::frame_encoder::FrameEncoder;
use pose_stream_core::video::domain::video_reader::VideoReader;

use pose_stream_server::config::ServerConfig;
use pose_stream_server::pipeline_factory::PipelineFactory;
use pose_stream_server::router::build_router;
use pose_stream_server::state::AppState;

pub const BOUNDARY: &str = "XTESTBOUNDARY";

/// Test config writing uploads under `dir` with a short pause poll.
pub fn test_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        upload_dir: dir.join("uploads"),
        pause_poll: Duration::from_millis(1),
        max_upload_bytes: 1024 * 1024,
    }
}

/// Reader producing `frames` tiny gray frames, or failing to open.
pub struct StubReader {
    frames: usize,
    fail_open: bool,
    next: usize,
}

impl VideoReader for StubReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, BoxError> {
        if self.fail_open {
            return Err("not a video".into());
        }
        Ok(VideoMetadata {
            width: 8,
            height: 8,
            fps: 30.0,
            total_frames: self.frames,
            codec: "stub".into(),
            source_path: Some(path.to_path_buf()),
        })
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, BoxError> {
        if self.next >= self.frames {
            return Ok(None);
        }
        let frame = Frame::filled(8, 8, [128, 128, 128], self.next);
        self.next += 1;
        Ok(Some(frame))
    }

    fn close(&mut self) {}
}

struct NoPersons;

impl PersonDetector for NoPersons {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<BoundingBox>, BoxError> {
        Ok(Vec::new())
    }
}

struct NoPose;

impl PoseEstimator for NoPose {
    fn estimate(&mut self, _frame: &Frame) -> Result<Option<Pose>, BoxError> {
        Ok(None)
    }
}

struct NoopAnnotator;

impl FrameAnnotator for NoopAnnotator {
    fn annotate(&self, _frame: &mut Frame, _person: &PersonPose) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Encodes a frame as `JPEG<index>` so parts can be told apart.
struct TagEncoder;

impl FrameEncoder for TagEncoder {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, BoxError> {
        Ok(format!("JPEG{}", frame.index()).into_bytes())
    }
}

/// Factory wiring the stubs above.
#[derive(Default)]
pub struct StubFactory {
    pub frames: usize,
    pub fail_open: bool,
    pub fail_create: bool,
}

impl StubFactory {
    pub fn with_frames(frames: usize) -> Self {
        Self {
            frames,
            ..Self::default()
        }
    }
}

impl PipelineFactory for StubFactory {
    fn create(&self) -> Result<StreamComponents, BoxError> {
        if self.fail_create {
            return Err("model missing".into());
        }
        Ok(StreamComponents {
            reader: Box::new(StubReader {
                frames: self.frames,
                fail_open: self.fail_open,
                next: 0,
            }),
            detector: Box::new(NoPersons),
            estimator: Box::new(NoPose),
            annotator: Box::new(NoopAnnotator),
            encoder: Box::new(TagEncoder),
        })
    }
}

/// Builds the router around `factory`, returning the state so tests can
/// inspect the session registry.
pub fn build_test_app(dir: &Path, factory: StubFactory) -> (Router, AppState) {
    let state = AppState::new(test_config(dir), Arc::new(factory));
    (build_router(state.clone()), state)
}

pub async fn send(app: Router, method: Method, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri).await
}

pub async fn post(app: Router, uri: &str) -> Response {
    send(app, Method::POST, uri).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri).await
}

/// POSTs a multipart body with a single file field.
pub async fn post_upload(app: Router, field: &str, file_name: &str, data: &[u8]) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri("/video_feed")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(field, file_name, data)))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub fn multipart_body(field: &str, file_name: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: video/mp4\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Counts non-overlapping occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle)
        .count()
}
