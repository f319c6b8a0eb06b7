use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use pose_stream_core::pipeline::pose_stream_use_case::{PoseStreamUseCase, Step};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use crate::session_registry::SessionRegistry;

/// Boundary token separating the JPEG parts of a stream response.
pub const BOUNDARY: &str = "frame";

pub const MULTIPART_CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

/// Parts buffered ahead of the client before the worker blocks.
const CHANNEL_CAPACITY: usize = 2;

pub type PartStream = ReceiverStream<Result<Bytes, Infallible>>;

/// Wraps one JPEG in a multipart part: boundary line, content type, blank
/// line, payload and trailing CRLF.
pub fn frame_part(jpeg: &[u8]) -> Bytes {
    let header = format!("--{BOUNDARY}\r\nContent-Type: image/jpeg\r\n\r\n");
    let mut part = Vec::with_capacity(header.len() + jpeg.len() + 2);
    part.extend_from_slice(header.as_bytes());
    part.extend_from_slice(jpeg);
    part.extend_from_slice(b"\r\n");
    Bytes::from(part)
}

/// Runs the pipeline for one upload on a dedicated thread and returns the
/// stream of multipart parts it produces.
///
/// The worker owns the use case. It stops when the video ends, when a
/// pipeline stage fails, or when the client goes away, and removes the
/// session from `registry` on the way out.
pub fn spawn_stream(
    id: Uuid,
    mut use_case: PoseStreamUseCase,
    path: PathBuf,
    registry: Arc<SessionRegistry>,
) -> std::io::Result<PartStream> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    std::thread::Builder::new()
        .name(format!("stream-{id}"))
        .spawn(move || {
            match use_case.open(&path) {
                Ok(meta) => log::info!(
                    "Stream {id}: {}x{} @ {:.2} fps, {} frames",
                    meta.width,
                    meta.height,
                    meta.fps,
                    meta.total_frames
                ),
                Err(e) => log::warn!("Stream {id}: {e}"),
            }

            loop {
                // Checked every step so a paused stream still notices a
                // disconnected client.
                if tx.is_closed() {
                    use_case.session().cancel();
                }

                match use_case.step() {
                    Ok(Step::Paused) => use_case.idle(),
                    Ok(Step::Frame(frame)) => {
                        if tx.blocking_send(Ok(frame_part(&frame.jpeg))).is_err() {
                            log::debug!("Stream {id}: client disconnected at frame {}", frame.index);
                            use_case.session().cancel();
                            break;
                        }
                    }
                    Ok(Step::Dropped(_)) => continue,
                    Ok(Step::Finished) => break,
                    Err(e) => {
                        log::error!("Stream {id}: {e}");
                        break;
                    }
                }
            }

            use_case.finish();
            registry.remove(&id);
            log::info!("Stream {id} ended");
        })?;

    Ok(ReceiverStream::new(rx))
}
