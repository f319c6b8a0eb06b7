use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::shared::BoxError;

/// Sequential frame source.
///
/// Frames are pulled one at a time so the caller decides when the source
/// advances; nothing is decoded ahead of a `read_frame` call.
pub trait VideoReader: Send {
    /// Opens a video file and returns its metadata.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, BoxError>;

    /// Decodes the next frame, or `None` once the source is exhausted.
    fn read_frame(&mut self) -> Result<Option<Frame>, BoxError>;

    /// Releases any resources held by the reader.
    fn close(&mut self);
}
