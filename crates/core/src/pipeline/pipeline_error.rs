use std::path::PathBuf;

use thiserror::Error;

use crate::shared::BoxError;

/// Failures that end a pose stream.
///
/// Encoding failures are not listed: they drop the frame and the stream
/// carries on.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to open video source {path}: {source}")]
    Open { path: PathBuf, source: BoxError },
    #[error("failed to decode frame {frame}: {source}")]
    Decode { frame: usize, source: BoxError },
    #[error("person detection failed on frame {frame}: {source}")]
    Detection { frame: usize, source: BoxError },
    #[error("pose estimation failed on frame {frame}: {source}")]
    PoseEstimation { frame: usize, source: BoxError },
    #[error("annotation failed on frame {frame}: {source}")]
    Annotation { frame: usize, source: BoxError },
}
