use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;
use crate::shared::BoxError;

/// Domain interface for person detection.
///
/// Returns boxes in frame pixel coordinates, person class only, ordered by
/// confidence descending. Implementations may hold inference state, hence
/// `&mut self`.
pub trait PersonDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<BoundingBox>, BoxError>;
}
