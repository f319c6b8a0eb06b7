use crate::pose::domain::landmark::Pose;
use crate::shared::frame::Frame;
use crate::shared::BoxError;

/// Domain interface for single-person pose landmark estimation.
///
/// Receives one person's crop and returns landmarks normalized to that crop,
/// or `None` when no pose is found.
pub trait PoseEstimator: Send {
    fn estimate(&mut self, crop: &Frame) -> Result<Option<Pose>, BoxError>;
}
