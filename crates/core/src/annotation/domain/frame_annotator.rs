use crate::pose::domain::joint_angle::JointAngles;
use crate::pose::domain::landmark::Pose;
use crate::shared::bounding_box::{BoundingBox, PixelRect};
use crate::shared::frame::Frame;
use crate::shared::BoxError;

/// Everything drawn for one detected person.
#[derive(Clone, Debug)]
pub struct PersonPose {
    pub bbox: BoundingBox,
    /// The clamped crop the pose was estimated on.
    pub rect: PixelRect,
    /// Landmarks normalized to `rect`, if the estimator found a body.
    pub pose: Option<Pose>,
    pub angles: Option<JointAngles>,
}

/// Domain interface for drawing pose overlays onto a frame.
///
/// Implementations modify the frame in-place (`&mut Frame`).
pub trait FrameAnnotator: Send {
    fn annotate(&self, frame: &mut Frame, person: &PersonPose) -> Result<(), BoxError>;
}
