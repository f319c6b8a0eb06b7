//! Signed joint angles from three landmarks.
//!
//! The angle at vertex `b` is the difference of the directions `b→a` and
//! `b→c`. It is a signed relative angle, not an interior angle: values can be
//! negative and can exceed ±180°. When `a` or `c` coincides with `b` the
//! direction is undefined; `f64::atan2(0, 0)` yields `0` and the result is
//! passed through unnormalized.

use crate::pose::domain::landmark::{Landmark, Pose, PoseLandmark};

/// Signed angle in degrees at vertex `b`, from ray `b→c` to ray `b→a`.
pub fn calculate_angle(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    let radians_a = (a.1 - b.1).atan2(a.0 - b.0);
    let radians_c = (c.1 - b.1).atan2(c.0 - b.0);
    (radians_a - radians_c).to_degrees()
}

fn landmark_angle(a: &Landmark, b: &Landmark, c: &Landmark) -> f64 {
    calculate_angle((a.x, a.y), (b.x, b.y), (c.x, c.y))
}

/// The five angles rendered next to each person.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointAngles {
    pub left_elbow: f64,
    pub right_elbow: f64,
    pub neck: f64,
    pub left_knee: f64,
    pub right_knee: f64,
}

impl JointAngles {
    pub fn from_pose(pose: &Pose) -> Self {
        use PoseLandmark::*;
        let angle = |a, b, c| landmark_angle(pose.get(a), pose.get(b), pose.get(c));

        Self {
            left_elbow: angle(LeftShoulder, LeftElbow, LeftWrist),
            right_elbow: angle(RightShoulder, RightElbow, RightWrist),
            neck: angle(LeftShoulder, Nose, RightShoulder),
            left_knee: angle(LeftHip, LeftKnee, LeftAnkle),
            right_knee: angle(RightHip, RightKnee, RightAnkle),
        }
    }

    /// Display lines in drawing order, top to bottom.
    pub fn labels(&self) -> [String; 5] {
        [
            format!("Left Elbow Angle: {:.2} degrees", self.left_elbow),
            format!("Right Elbow Angle: {:.2} degrees", self.right_elbow),
            format!("Neck Angle: {:.2} degrees", self.neck),
            format!("Left Knee Angle: {:.2} degrees", self.left_knee),
            format!("Right Knee Angle: {:.2} degrees", self.right_knee),
        ]
    }
}
