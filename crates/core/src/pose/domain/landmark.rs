//! 33-point body landmarks in the BlazePose topology.

/// Number of landmarks in a full [`Pose`].
pub const NUM_LANDMARKS: usize = 33;

/// Named body landmarks, discriminants match the model's output order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl PoseLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A single landmark normalized to the crop it was estimated on:
/// `(0, 0)` is the crop's top-left corner, `(1, 1)` its bottom-right.
/// Values outside `[0, 1]` are allowed for joints past the crop edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    /// Likelihood in `[0, 1]` that the joint is visible.
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self { x, y, visibility }
    }
}

/// One person's landmarks, indexed by [`PoseLandmark`].
#[derive(Clone, Debug, PartialEq)]
pub struct Pose {
    landmarks: [Landmark; NUM_LANDMARKS],
}

impl Pose {
    pub fn new(landmarks: [Landmark; NUM_LANDMARKS]) -> Self {
        Self { landmarks }
    }

    /// Builds a pose from the first [`NUM_LANDMARKS`] entries of `landmarks`.
    pub fn from_slice(landmarks: &[Landmark]) -> Option<Self> {
        let array: [Landmark; NUM_LANDMARKS] =
            landmarks.get(..NUM_LANDMARKS)?.try_into().ok()?;
        Some(Self::new(array))
    }

    pub fn get(&self, landmark: PoseLandmark) -> &Landmark {
        &self.landmarks[landmark.index()]
    }

    pub fn landmarks(&self) -> &[Landmark; NUM_LANDMARKS] {
        &self.landmarks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose_with_x_equal_to_index() -> Pose {
        let landmarks: Vec<Landmark> = (0..NUM_LANDMARKS)
            .map(|i| Landmark::new(i as f64, 0.0, 1.0))
            .collect();
        Pose::from_slice(&landmarks).unwrap()
    }

    #[test]
    fn test_indices_follow_model_order() {
        assert_eq!(PoseLandmark::Nose.index(), 0);
        assert_eq!(PoseLandmark::LeftShoulder.index(), 11);
        assert_eq!(PoseLandmark::RightElbow.index(), 14);
        assert_eq!(PoseLandmark::LeftHip.index(), 23);
        assert_eq!(PoseLandmark::RightAnkle.index(), 28);
        assert_eq!(PoseLandmark::RightFootIndex.index(), NUM_LANDMARKS - 1);
    }

    #[test]
    fn test_get_returns_named_landmark() {
        let pose = pose_with_x_equal_to_index();
        assert_eq!(pose.get(PoseLandmark::LeftKnee).x, 25.0);
        assert_eq!(pose.get(PoseLandmark::Nose).x, 0.0);
    }

    #[test]
    fn test_from_slice_ignores_extra_entries() {
        // Models emit auxiliary points after the 33 body landmarks
        let landmarks = vec![Landmark::new(0.5, 0.5, 1.0); 39];
        assert!(Pose::from_slice(&landmarks).is_some());
    }

    #[test]
    fn test_from_slice_rejects_short_input() {
        let landmarks = vec![Landmark::new(0.5, 0.5, 1.0); 20];
        assert!(Pose::from_slice(&landmarks).is_none());
    }
}
