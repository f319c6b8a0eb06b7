pub const DETECTOR_MODEL_NAME: &str = "yolov5s.onnx";
pub const POSE_MODEL_NAME: &str = "pose_landmark_full.onnx";

/// COCO class index the detector keeps.
pub const PERSON_CLASS_ID: usize = 0;

/// Minimum pose-presence score for the estimator to report landmarks.
pub const DEFAULT_POSE_CONFIDENCE: f64 = 0.3;

/// Landmarks below this visibility are not drawn.
pub const LANDMARK_VISIBILITY_THRESHOLD: f64 = 0.5;

pub const DEFAULT_JPEG_QUALITY: u8 = 80;

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v"];
