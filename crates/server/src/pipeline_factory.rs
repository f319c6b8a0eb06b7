use std::path::PathBuf;

use pose_stream_core::annotation::infrastructure::cpu_pose_annotator::CpuPoseAnnotator;
use pose_stream_core::detection::infrastructure::onnx_yolo_detector::OnnxYoloDetector;
use pose_stream_core::pipeline::pose_stream_use_case::StreamComponents;
use pose_stream_core::pose::infrastructure::onnx_pose_estimator::OnnxPoseEstimator;
use pose_stream_core::shared::BoxError;
use pose_stream_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use pose_stream_core::video::infrastructure::jpeg_encoder::JpegFrameEncoder;

/// Creates the per-stream pipeline components.
///
/// Every upload gets its own instances so no model state is shared between
/// concurrent streams.
pub trait PipelineFactory: Send + Sync {
    fn create(&self) -> Result<StreamComponents, BoxError>;
}

/// Model files and thresholds for the ONNX-backed pipeline.
#[derive(Debug, Clone)]
pub struct OnnxPipelineSettings {
    pub detector_model: PathBuf,
    pub pose_model: PathBuf,
    pub detector_confidence: f64,
    pub pose_confidence: f64,
    pub jpeg_quality: u8,
}

/// Production factory: ffmpeg decoding, YOLO person detection, BlazePose
/// landmarks, CPU annotation and JPEG encoding.
pub struct OnnxPipelineFactory {
    settings: OnnxPipelineSettings,
}

impl OnnxPipelineFactory {
    pub fn new(settings: OnnxPipelineSettings) -> Self {
        Self { settings }
    }
}

impl PipelineFactory for OnnxPipelineFactory {
    fn create(&self) -> Result<StreamComponents, BoxError> {
        let s = &self.settings;
        let detector = OnnxYoloDetector::new(&s.detector_model, s.detector_confidence, None)?;
        let estimator = OnnxPoseEstimator::new(&s.pose_model, s.pose_confidence)?;

        Ok(StreamComponents {
            reader: Box::new(FfmpegReader::new()),
            detector: Box::new(detector),
            estimator: Box::new(estimator),
            annotator: Box::new(CpuPoseAnnotator::new()),
            encoder: Box::new(JpegFrameEncoder::new(s.jpeg_quality)),
        })
    }
}
