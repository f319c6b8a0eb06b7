/// BlazePose landmark estimator using ONNX Runtime via `ort`.
///
/// Runs a single-person landmark model on a person crop. The model's input
/// layout (NHWC for MediaPipe exports, NCHW for re-exports) and resolution
/// are read from its input shape.
use std::path::Path;

use crate::pose::domain::landmark::{Landmark, Pose, NUM_LANDMARKS};
use crate::pose::domain::pose_estimator::PoseEstimator;
use crate::shared::frame::Frame;
use crate::shared::letterbox::{letterbox, Letterbox, TensorLayout};
use crate::shared::onnx_session::{first_input_shape, load_session};
use crate::shared::BoxError;

/// Fallback input resolution of the full BlazePose landmark model.
const DEFAULT_INPUT_SIZE: u32 = 256;

/// Values per landmark: x, y, z, visibility logit, presence logit.
const VALUES_PER_LANDMARK: usize = 5;

pub struct OnnxPoseEstimator {
    session: ort::session::Session,
    confidence: f64,
    layout: TensorLayout,
    input_size: u32,
}

impl OnnxPoseEstimator {
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, BoxError> {
        let session = load_session(model_path)?;
        let (layout, input_size) = first_input_shape(&session)
            .map(|shape| TensorLayout::from_shape(&shape, DEFAULT_INPUT_SIZE))
            .unwrap_or((TensorLayout::Nhwc, DEFAULT_INPUT_SIZE));

        log::debug!(
            "Loaded pose model {} ({layout:?}, input {input_size}px)",
            model_path.display()
        );

        Ok(Self {
            session,
            confidence,
            layout,
            input_size,
        })
    }
}

impl PoseEstimator for OnnxPoseEstimator {
    fn estimate(&mut self, crop: &Frame) -> Result<Option<Pose>, BoxError> {
        if crop.width() == 0 || crop.height() == 0 {
            return Ok(None);
        }

        let (input_tensor, lb) = letterbox(crop, self.input_size, self.layout, 0.0);
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        let mut flat = Vec::with_capacity(outputs.len());
        for i in 0..outputs.len() {
            let tensor = outputs[i].try_extract_array::<f32>()?;
            flat.push(tensor.iter().copied().collect::<Vec<f32>>());
        }

        let Some(landmarks) = find_landmark_output(&flat) else {
            return Err(format!(
                "pose model has no landmark output of at least {} values",
                NUM_LANDMARKS * VALUES_PER_LANDMARK
            )
            .into());
        };

        if let Some(presence) = find_presence_output(&flat) {
            if presence < self.confidence {
                return Ok(None);
            }
        }

        Ok(decode_landmarks(
            landmarks,
            &lb,
            crop.width() as f64,
            crop.height() as f64,
        ))
    }
}

// ── Output parsing ──

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// The landmark tensor is the first output holding at least 33 five-value rows.
fn find_landmark_output(outputs: &[Vec<f32>]) -> Option<&[f32]> {
    outputs
        .iter()
        .find(|o| o.len() >= NUM_LANDMARKS * VALUES_PER_LANDMARK && o.len() % VALUES_PER_LANDMARK == 0)
        .map(|o| o.as_slice())
}

/// Person-presence score from the first single-value output.
///
/// Some exports already apply the sigmoid and some emit a logit; values
/// outside `[0, 1]` are treated as logits.
fn find_presence_output(outputs: &[Vec<f32>]) -> Option<f64> {
    let raw = outputs.iter().find(|o| o.len() == 1)?[0] as f64;
    if (0.0..=1.0).contains(&raw) {
        Some(raw)
    } else {
        Some(sigmoid(raw))
    }
}

/// Converts model-input pixel coordinates to crop-normalized landmarks.
fn decode_landmarks(data: &[f32], lb: &Letterbox, crop_w: f64, crop_h: f64) -> Option<Pose> {
    let landmarks: Vec<Landmark> = data
        .chunks_exact(VALUES_PER_LANDMARK)
        .take(NUM_LANDMARKS)
        .map(|v| {
            let (x, y) = lb.to_source(v[0] as f64, v[1] as f64);
            Landmark::new(x / crop_w, y / crop_h, sigmoid(v[3] as f64))
        })
        .collect();
    Pose::from_slice(&landmarks)
}
