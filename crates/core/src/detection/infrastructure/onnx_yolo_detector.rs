/// YOLO person detector using ONNX Runtime via `ort`.
///
/// Handles letterbox preprocessing, inference, class filtering to persons and
/// NMS post-processing. Works with both YOLOv5-style heads (with an
/// objectness column) and anchor-free YOLOv8-style heads.
use std::path::Path;

use crate::detection::domain::person_detector::PersonDetector;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::PERSON_CLASS_ID;
use crate::shared::frame::Frame;
use crate::shared::letterbox::{letterbox, Letterbox, TensorLayout};
use crate::shared::onnx_session::{first_input_shape, load_session};
use crate::shared::BoxError;

/// Fallback model input resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// Default confidence threshold for person detection.
pub const DEFAULT_CONFIDENCE: f64 = 0.25;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.45;

/// Upper bound on boxes kept per frame after NMS.
const MAX_DETECTIONS: usize = 1000;

/// YOLO letterbox padding colour (114 gray).
const PAD_VALUE: f32 = 114.0 / 255.0;

/// Layout of one prediction row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum YoloHead {
    /// `[cx, cy, w, h, objectness, class scores...]`
    Objectness,
    /// `[cx, cy, w, h, class scores...]`
    AnchorFree,
}

impl YoloHead {
    /// Guesses the head from the per-row feature count of a COCO model.
    pub fn infer(num_features: usize) -> YoloHead {
        if num_features == 85 {
            YoloHead::Objectness
        } else {
            YoloHead::AnchorFree
        }
    }

    fn class_offset(self) -> usize {
        match self {
            YoloHead::Objectness => 5,
            YoloHead::AnchorFree => 4,
        }
    }
}

/// YOLO person detector backed by an ONNX Runtime session.
pub struct OnnxYoloDetector {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
    head: Option<YoloHead>,
}

impl OnnxYoloDetector {
    /// Load a YOLO ONNX model and prepare for inference.
    ///
    /// The input resolution is read from the model's input shape (NCHW),
    /// falling back to 640 when dynamic. `head` forces the row layout; when
    /// `None` it is inferred from the output shape on every frame.
    pub fn new(
        model_path: &Path,
        confidence: f64,
        head: Option<YoloHead>,
    ) -> Result<Self, BoxError> {
        let session = load_session(model_path)?;
        let (_, input_size) = first_input_shape(&session)
            .map(|shape| TensorLayout::from_shape(&shape, DEFAULT_INPUT_SIZE))
            .unwrap_or((TensorLayout::Nchw, DEFAULT_INPUT_SIZE));

        log::debug!(
            "Loaded person detector {} (input {input_size}px)",
            model_path.display()
        );

        Ok(Self {
            session,
            confidence,
            input_size,
            head,
        })
    }
}

impl PersonDetector for OnnxYoloDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<BoundingBox>, BoxError> {
        let (input_tensor, lb) = letterbox(frame, self.input_size, TensorLayout::Nchw, PAD_VALUE);

        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("YOLO model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        let data: Vec<f32> = tensor.iter().copied().collect();

        let predictions = Predictions::from_shape(&shape, &data)?;
        let head = self
            .head
            .unwrap_or_else(|| YoloHead::infer(predictions.num_features));

        let mut candidates = parse_person_rows(&predictions, head, self.confidence, &lb);
        let mut kept = nms(&mut candidates, NMS_IOU_THRESH);
        kept.truncate(MAX_DETECTIONS);
        Ok(kept)
    }
}

// ---------------------------------------------------------------------------
// Output parsing
// ---------------------------------------------------------------------------

/// Flat view over a `[1, rows, features]` or `[1, features, rows]` output.
struct Predictions<'a> {
    data: &'a [f32],
    num_rows: usize,
    num_features: usize,
    transposed: bool,
}

impl<'a> Predictions<'a> {
    fn from_shape(shape: &[usize], data: &'a [f32]) -> Result<Self, BoxError> {
        if shape.len() != 3 {
            return Err(format!("Unexpected YOLO output shape: {shape:?}").into());
        }
        // Rows always outnumber features in exported YOLO heads.
        let transposed = shape[1] < shape[2];
        let (num_rows, num_features) = if transposed {
            (shape[2], shape[1])
        } else {
            (shape[1], shape[2])
        };
        Ok(Self {
            data,
            num_rows,
            num_features,
            transposed,
        })
    }

    fn value(&self, row: usize, feature: usize) -> f32 {
        if self.transposed {
            self.data[feature * self.num_rows + row]
        } else {
            self.data[row * self.num_features + feature]
        }
    }
}

/// Keeps rows whose best class is the person class and whose confidence
/// clears `threshold`, mapped back to source-frame pixels.
fn parse_person_rows(
    predictions: &Predictions<'_>,
    head: YoloHead,
    threshold: f64,
    lb: &Letterbox,
) -> Vec<BoundingBox> {
    let offset = head.class_offset();
    if predictions.num_features <= offset {
        return Vec::new();
    }

    let mut boxes = Vec::new();
    for row in 0..predictions.num_rows {
        let objectness = match head {
            YoloHead::Objectness => predictions.value(row, 4) as f64,
            YoloHead::AnchorFree => 1.0,
        };
        if objectness < threshold {
            continue;
        }

        let (best_class, best_score) = (offset..predictions.num_features)
            .map(|f| (f - offset, predictions.value(row, f) as f64))
            .fold((0, f64::MIN), |best, cur| if cur.1 > best.1 { cur } else { best });

        let confidence = objectness * best_score;
        if best_class != PERSON_CLASS_ID || confidence < threshold {
            continue;
        }

        let cx = predictions.value(row, 0) as f64;
        let cy = predictions.value(row, 1) as f64;
        let w = predictions.value(row, 2) as f64;
        let h = predictions.value(row, 3) as f64;

        let (xmin, ymin) = lb.to_source(cx - w / 2.0, cy - h / 2.0);
        let (xmax, ymax) = lb.to_source(cx + w / 2.0, cy + h / 2.0);
        boxes.push(BoundingBox::new(xmin, ymin, xmax, ymax, confidence));
    }
    boxes
}

// ---------------------------------------------------------------------------
// NMS
// ---------------------------------------------------------------------------

/// Greedy NMS: sort by confidence descending, suppress overlapping boxes.
fn nms(dets: &mut [BoundingBox], iou_thresh: f64) -> Vec<BoundingBox> {
    dets.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep: Vec<BoundingBox> = Vec::new();
    for det in dets.iter() {
        if keep.iter().all(|k| k.iou(det) <= iou_thresh) {
            keep.push(*det);
        }
    }
    keep
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
