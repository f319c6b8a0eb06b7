pub mod bounding_box;
pub mod constants;
pub mod frame;
pub mod letterbox;
pub mod model_resolver;
pub mod onnx_session;
pub mod video_metadata;

/// Error type at trait seams. `Send + Sync` so failures can cross the
/// streaming worker thread.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
