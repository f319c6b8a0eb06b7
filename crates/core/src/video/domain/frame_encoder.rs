use crate::shared::frame::Frame;
use crate::shared::BoxError;

/// Compresses a frame into a standalone image payload.
pub trait FrameEncoder: Send {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, BoxError>;
}
