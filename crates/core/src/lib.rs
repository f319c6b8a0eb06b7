//! Person detection, pose landmark estimation and joint-angle annotation
//! for decoded video frames.
//!
//! Each bounded context follows the same split: `domain` holds the traits and
//! value types the pipeline is written against, `infrastructure` holds the
//! adapters backed by ffmpeg, ONNX Runtime and the `image` crate.

pub mod annotation;
pub mod detection;
pub mod pipeline;
pub mod pose;
pub mod shared;
pub mod video;
