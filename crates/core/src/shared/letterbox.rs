//! Aspect-preserving resize into a square model input tensor.

use ndarray::Array4;

use crate::shared::frame::Frame;

/// Memory layout of a 4-D image tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[1, 3, H, W]` (YOLO exports).
    Nchw,
    /// `[1, H, W, 3]` (MediaPipe exports).
    Nhwc,
}

impl TensorLayout {
    /// Infers layout and square input size from a model input shape.
    ///
    /// Dynamic dimensions are reported as non-positive values; `fallback`
    /// is used when the size cannot be read.
    pub fn from_shape(shape: &[i64], fallback: u32) -> (TensorLayout, u32) {
        if shape.len() == 4 {
            if shape[3] == 3 && shape[1] > 0 {
                return (TensorLayout::Nhwc, shape[1] as u32);
            }
            if shape[2] > 0 {
                return (TensorLayout::Nchw, shape[2] as u32);
            }
            if shape[3] == 3 {
                return (TensorLayout::Nhwc, fallback);
            }
        }
        (TensorLayout::Nchw, fallback)
    }
}

/// Geometry of a letterbox transform, for mapping model outputs back to
/// source pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Letterbox {
    pub scale: f64,
    pub pad_x: u32,
    pub pad_y: u32,
}

impl Letterbox {
    /// Maps a point in letterboxed model-input pixels back to source pixels.
    pub fn to_source(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.pad_x as f64) / self.scale,
            (y - self.pad_y as f64) / self.scale,
        )
    }
}

/// Letterbox-resize a frame to `target_size` × `target_size`, normalized to
/// `[0, 1]` with the padding filled with `pad_value`.
pub fn letterbox(
    frame: &Frame,
    target_size: u32,
    layout: TensorLayout,
    pad_value: f32,
) -> (Array4<f32>, Letterbox) {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = ((fw * scale).round() as u32).min(target_size);
    let new_h = ((fh * scale).round() as u32).min(target_size);
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    let size = target_size as usize;
    let shape = match layout {
        TensorLayout::Nchw => (1, 3, size, size),
        TensorLayout::Nhwc => (1, size, size, 3),
    };
    let mut tensor = Array4::<f32>::from_elem(shape, pad_value);

    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;

    // Nearest-neighbor resize into the padded region
    for y in 0..new_h as usize {
        let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
        let ty = pad_y as usize + y;
        for x in 0..new_w as usize {
            let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
            let tx = pad_x as usize + x;
            for c in 0..3 {
                let v = src[[src_y, src_x, c]] as f32 / 255.0;
                match layout {
                    TensorLayout::Nchw => tensor[[0, c, ty, tx]] = v,
                    TensorLayout::Nhwc => tensor[[0, ty, tx, c]] = v,
                }
            }
        }
    }

    (
        tensor,
        Letterbox {
            scale,
            pad_x,
            pad_y,
        },
    )
}
