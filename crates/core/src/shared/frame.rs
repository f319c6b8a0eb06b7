use ndarray::ArrayView3;

use crate::shared::bounding_box::PixelRect;

/// A single decoded video frame: contiguous RGB bytes in row-major order.
///
/// Colour conversion happens at I/O boundaries only; detectors, estimators
/// and the annotator all see RGB.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// A frame filled with a single RGB colour.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3], index: usize) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self::new(data, width, height, 3, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: i32, y: i32) -> Option<&[u8]> {
        let offset = self.offset(x, y)?;
        Some(&self.data[offset..offset + self.channels as usize])
    }

    /// Writes the first three channels at `(x, y)`. Out-of-bounds writes are
    /// ignored so drawing code can overrun the edges freely.
    pub fn put_pixel(&mut self, x: i32, y: i32, rgb: [u8; 3]) {
        if let Some(offset) = self.offset(x, y) {
            let n = (self.channels as usize).min(3);
            self.data[offset..offset + n].copy_from_slice(&rgb[..n]);
        }
    }

    /// Copies the pixels under `rect` into a new frame with the same index.
    ///
    /// `rect` must lie inside the frame (see [`PixelRect`] clamping).
    pub fn crop(&self, rect: &PixelRect) -> Frame {
        let channels = self.channels as usize;
        let row_len = rect.width as usize * channels;
        let mut data = Vec::with_capacity(row_len * rect.height as usize);
        for row in rect.y..rect.y + rect.height {
            let start = (row as usize * self.width as usize + rect.x as usize) * channels;
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        Frame::new(data, rect.width, rect.height, self.channels, self.index)
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * self.channels as usize)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 3, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, 3, 0);
    }

    #[test]
    fn test_filled_repeats_colour() {
        let frame = Frame::filled(3, 2, [1, 2, 3], 0);
        assert_eq!(frame.data().len(), 18);
        assert_eq!(frame.pixel(2, 1), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        let mut data = vec![0u8; 12];
        data[6] = 255; // row=1, col=0, R
        let frame = Frame::new(data, 2, 2, 3, 0);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 2, 3]);
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }

    #[test]
    fn test_put_pixel_ignores_out_of_bounds() {
        let mut frame = Frame::filled(2, 2, [0, 0, 0], 0);
        frame.put_pixel(-1, 0, [255, 255, 255]);
        frame.put_pixel(0, 2, [255, 255, 255]);
        frame.put_pixel(1, 1, [9, 8, 7]);
        assert!(frame.data()[..9].iter().all(|&b| b == 0));
        assert_eq!(frame.pixel(1, 1), Some(&[9u8, 8, 7][..]));
    }

    #[test]
    fn test_crop_copies_sub_rectangle() {
        // 4x3 frame where each pixel's R channel encodes x + 10*y
        let mut frame = Frame::filled(4, 3, [0, 0, 0], 7);
        for y in 0..3 {
            for x in 0..4 {
                frame.put_pixel(x, y, [(x + 10 * y) as u8, 0, 0]);
            }
        }
        let rect = PixelRect {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
        };
        let crop = frame.crop(&rect);
        assert_eq!(crop.width(), 2);
        assert_eq!(crop.height(), 2);
        assert_eq!(crop.index(), 7);
        assert_eq!(crop.pixel(0, 0).unwrap()[0], 11);
        assert_eq!(crop.pixel(1, 0).unwrap()[0], 12);
        assert_eq!(crop.pixel(0, 1).unwrap()[0], 21);
        assert_eq!(crop.pixel(1, 1).unwrap()[0], 22);
    }

    #[test]
    fn test_crop_is_independent_of_source() {
        let frame = Frame::filled(4, 4, [100, 100, 100], 0);
        let rect = PixelRect {
            x: 0,
            y: 0,
            width: 2,
            height: 2,
        };
        let mut crop = frame.crop(&rect);
        crop.put_pixel(0, 0, [0, 0, 0]);
        assert_eq!(frame.pixel(0, 0), Some(&[100u8, 100, 100][..]));
    }
}
