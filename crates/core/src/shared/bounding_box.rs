/// An axis-aligned person detection in frame pixel coordinates.
///
/// Coordinates are the detector's raw output and may extend past the frame
/// edges; use [`BoundingBox::to_pixel_rect`] before indexing pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    pub confidence: f64,
}

/// Integer rectangle guaranteed to lie inside the frame it was clamped to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64, confidence: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
            confidence,
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let x1 = self.xmin.max(other.xmin);
        let y1 = self.ymin.max(other.ymin);
        let x2 = self.xmax.min(other.xmax);
        let y2 = self.ymax.min(other.ymax);

        let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }

    /// Top-left corner truncated toward zero, the anchor for text labels.
    pub fn anchor(&self) -> (i32, i32) {
        (self.xmin as i32, self.ymin as i32)
    }

    /// Truncates the box to whole pixels and clamps it to a
    /// `frame_width` × `frame_height` frame.
    ///
    /// Returns `None` when nothing of the box remains inside the frame.
    pub fn to_pixel_rect(&self, frame_width: u32, frame_height: u32) -> Option<PixelRect> {
        let clamp = |v: f64, max: u32| (v.trunc().max(0.0) as u32).min(max);

        let x1 = clamp(self.xmin, frame_width);
        let y1 = clamp(self.ymin, frame_height);
        let x2 = clamp(self.xmax, frame_width);
        let y2 = clamp(self.ymax, frame_height);

        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(PixelRect {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        })
    }
}

impl PixelRect {
    /// Maps a point normalized to this rectangle back to frame pixels.
    pub fn denormalize(&self, nx: f64, ny: f64) -> (i32, i32) {
        (
            (self.x as f64 + nx * self.width as f64).round() as i32,
            (self.y as f64 + ny * self.height as f64).round() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn bbox(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> BoundingBox {
        BoundingBox::new(xmin, ymin, xmax, ymax, 0.9)
    }

    // ── IoU ──────────────────────────────────────────────────────────

    #[test]
    fn test_iou_identical_boxes() {
        let a = bbox(10.0, 10.0, 110.0, 110.0);
        assert_relative_eq!(a.iou(&a), 1.0);
    }

    #[test]
    fn test_iou_partial_overlap() {
        // intersection 50*100 = 5000, union 10000 + 10000 - 5000
        let a = bbox(0.0, 0.0, 100.0, 100.0);
        let b = bbox(50.0, 0.0, 150.0, 100.0);
        assert_relative_eq!(a.iou(&b), 5000.0 / 15000.0);
    }

    #[rstest]
    #[case::disjoint(bbox(0.0, 0.0, 50.0, 50.0), bbox(100.0, 100.0, 150.0, 150.0))]
    #[case::touching_edges(bbox(0.0, 0.0, 50.0, 50.0), bbox(50.0, 0.0, 100.0, 50.0))]
    #[case::zero_width(bbox(0.0, 0.0, 0.0, 100.0), bbox(0.0, 0.0, 50.0, 50.0))]
    fn test_iou_zero(#[case] a: BoundingBox, #[case] b: BoundingBox) {
        assert_relative_eq!(a.iou(&b), 0.0);
    }

    // ── Pixel clamping ───────────────────────────────────────────────

    #[test]
    fn test_pixel_rect_truncates_like_integer_cast() {
        let rect = bbox(10.9, 20.2, 50.7, 80.99).to_pixel_rect(640, 480).unwrap();
        assert_eq!(
            rect,
            PixelRect {
                x: 10,
                y: 20,
                width: 40,
                height: 60
            }
        );
    }

    #[test]
    fn test_pixel_rect_clamps_to_frame() {
        let rect = bbox(-15.0, -3.0, 700.0, 500.0)
            .to_pixel_rect(640, 480)
            .unwrap();
        assert_eq!(
            rect,
            PixelRect {
                x: 0,
                y: 0,
                width: 640,
                height: 480
            }
        );
    }

    #[rstest]
    #[case::outside_right(bbox(700.0, 10.0, 800.0, 100.0))]
    #[case::inverted(bbox(100.0, 100.0, 50.0, 150.0))]
    #[case::sub_pixel(bbox(10.2, 10.0, 10.8, 50.0))]
    fn test_pixel_rect_empty(#[case] b: BoundingBox) {
        assert!(b.to_pixel_rect(640, 480).is_none());
    }

    #[test]
    fn test_anchor_truncates() {
        assert_eq!(bbox(12.7, 30.2, 90.0, 200.0).anchor(), (12, 30));
    }

    #[test]
    fn test_denormalize_maps_into_frame() {
        let rect = PixelRect {
            x: 100,
            y: 50,
            width: 200,
            height: 100,
        };
        assert_eq!(rect.denormalize(0.0, 0.0), (100, 50));
        assert_eq!(rect.denormalize(0.5, 0.5), (200, 100));
        assert_eq!(rect.denormalize(1.0, 1.0), (300, 150));
    }
}
