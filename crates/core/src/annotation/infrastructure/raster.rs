//! Minimal raster primitives on RGB frames. Every write goes through
//! [`Frame::put_pixel`], so shapes may overrun the frame edges.

use crate::shared::frame::Frame;

/// Filled disc centred at `(cx, cy)`. A radius of 0 sets a single pixel.
///
/// A pixel is inside when `dx² + dy² <= r² + r`, which gives the same
/// discs as OpenCV's filled circles at small radii.
pub fn fill_circle(frame: &mut Frame, cx: i32, cy: i32, radius: i32, color: [u8; 3]) {
    let r2 = radius * radius + radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                frame.put_pixel(cx + dx, cy + dy, color);
            }
        }
    }
}

/// Bresenham line from `from` to `to`, `thickness` pixels wide.
pub fn draw_line(
    frame: &mut Frame,
    from: (i32, i32),
    to: (i32, i32),
    thickness: i32,
    color: [u8; 3],
) {
    let radius = (thickness / 2).max(0);
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        fill_circle(frame, x, y, radius, color);
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
