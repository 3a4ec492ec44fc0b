//! Rectangular crop.

use crate::error::{XpixError, XpixResult};
use crate::image::PixelBuffer;

/// Extract `[x, x + w) × [y, y + h)` from `src`.
///
/// Empty rectangles and rectangles reaching outside the source are rejected
/// with [`XpixError::GeometryOverflow`] rather than silently clamped.
pub fn crop_to(src: &PixelBuffer, x: u32, y: u32, w: u32, h: u32) -> XpixResult<PixelBuffer> {
    if w == 0 || h == 0 {
        return Err(XpixError::geometry_overflow(format!(
            "crop rectangle {w}x{h} is empty"
        )));
    }
    let right = u64::from(x) + u64::from(w);
    let bottom = u64::from(y) + u64::from(h);
    if right > u64::from(src.width()) || bottom > u64::from(src.height()) {
        return Err(XpixError::geometry_overflow(format!(
            "crop rectangle {w}x{h}+{x}+{y} exceeds {}x{} source",
            src.width(),
            src.height()
        )));
    }

    let (x, w) = (x as usize, w as usize);
    let mut pixels = Vec::with_capacity(w * h as usize);
    for row in y..y + h {
        pixels.extend_from_slice(&src.row(row)[x..x + w]);
    }
    PixelBuffer::new(w as u32, h, pixels)
}
