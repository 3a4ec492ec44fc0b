//! Straight-alpha "over" compositing.
//!
//! ```text
//! a2'  = a2 × opacity                      (once per pixel, truncated)
//! k2   = a2' / 255
//! k1   = (1 − k2) × a1 / 255
//! rgb  = (rgb1 × k1 + rgb2 × k2) / (k1 + k2)
//! a    = min(a1 + a2' × (255 − a1) / 255, 255)
//! ```
//!
//! Opacity scales the overlay's own alpha exactly once, so an overlay that
//! already carries partial alpha is not faded twice.

use glam::IVec2;

use crate::image::{PixelBuffer, Rgba8};

/// Composite `overlay` onto `base` with its top-left corner at `offset`.
///
/// Overlay samples falling outside `base` are dropped; the base keeps its
/// dimensions. `opacity` is clamped to `[0, 1]`.
pub fn blend(
    mut base: PixelBuffer,
    overlay: &PixelBuffer,
    offset: IVec2,
    opacity: f64,
) -> PixelBuffer {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || base.is_empty() || overlay.is_empty() {
        return base;
    }

    let Some((x_range, y_range)) = visible_span(base.width(), base.height(), overlay, offset) else {
        return base;
    };

    for oy in y_range {
        let by = (i64::from(oy) + i64::from(offset.y)) as u32;
        for ox in x_range.clone() {
            let bx = (i64::from(ox) + i64::from(offset.x)) as u32;
            let src = scale_alpha(overlay.pixel(ox, oy), opacity);
            let dst = base.pixel(bx, by);
            base.set_pixel(bx, by, blend_pixel(dst, src));
        }
    }
    base
}

/// Multiply a pixel's alpha by `opacity`, truncating.
pub fn scale_alpha(px: Rgba8, opacity: f64) -> Rgba8 {
    [px[0], px[1], px[2], (f64::from(px[3]) * opacity) as u8]
}

/// Straight-alpha "over" of `src` onto `dst`.
pub fn blend_pixel(dst: Rgba8, src: Rgba8) -> Rgba8 {
    if src[3] == 0 {
        return dst;
    }
    let a1 = f64::from(dst[3]);
    let a2 = f64::from(src[3]);

    let k2 = a2 / 255.0;
    let k1 = (1.0 - k2) * a1 / 255.0;
    let sum = k1 + k2;
    let (k1, k2) = (k1 / sum, k2 / sum);

    let mut out = [0u8; 4];
    for c in 0..3 {
        out[c] = (f64::from(dst[c]) * k1 + f64::from(src[c]) * k2) as u8;
    }
    out[3] = (a1 + a2 * (255.0 - a1) / 255.0).min(255.0) as u8;
    out
}

/// Overlay-space column and row ranges that land inside the base.
fn visible_span(
    base_w: u32,
    base_h: u32,
    overlay: &PixelBuffer,
    offset: IVec2,
) -> Option<(std::ops::Range<u32>, std::ops::Range<u32>)> {
    let axis = |base: u32, len: u32, off: i32| {
        let start = (-i64::from(off)).max(0);
        let end = (i64::from(base) - i64::from(off)).min(i64::from(len));
        (start < end).then(|| start as u32..end as u32)
    };
    Some((
        axis(base_w, overlay.width(), offset.x)?,
        axis(base_h, overlay.height(), offset.y)?,
    ))
}
