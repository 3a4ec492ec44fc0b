//! Per-pixel dehaze heuristic.
//!
//! This is a local contrast and saturation stretch, not a physically
//! modeled haze removal: there is no dark-channel prior, no transmission
//! map, and no global statistics. Each pixel is processed on its own.
//!
//! ```text
//! factor = strength / 100
//! gray   = (r + g + b) / 3
//! c'     = clamp(gray + (c − gray) × (1 + 0.5 × factor))
//! c''    = clamp(max − (max − c') × (1 + 0.3 × factor))   when max > min
//! ```

use crate::color_science::clamp_channel;
use crate::image::{PixelBuffer, Rgba8};
use crate::transform::parallel::map_pixels;

/// Apply the dehaze stretch with `strength` in `[0, 100]`.
///
/// Strength 0 returns an unmodified copy.
pub fn apply_dehaze(src: &PixelBuffer, strength: f64) -> PixelBuffer {
    if strength <= 0.0 {
        return src.clone();
    }
    let factor = strength.min(100.0) / 100.0;
    map_pixels(src, |px| dehaze_pixel(px, factor))
}

fn dehaze_pixel(px: Rgba8, factor: f64) -> Rgba8 {
    let mut rgb = [f64::from(px[0]), f64::from(px[1]), f64::from(px[2])];

    // Contrast stretch around the pixel's own gray.
    let gray = (rgb[0] + rgb[1] + rgb[2]) / 3.0;
    let contrast = 1.0 + factor * 0.5;
    for c in &mut rgb {
        *c = clamp_channel(gray + (*c - gray) * contrast);
    }

    // Saturation stretch away from the brightest channel.
    let max = rgb[0].max(rgb[1]).max(rgb[2]);
    let min = rgb[0].min(rgb[1]).min(rgb[2]);
    if max > min {
        let saturation = 1.0 + factor * 0.3;
        for c in &mut rgb {
            *c = clamp_channel(max - (max - *c) * saturation);
        }
    }

    [rgb[0] as u8, rgb[1] as u8, rgb[2] as u8, px[3]]
}
