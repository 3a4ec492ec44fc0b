//! Tone-curve primitives (brightness, contrast, saturation, gamma).
//!
//! Brightness, contrast and gamma act on each color channel independently
//! through a 256-entry lookup table; saturation works in HSL. All four leave
//! alpha untouched and return an exact copy at their neutral value.

use palette::{Hsl, IntoColor, Srgb};

use crate::image::PixelBuffer;
use crate::transform::parallel::map_pixels;

/// Lower bound for gamma before taking the reciprocal.
const MIN_GAMMA: f64 = 1e-4;

/// Shift every channel by `percentage` of full scale.
///
/// ```text
/// out = clamp(in + 255 × p / 100)        p ∈ [−100, 100]
/// ```
///
/// Used for both exposure and brightness.
pub fn adjust_brightness(src: &PixelBuffer, percentage: f64) -> PixelBuffer {
    let p = percentage.clamp(-100.0, 100.0);
    if p == 0.0 {
        return src.clone();
    }
    let shift = 255.0 * p / 100.0;
    apply_lut(src, &build_lut(|v| v + shift))
}

/// Stretch or compress channels around mid-gray.
///
/// ```text
/// v = (100 + p) / 100
/// 0 <= v <= 1 : out = (0.5 + (in/255 − 0.5) × v) × 255
/// 1 <  v <  2 : out = (0.5 + (in/255 − 0.5) / (2 − v)) × 255
/// v == 2      : hard threshold at mid-gray
/// ```
pub fn adjust_contrast(src: &PixelBuffer, percentage: f64) -> PixelBuffer {
    let p = percentage.clamp(-100.0, 100.0);
    if p == 0.0 {
        return src.clone();
    }
    let v = (100.0 + p) / 100.0;
    let lut = build_lut(|i| {
        let x = i / 255.0 - 0.5;
        if v <= 1.0 {
            (0.5 + x * v) * 255.0
        } else if v < 2.0 {
            (0.5 + x / (2.0 - v)) * 255.0
        } else if x < 0.0 {
            0.0
        } else {
            255.0
        }
    });
    apply_lut(src, &lut)
}

/// Scale HSL saturation by `1 + p / 100`, capped at fully saturated.
///
/// `p = -100` yields grayscale.
pub fn adjust_saturation(src: &PixelBuffer, percentage: f64) -> PixelBuffer {
    let p = percentage.clamp(-100.0, 100.0);
    if p == 0.0 {
        return src.clone();
    }
    let multiplier = (1.0 + p / 100.0) as f32;
    map_pixels(src, |px| {
        let rgb = Srgb::new(px[0], px[1], px[2]).into_format::<f32>();
        let mut hsl: Hsl = rgb.into_color();
        hsl.saturation = (hsl.saturation * multiplier).min(1.0);
        let out: Srgb = hsl.into_color();
        [
            to_u8(out.red),
            to_u8(out.green),
            to_u8(out.blue),
            px[3],
        ]
    })
}

/// Power curve with exponent `1 / gamma`. Gamma above 1 brightens midtones.
pub fn adjust_gamma(src: &PixelBuffer, gamma: f64) -> PixelBuffer {
    if gamma == 1.0 {
        return src.clone();
    }
    let exponent = 1.0 / gamma.max(MIN_GAMMA);
    apply_lut(src, &build_lut(|i| (i / 255.0).powf(exponent) * 255.0))
}

/// Build a channel LUT from a curve over `[0, 255]`, rounding to nearest.
fn build_lut(curve: impl Fn(f64) -> f64) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = curve(i as f64).clamp(0.0, 255.0).round() as u8;
    }
    lut
}

fn apply_lut(src: &PixelBuffer, lut: &[u8; 256]) -> PixelBuffer {
    map_pixels(src, |px| {
        [
            lut[px[0] as usize],
            lut[px[1] as usize],
            lut[px[2] as usize],
            px[3],
        ]
    })
}

fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}
