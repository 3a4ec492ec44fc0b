//! Unsharp-mask sharpening.
//!
//! The image is blurred with a separable Gaussian, then the difference
//! between source and blur is added back:
//!
//! ```text
//! out = clamp(2 × src − gaussian(src, σ))
//! ```
//!
//! The blur window is truncated at the image border and renormalized, and
//! color is weighted by alpha so transparent pixels do not bleed their RGB
//! into neighbours. Alpha itself is never sharpened.
//!
//! Both passes read a fixed halo of ⌈3σ⌉ source pixels around each output
//! pixel. Rows are produced in parallel from a read-only source, so the
//! result does not depend on the worker count.

use crate::image::{PixelBuffer, Rgba8};
use crate::transform::parallel::map_rows;

/// Sharpen with Gaussian radius `sigma` (in pixels). `sigma <= 0` is a copy.
pub fn sharpen(src: &PixelBuffer, sigma: f64) -> PixelBuffer {
    if sigma <= 0.0 || src.is_empty() {
        return src.clone();
    }
    let blurred = gaussian_blur(src, sigma);
    map_rows(src, |y, out| {
        for ((dst, &px), &soft) in out.iter_mut().zip(src.row(y)).zip(blurred.row(y)) {
            *dst = [
                unsharp(px[0], soft[0]),
                unsharp(px[1], soft[1]),
                unsharp(px[2], soft[2]),
                px[3],
            ];
        }
    })
}

/// Separable Gaussian blur with kernel radius ⌈3σ⌉.
pub fn gaussian_blur(src: &PixelBuffer, sigma: f64) -> PixelBuffer {
    if sigma <= 0.0 || src.is_empty() {
        return src.clone();
    }
    // Taps past the longest side are never read.
    let max_radius = src.width().max(src.height()) as usize;
    let kernel = gaussian_kernel(sigma, max_radius);
    let horizontal = blur_horizontal(src, &kernel);
    blur_vertical(&horizontal, &kernel)
}

/// Half-kernel: `kernel[d]` is the weight at distance `d`, for
/// `d <= min(⌈3σ⌉, max_radius)`.
fn gaussian_kernel(sigma: f64, max_radius: usize) -> Vec<f64> {
    let radius = ((sigma * 3.0).ceil() as usize).min(max_radius);
    let denom = 2.0 * sigma * sigma;
    (0..=radius)
        .map(|d| {
            let d = d as f64;
            (-d * d / denom).exp()
        })
        .collect()
}

fn blur_horizontal(src: &PixelBuffer, kernel: &[f64]) -> PixelBuffer {
    let width = src.width() as usize;
    let radius = kernel.len() - 1;
    map_rows(src, |y, out| {
        let row = src.row(y);
        for (x, dst) in out.iter_mut().enumerate() {
            let start = x.saturating_sub(radius);
            let end = (x + radius).min(width - 1);
            let taps = (start..=end).map(|ix| (row[ix], kernel[ix.abs_diff(x)]));
            *dst = weighted_average(taps);
        }
    })
}

fn blur_vertical(src: &PixelBuffer, kernel: &[f64]) -> PixelBuffer {
    let height = src.height() as usize;
    let radius = kernel.len() - 1;
    map_rows(src, |y, out| {
        let y = y as usize;
        let start = y.saturating_sub(radius);
        let end = (y + radius).min(height - 1);
        for (x, dst) in out.iter_mut().enumerate() {
            let taps = (start..=end).map(|iy| (src.row(iy as u32)[x], kernel[iy.abs_diff(y)]));
            *dst = weighted_average(taps);
        }
    })
}

/// Alpha-weighted average of `(pixel, weight)` taps.
fn weighted_average(taps: impl Iterator<Item = (Rgba8, f64)>) -> Rgba8 {
    let mut rgb = [0.0_f64; 3];
    let mut alpha = 0.0_f64;
    let mut weight_sum = 0.0_f64;
    for (px, weight) in taps {
        let wa = f64::from(px[3]) * weight;
        for c in 0..3 {
            rgb[c] += f64::from(px[c]) * wa;
        }
        alpha += wa;
        weight_sum += weight;
    }

    let mut out = [0u8; 4];
    if alpha > 0.0 {
        for c in 0..3 {
            out[c] = round_channel(rgb[c] / alpha);
        }
    }
    if weight_sum > 0.0 {
        out[3] = round_channel(alpha / weight_sum);
    }
    out
}

fn unsharp(src: u8, blurred: u8) -> u8 {
    (2 * i32::from(src) - i32::from(blurred)).clamp(0, 255) as u8
}

fn round_channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}
