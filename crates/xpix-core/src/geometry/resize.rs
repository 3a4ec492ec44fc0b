//! Resampling to a target size.
//!
//! Dimension resolution is pure integer geometry and kept separate from the
//! pixel work so it can be tested without touching a buffer.
//!
//! Resampling uses the `image` crate's triangle (bilinear) filter. Its
//! weights are non-negative, so edges never overshoot or invert local
//! contrast the way Lanczos or Catmull-Rom kernels can.

use ::image::imageops::{self, FilterType};

use crate::error::{XpixError, XpixResult};
use crate::image::PixelBuffer;

const FILTER: FilterType = FilterType::Triangle;

/// Resolve the output size for a resize request.
///
/// - One zero dimension: the other is derived from the source aspect ratio
///   (regardless of `keep_ratio`).
/// - Both non-zero with `keep_ratio`: fit inside the box ("contain"); a
///   source already inside the box keeps its size.
/// - Both non-zero without `keep_ratio`: exactly `target_w × target_h`.
///
/// Both zero is rejected.
pub fn target_dimensions(
    src_w: u32,
    src_h: u32,
    target_w: u32,
    target_h: u32,
    keep_ratio: bool,
) -> XpixResult<(u32, u32)> {
    if target_w == 0 && target_h == 0 {
        return Err(XpixError::invalid_spec(
            "resize needs at least one non-zero target dimension",
        ));
    }
    if src_w == 0 || src_h == 0 {
        return Err(XpixError::invalid_spec("cannot resize an empty image"));
    }

    let dims = match (target_w, target_h) {
        (w, 0) => (w, scaled(w, src_h, src_w)),
        (0, h) => (scaled(h, src_w, src_h), h),
        (w, h) if !keep_ratio => (w, h),
        (w, h) if src_w <= w && src_h <= h => (src_w, src_h),
        (w, h) => {
            // Compare aspect ratios without floating point: src_w/src_h vs w/h.
            if u64::from(src_w) * u64::from(h) > u64::from(w) * u64::from(src_h) {
                (w, scaled(w, src_h, src_w))
            } else {
                (scaled(h, src_w, src_h), h)
            }
        }
    };
    Ok(dims)
}

/// `round(value × num / den)`, at least 1.
fn scaled(value: u32, num: u32, den: u32) -> u32 {
    let v = (f64::from(value) * f64::from(num) / f64::from(den)).round();
    (v as u32).max(1)
}

/// Resize `src` per [`target_dimensions`].
pub fn resize_to(
    src: &PixelBuffer,
    target_w: u32,
    target_h: u32,
    keep_ratio: bool,
) -> XpixResult<PixelBuffer> {
    let (w, h) = target_dimensions(src.width(), src.height(), target_w, target_h, keep_ratio)?;
    Ok(resample(src, w, h))
}

/// Downscale an overlay so its width does not exceed `max_w`.
///
/// Returns the size unchanged when it already fits. The height follows the
/// aspect ratio and never drops below one pixel.
pub fn scale_to_bound(asset_w: u32, asset_h: u32, max_w: u32) -> (u32, u32) {
    let max_w = max_w.max(1);
    if asset_w <= max_w {
        return (asset_w, asset_h);
    }
    (max_w, scaled(max_w, asset_h, asset_w))
}

/// Resample to exactly `w × h`. Same-size requests return a copy.
pub(crate) fn resample(src: &PixelBuffer, w: u32, h: u32) -> PixelBuffer {
    if src.dimensions() == (w, h) {
        return src.clone();
    }
    tracing::debug!(from_w = src.width(), from_h = src.height(), to_w = w, to_h = h, "resample");
    let resized = imageops::resize(&src.to_rgba_image(), w, h, FILTER);
    PixelBuffer::from_rgba_image(&resized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_only_keeps_aspect() {
        assert_eq!(target_dimensions(500, 250, 100, 0, true).unwrap(), (100, 50));
    }

    #[test]
    fn test_height_only_keeps_aspect() {
        assert_eq!(target_dimensions(500, 250, 0, 100, true).unwrap(), (200, 100));
    }

    #[test]
    fn test_single_dimension_ignores_keep_ratio_flag() {
        assert_eq!(target_dimensions(500, 250, 100, 0, false).unwrap(), (100, 50));
    }

    #[test]
    fn test_contain_picks_smaller_scale() {
        // Wide source limited by width.
        assert_eq!(target_dimensions(1000, 500, 400, 400, true).unwrap(), (400, 200));
        // Tall source limited by height.
        assert_eq!(target_dimensions(500, 1000, 400, 400, true).unwrap(), (200, 400));
    }

    #[test]
    fn test_contain_never_upscales() {
        assert_eq!(target_dimensions(120, 80, 400, 400, true).unwrap(), (120, 80));
    }

    #[test]
    fn test_forced_size_distorts() {
        assert_eq!(target_dimensions(500, 250, 300, 300, false).unwrap(), (300, 300));
    }

    #[test]
    fn test_both_zero_is_rejected() {
        let err = target_dimensions(10, 10, 0, 0, true).unwrap_err();
        assert!(matches!(err, XpixError::InvalidSpec(_)));
    }

    #[test]
    fn test_derived_dimension_is_at_least_one() {
        assert_eq!(target_dimensions(1000, 1, 10, 0, true).unwrap(), (10, 1));
    }

    #[test]
    fn test_resize_to_produces_target_size() {
        let src = PixelBuffer::filled(500, 250, [10, 20, 30, 255]);
        let out = resize_to(&src, 100, 0, true).unwrap();
        assert_eq!(out.dimensions(), (100, 50));
        assert!(out.pixels().iter().all(|p| *p == [10, 20, 30, 255]));
    }

    #[test]
    fn test_resize_does_not_overshoot_edges() {
        let mut pixels = Vec::new();
        for _ in 0..8 {
            for x in 0..16u32 {
                let v = if x < 8 { 20 } else { 220 };
                pixels.push([v, v, v, 255]);
            }
        }
        let src = PixelBuffer::new(16, 8, pixels).unwrap();
        let out = resize_to(&src, 40, 20, false).unwrap();
        for y in 0..out.height() {
            let row = out.row(y);
            assert!(row.iter().all(|p| (20..=220).contains(&p[0])));
            assert!(row.windows(2).all(|w| w[0][0] <= w[1][0]), "edge response not monotonic");
        }
    }

    #[test]
    fn test_scale_to_bound() {
        assert_eq!(scale_to_bound(400, 200, 200), (200, 100));
        assert_eq!(scale_to_bound(150, 300, 200), (150, 300));
        assert_eq!(scale_to_bound(50, 50, 0), (1, 1));
    }
}
