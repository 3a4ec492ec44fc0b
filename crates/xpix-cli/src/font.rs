//! Glyph rasterization for text watermarks.
//!
//! Text is rasterized into a coverage mask with `imageproc`, tinted with the
//! watermark color, and composited onto the canvas with the same "over"
//! operator image overlays use.

use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use glam::{IVec2, Vec2};
use image::{GrayImage, Luma};
use imageproc::drawing::{draw_text_mut, text_size};
use xpix_core::composite::blend_pixel;
use xpix_core::image::Rgba8;
use xpix_core::{PixelBuffer, TextRenderer};

/// Font searched for when the config names none.
const DEFAULT_FONT: &str = "Library/Fonts/CaskaydiaMonoNerdFont-Regular.ttf";

/// Platform default font location, relative to `$HOME`.
pub fn default_font_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(DEFAULT_FONT))
}

/// A loaded font that can draw onto a [`PixelBuffer`].
pub struct FontRenderer {
    font: FontVec,
}

impl FontRenderer {
    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let bytes = std::fs::read(path).map_err(|e| FontError::Read(path.to_path_buf(), e))?;
        Self::from_bytes(bytes).map_err(|_| FontError::Invalid(path.to_path_buf()))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ab_glyph::InvalidFont> {
        Ok(Self {
            font: FontVec::try_from_vec(bytes)?,
        })
    }
}

impl TextRenderer for FontRenderer {
    fn draw_text(
        &self,
        canvas: &mut PixelBuffer,
        text: &str,
        px_size: f32,
        anchor: Vec2,
        color: Rgba8,
    ) {
        if text.is_empty() || px_size <= 0.0 || color[3] == 0 {
            return;
        }
        let scale = PxScale::from(px_size);
        let (w, h) = text_size(scale, &self.font, text);
        if w == 0 || h == 0 {
            return;
        }

        let mut mask = GrayImage::new(w, h);
        draw_text_mut(&mut mask, Luma([255u8]), 0, 0, scale, &self.font, text);
        composite_mask(canvas, &mask, centered_offset(anchor, w, h), color);
    }
}

/// Top-left corner of a `w`×`h` box centered on `anchor`.
fn centered_offset(anchor: Vec2, w: u32, h: u32) -> IVec2 {
    let half = Vec2::new(w as f32, h as f32) / 2.0;
    (anchor - half).round().as_ivec2()
}

/// Tint a coverage mask with `color` and blend it onto `canvas` at `offset`.
///
/// Coverage multiplies the color's alpha; samples outside the canvas are
/// dropped.
fn composite_mask(canvas: &mut PixelBuffer, mask: &GrayImage, offset: IVec2, color: Rgba8) {
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    for (mx, my, Luma([coverage])) in mask.enumerate_pixels() {
        let x = i64::from(mx) + i64::from(offset.x);
        let y = i64::from(my) + i64::from(offset.y);
        if *coverage == 0 || x < 0 || y < 0 || x >= cw || y >= ch {
            continue;
        }
        let alpha = (u16::from(*coverage) * u16::from(color[3]) / 255) as u8;
        let (x, y) = (x as u32, y as u32);
        let dst = canvas.pixel(x, y);
        canvas.set_pixel(x, y, blend_pixel(dst, [color[0], color[1], color[2], alpha]));
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("cannot read font {}: {}", .0.display(), .1)]
    Read(PathBuf, std::io::Error),
    #[error("not a usable font file: {}", .0.display())]
    Invalid(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_is_centered_on_anchor() {
        assert_eq!(centered_offset(Vec2::new(100.0, 50.0), 40, 20), IVec2::new(80, 40));
        assert_eq!(centered_offset(Vec2::new(5.0, 5.0), 40, 20), IVec2::new(-15, -5));
    }

    #[test]
    fn test_mask_coverage_scales_alpha() {
        let mut canvas = PixelBuffer::filled(4, 1, [0, 0, 0, 255]);
        let mask = GrayImage::from_raw(2, 1, vec![255, 0]).unwrap();
        composite_mask(&mut canvas, &mask, IVec2::new(1, 0), [255, 255, 255, 255]);
        assert_eq!(canvas.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(canvas.pixel(1, 0), [255, 255, 255, 255]);
        assert_eq!(canvas.pixel(2, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_mask_outside_canvas_is_dropped() {
        let mut canvas = PixelBuffer::filled(2, 2, [0, 0, 0, 255]);
        let mask = GrayImage::from_raw(3, 3, vec![255; 9]).unwrap();
        composite_mask(&mut canvas, &mask, IVec2::new(-2, -2), [255, 0, 0, 255]);
        assert_eq!(canvas.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(canvas.pixel(1, 1), [0, 0, 0, 255]);
        assert_eq!(canvas.dimensions(), (2, 2));
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        assert!(FontRenderer::from_bytes(vec![0, 1, 2, 3]).is_err());
    }

    #[test]
    fn test_missing_font_file_is_a_read_error() {
        let err = FontRenderer::from_file(Path::new("/no/such/font.ttf")).err().unwrap();
        assert!(matches!(err, FontError::Read(..)));
        let message = err.to_string();
        assert!(message.starts_with("cannot read font /no/such/font.ttf: "), "{message}");
        assert!(message.len() > "cannot read font /no/such/font.ttf: ".len());
    }
}
