//! Text and image watermarks.
//!
//! A raw [`WatermarkRequest`] is validated into a [`WatermarkSpec`] before
//! any pixel work happens. Fonts and overlay files come from an
//! [`AssetSource`] supplied by the caller; glyph rasterization happens
//! behind the [`TextRenderer`] trait.

use std::path::{Path, PathBuf};

use glam::{UVec2, Vec2};

use crate::composite::blend::blend;
use crate::config::WatermarkConfig;
use crate::error::{XpixError, XpixResult};
use crate::geometry::placement::{Anchor, resolve_position, resolve_text_anchor};
use crate::geometry::resize::{resample, scale_to_bound};
use crate::image::{PixelBuffer, Rgba8};

/// Overlay images are bounded to this fraction of the canvas width.
const OVERLAY_WIDTH_DIVISOR: u32 = 5;

/// Draws a string onto a canvas in place.
pub trait TextRenderer {
    /// Draw `text` at `px_size` with its glyph box centered on `anchor`.
    ///
    /// `color` carries straight alpha already scaled by the watermark opacity.
    fn draw_text(
        &self,
        canvas: &mut PixelBuffer,
        text: &str,
        px_size: f32,
        anchor: Vec2,
        color: Rgba8,
    );
}

/// Loads the external assets a watermark needs.
pub trait AssetSource {
    /// Decode an overlay image.
    fn load_overlay(&self, path: &Path) -> XpixResult<PixelBuffer>;

    /// Load the watermark font.
    fn load_font(&self) -> XpixResult<Box<dyn TextRenderer>>;
}

/// Watermark request as it arrives from the caller. Empty strings and a
/// zero opacity mean "not given".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatermarkRequest {
    pub text: String,
    pub image: String,
    pub position: String,
    pub opacity: f64,
}

/// What gets stamped onto the image.
#[derive(Debug, Clone, PartialEq)]
pub enum WatermarkSource {
    Text(String),
    Image(PathBuf),
}

/// A validated watermark with configuration defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkSpec {
    pub source: WatermarkSource,
    pub anchor: Anchor,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl WatermarkSpec {
    /// Validate a request. Exactly one of text or image must be set.
    ///
    /// Unset position and opacity are taken from `config`.
    pub fn from_request(request: &WatermarkRequest, config: &WatermarkConfig) -> XpixResult<Self> {
        let source = match (request.text.is_empty(), request.image.is_empty()) {
            (false, true) => WatermarkSource::Text(request.text.clone()),
            (true, false) => WatermarkSource::Image(PathBuf::from(&request.image)),
            (true, true) => {
                return Err(XpixError::invalid_spec(
                    "a watermark needs either text or an image",
                ));
            }
            (false, false) => {
                return Err(XpixError::invalid_spec(
                    "a watermark takes text or an image, not both",
                ));
            }
        };

        let position = if request.position.is_empty() {
            config.position.as_str()
        } else {
            request.position.as_str()
        };
        let opacity = if request.opacity == 0.0 {
            config.opacity
        } else {
            request.opacity
        };

        Ok(Self {
            source,
            anchor: Anchor::parse_or_default(position),
            opacity: opacity.clamp(0.0, 1.0),
        })
    }
}

/// Stamp a watermark onto `base`.
///
/// An unloadable overlay image aborts with [`XpixError::AssetUnavailable`].
/// An unloadable font only logs a warning and returns `base` untouched.
pub fn apply_watermark(
    base: PixelBuffer,
    spec: &WatermarkSpec,
    config: &WatermarkConfig,
    assets: &dyn AssetSource,
) -> XpixResult<PixelBuffer> {
    match &spec.source {
        WatermarkSource::Text(text) => match assets.load_font() {
            Ok(renderer) => Ok(apply_text_watermark(
                base,
                text,
                spec.anchor,
                spec.opacity,
                config,
                renderer.as_ref(),
            )),
            Err(e) => {
                tracing::warn!("skipping text watermark, font unavailable: {e}");
                Ok(base)
            }
        },
        WatermarkSource::Image(path) => {
            let overlay = assets.load_overlay(path).map_err(|e| match e {
                XpixError::AssetUnavailable(_) => e,
                other => XpixError::asset_unavailable(format!("{}: {other}", path.display())),
            })?;
            Ok(apply_image_watermark(base, &overlay, spec.anchor, spec.opacity, config))
        }
    }
}

/// Draw `text` centered on the anchor point.
///
/// Font size is `config.font_size` × canvas width; the fill color comes
/// from `config.color` with alpha `opacity × 255`.
pub fn apply_text_watermark(
    mut base: PixelBuffer,
    text: &str,
    anchor: Anchor,
    opacity: f64,
    config: &WatermarkConfig,
    renderer: &dyn TextRenderer,
) -> PixelBuffer {
    let canvas = UVec2::new(base.width(), base.height());
    let px_size = (f64::from(canvas.x) * config.font_size) as f32;
    let point = resolve_text_anchor(canvas, anchor, config.margin as f32);
    let color = parse_color(&config.color, opacity);
    tracing::debug!(%anchor, x = point.x, y = point.y, px_size, "text watermark");
    renderer.draw_text(&mut base, text, px_size, point, color);
    base
}

/// Downscale `overlay` to at most a fifth of the canvas width, place it
/// top-left-anchored, and blend it with `opacity`.
pub fn apply_image_watermark(
    base: PixelBuffer,
    overlay: &PixelBuffer,
    anchor: Anchor,
    opacity: f64,
    config: &WatermarkConfig,
) -> PixelBuffer {
    let max_w = base.width() / OVERLAY_WIDTH_DIVISOR;
    let (w, h) = scale_to_bound(overlay.width(), overlay.height(), max_w);
    let overlay = resample(overlay, w, h);

    let canvas = UVec2::new(base.width(), base.height());
    let placement = resolve_position(canvas, UVec2::new(w, h), anchor, config.image_margin);
    tracing::debug!(%anchor, x = placement.x(), y = placement.y(), w, h, "image watermark");
    blend(base, &overlay, placement.offset, opacity)
}

/// Parse `#RRGGBB` leniently.
///
/// Anything that is not six hex digits yields white; a pair that fails to
/// parse keeps that channel at 255. Alpha is `opacity × 255`, truncated.
pub fn parse_color(color: &str, opacity: f64) -> Rgba8 {
    let hex = color.trim().trim_start_matches('#');
    let mut rgb = [255u8; 3];
    if hex.len() == 6 && hex.is_ascii() {
        for (i, channel) in rgb.iter_mut().enumerate() {
            if let Ok(v) = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16) {
                *channel = v;
            }
        }
    }
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0) as u8;
    [rgb[0], rgb[1], rgb[2], alpha]
}
