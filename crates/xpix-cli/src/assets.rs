//! Filesystem-backed watermark assets.

use std::path::{Path, PathBuf};

use xpix_core::{AssetSource, PixelBuffer, TextRenderer, XpixError, XpixResult};

use crate::font::{FontRenderer, default_font_path};
use crate::image_io::load_image;

/// Loads overlay images and the watermark font from disk.
pub struct FileAssets {
    font_path: Option<PathBuf>,
}

impl FileAssets {
    /// `font_path` of `None` falls back to the platform default font.
    pub fn new(font_path: Option<PathBuf>) -> Self {
        Self { font_path }
    }
}

impl AssetSource for FileAssets {
    fn load_overlay(&self, path: &Path) -> XpixResult<PixelBuffer> {
        load_image(path)
            .map_err(|e| XpixError::asset_unavailable(format!("{}: {e}", path.display())))
    }

    fn load_font(&self) -> XpixResult<Box<dyn TextRenderer>> {
        let path = self
            .font_path
            .clone()
            .or_else(default_font_path)
            .ok_or_else(|| XpixError::asset_unavailable("no font path configured"))?;
        let renderer = FontRenderer::from_file(&path)
            .map_err(|e| XpixError::asset_unavailable(e.to_string()))?;
        tracing::debug!(font = %path.display(), "loaded watermark font");
        Ok(Box::new(renderer))
    }
}

#[cfg(test)]
mod tests {
    use xpix_core::composite::watermark::{WatermarkRequest, WatermarkSpec};
    use xpix_core::{WatermarkConfig, apply_watermark};

    use super::*;

    #[test]
    fn test_missing_overlay_is_asset_unavailable() {
        let assets = FileAssets::new(None);
        let err = assets.load_overlay(Path::new("/no/such/logo.png")).unwrap_err();
        assert!(matches!(err, XpixError::AssetUnavailable(_)));
    }

    #[test]
    fn test_missing_font_passes_text_watermark_through() {
        let config = WatermarkConfig::default();
        let request = WatermarkRequest {
            text: "© xpix".into(),
            ..Default::default()
        };
        let spec = WatermarkSpec::from_request(&request, &config).unwrap();
        let base = PixelBuffer::filled(64, 32, [10, 20, 30, 255]);
        let assets = FileAssets::new(Some(PathBuf::from("/no/such/font.ttf")));

        let out = apply_watermark(base.clone(), &spec, &config, &assets).unwrap();
        assert_eq!(out, base);
    }
}
