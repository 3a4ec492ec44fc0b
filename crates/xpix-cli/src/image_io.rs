//! Decoding and encoding between image files and [`PixelBuffer`].

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat};
use xpix_core::{OutputConfig, OutputFormat, PixelBuffer};

/// Load an image from disk as 8-bit straight-alpha RGBA.
///
/// Any format the `image` crate can sniff or infer from the extension is
/// accepted; higher bit depths are narrowed to 8 bits.
pub fn load_image(path: &Path) -> Result<PixelBuffer, ImageIoError> {
    let img = image::open(path).map_err(ImageIoError::Decode)?;
    Ok(PixelBuffer::from_rgba_image(&img.to_rgba8()))
}

/// Encode `buffer` to `path`.
///
/// JPEG output drops alpha and uses `output.quality`; every other format
/// keeps RGBA.
pub fn save_image(
    buffer: &PixelBuffer,
    path: &Path,
    output: &OutputConfig,
) -> Result<(), ImageIoError> {
    let format = resolve_format(path, output.format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    match format {
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(buffer.to_rgba_image()).to_rgb8();
            let writer = BufWriter::new(File::create(path)?);
            let mut encoder = JpegEncoder::new_with_quality(writer, output.quality.clamp(1, 100));
            encoder.encode_image(&rgb).map_err(ImageIoError::Encode)?;
        }
        other => image::save_buffer_with_format(
            path,
            buffer.as_bytes(),
            buffer.width(),
            buffer.height(),
            ColorType::Rgba8,
            other,
        )
        .map_err(ImageIoError::Encode)?,
    }
    tracing::debug!(path = %path.display(), ?format, "encoded image");
    Ok(())
}

/// Pick the encoder for `path`. `Auto` follows the file extension.
pub fn resolve_format(path: &Path, format: OutputFormat) -> Result<ImageFormat, ImageIoError> {
    match format {
        OutputFormat::Jpeg => Ok(ImageFormat::Jpeg),
        OutputFormat::Png => Ok(ImageFormat::Png),
        OutputFormat::Auto => ImageFormat::from_path(path)
            .map_err(|_| ImageIoError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Errors that can occur while reading or writing image files.
#[derive(Debug, thiserror::Error)]
pub enum ImageIoError {
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
    #[error("cannot infer an output format from {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
