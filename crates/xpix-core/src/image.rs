//! Image representation for the adjustment pipeline.

use ::image::RgbaImage;

use crate::error::{XpixError, XpixResult};

/// One straight-alpha RGBA sample, 8 bits per channel.
pub type Rgba8 = [u8; 4];

/// Owned 8-bit RGBA raster, row-major.
///
/// Every pipeline stage consumes one `PixelBuffer` and produces a new one;
/// nothing mutates a buffer another stage still reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl PixelBuffer {
    /// Wrap existing samples. Fails unless `pixels.len() == width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgba8>) -> XpixResult<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(XpixError::invalid_spec(format!(
                "pixel buffer {width}x{height} expects {expected} samples, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A buffer where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Build from a decoded `image` raster.
    pub fn from_rgba_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let pixels = image.pixels().map(|p| p.0).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert into an `image` raster for resampling or encoding.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| ::image::Rgba(self.pixel(x, y)))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba8] {
        &mut self.pixels
    }

    /// Flat `R, G, B, A, R, ...` view of the samples.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Sample at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        self.pixels[self.index(x, y)]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, value: Rgba8) {
        let idx = self.index(x, y);
        self.pixels[idx] = value;
    }

    /// One row of samples.
    pub fn row(&self, y: u32) -> &[Rgba8] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{}",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }
}
