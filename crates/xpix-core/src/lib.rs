//! xpix core: domain layer for photo adjustment and watermarking.
//!
//! This crate contains the color science, the tone pipeline, placement
//! geometry, alpha compositing and the configuration model. Decoding,
//! encoding and fonts live in the CLI: callers hand in a decoded
//! [`PixelBuffer`] and receive a new one back.

pub mod color_science;
pub mod composite;
pub mod config;
pub mod error;
pub mod geometry;
pub mod image;
pub mod transform;

// Re-exports for convenience.
pub use composite::watermark::{
    AssetSource, TextRenderer, WatermarkRequest, WatermarkSource, WatermarkSpec, apply_watermark,
};
pub use config::{Config, OutputConfig, OutputFormat, WatermarkConfig};
pub use error::{XpixError, XpixResult};
pub use geometry::placement::{Anchor, Placement};
pub use image::PixelBuffer;
pub use transform::evaluate::adjust;
pub use transform::params::AdjustmentSpec;
