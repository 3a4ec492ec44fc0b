//! Compositing: alpha blending and watermark application.

pub mod blend;
pub mod watermark;

pub use blend::{blend, blend_pixel, scale_alpha};
