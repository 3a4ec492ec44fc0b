//! Geometry: placement, resize and crop.

pub mod crop;
pub mod placement;
pub mod resize;

pub use crop::crop_to;
pub use placement::{Anchor, Placement, resolve_position, resolve_text_anchor};
pub use resize::{resize_to, scale_to_bound, target_dimensions};
