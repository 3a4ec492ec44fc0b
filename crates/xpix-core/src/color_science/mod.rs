//! Color science: Kelvin white-point gains and the dehaze heuristic.

pub mod dehaze;
pub mod kelvin;

pub use dehaze::apply_dehaze;
pub use kelvin::{NEUTRAL_KELVIN, apply_temperature, kelvin_to_gain};

/// Clamp a channel value to the 8-bit range without rounding.
pub(crate) fn clamp_channel(value: f64) -> f64 {
    value.clamp(0.0, 255.0)
}
