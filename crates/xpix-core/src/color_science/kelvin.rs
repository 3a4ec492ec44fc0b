//! Color temperature as per-channel multiplicative gain.
//!
//! Uses Tanner Helland's empirical fit of the Planckian locus: a black body
//! at the given temperature is rendered to 8-bit RGB and each channel is
//! normalized against full scale. Warm temperatures keep red saturated and
//! pull blue down; cool temperatures do the opposite.
//!
//! # Reference
//! - Helland, T. (2012), "How to Convert Temperature (K) to RGB"

use crate::color_science::clamp_channel;
use crate::image::PixelBuffer;
use crate::transform::parallel::map_pixels;

/// Daylight reference. Callers skip the temperature stage at this value.
pub const NEUTRAL_KELVIN: i32 = 6500;

const MIN_KELVIN: i32 = 1000;
const MAX_KELVIN: i32 = 40000;

/// Convert a color temperature to `[r, g, b]` gains in `[0, 1]`.
///
/// ```text
/// t = clamp(K, 1000, 40000) / 100
///
/// red   = 255                                   t <= 66
///       = 329.698727446 × (t − 60)^−0.1332047592  t >  66
/// green = 99.4708025861 × ln(t) − 161.1195681661  t <= 66
///       = 288.1221695283 × (t − 60)^−0.0755148492 t >  66
/// blue  = 255                                   t >= 66
///       = 0                                     t <= 19
///       = 138.5177312231 × ln(t − 10) − 305.0447927307
/// ```
///
/// Each channel is clamped to `[0, 255]` before dividing by 255.
#[allow(clippy::excessive_precision)]
pub fn kelvin_to_gain(kelvin: i32) -> [f64; 3] {
    let temp = f64::from(kelvin.clamp(MIN_KELVIN, MAX_KELVIN)) / 100.0;

    let red = if temp <= 66.0 {
        255.0
    } else {
        clamp_channel(329.698727446 * (temp - 60.0).powf(-0.1332047592))
    };

    let green = if temp <= 66.0 {
        clamp_channel(99.4708025861 * temp.ln() - 161.1195681661)
    } else {
        clamp_channel(288.1221695283 * (temp - 60.0).powf(-0.0755148492))
    };

    let blue = if temp >= 66.0 {
        255.0
    } else if temp <= 19.0 {
        0.0
    } else {
        clamp_channel(138.5177312231 * (temp - 10.0).ln() - 305.0447927307)
    };

    [red / 255.0, green / 255.0, blue / 255.0]
}

/// Scale R, G, B of every pixel by the gains for `kelvin`. Alpha is kept.
///
/// Not an identity at [`NEUTRAL_KELVIN`] (6500 K is slightly warm on this
/// curve), which is why the orchestrator skips the stage there.
pub fn apply_temperature(src: &PixelBuffer, kelvin: i32) -> PixelBuffer {
    let gain = kelvin_to_gain(kelvin);
    map_pixels(src, |px| {
        [
            clamp_channel(f64::from(px[0]) * gain[0]) as u8,
            clamp_channel(f64::from(px[1]) * gain[1]) as u8,
            clamp_channel(f64::from(px[2]) * gain[2]) as u8,
            px[3],
        ]
    })
}
