//! The adjustment request.
//!
//! `AdjustmentSpec` carries every tonal and color operation the pipeline
//! can apply. Each field has a neutral value at which its stage is skipped.

use serde::{Deserialize, Serialize};

use crate::color_science::NEUTRAL_KELVIN;

/// Immutable description of one adjustment request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentSpec {
    /// Channel shift in percent of full scale, `[-100, 100]`. Neutral: 0.
    pub brightness: f64,
    /// Contrast around mid-gray, `[-100, 100]`. Neutral: 0.
    pub contrast: f64,
    /// HSL saturation scale in percent, `[-100, 100]`. Neutral: 0.
    pub saturation: f64,
    /// Exposure shift, same curve as brightness, `[-100, 100]`. Neutral: 0.
    pub exposure: f64,
    /// Unsharp-mask strength, `[0, 100]`. Divided by 10 to get the blur sigma.
    pub sharpen: f64,
    /// Gamma exponent, conventionally `[0.1, 3.0]`. Neutral: 1.0.
    pub gamma: f64,
    /// White point in Kelvin, conventionally `[2000, 10000]`. Neutral: 6500.
    pub temperature: i32,
    /// Dehaze strength, `[0, 100]`. Neutral: 0.
    pub dehaze: f64,
}

impl AdjustmentSpec {
    /// True when every stage would be skipped.
    pub fn is_identity(&self) -> bool {
        !self.dehaze_enabled()
            && !self.temperature_enabled()
            && self.exposure == 0.0
            && self.brightness == 0.0
            && self.contrast == 0.0
            && self.saturation == 0.0
            && !self.gamma_enabled()
            && !self.sharpen_enabled()
    }

    pub(crate) fn dehaze_enabled(&self) -> bool {
        self.dehaze > 0.0
    }

    /// 0 is treated as "unset" alongside the 6500 K daylight point.
    pub(crate) fn temperature_enabled(&self) -> bool {
        self.temperature != 0 && self.temperature != NEUTRAL_KELVIN
    }

    /// Non-positive gamma is treated as "unset".
    pub(crate) fn gamma_enabled(&self) -> bool {
        self.gamma > 0.0 && self.gamma != 1.0
    }

    pub(crate) fn sharpen_enabled(&self) -> bool {
        self.sharpen > 0.0
    }
}

impl Default for AdjustmentSpec {
    /// Produces an identity request; the image passes through unchanged.
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            exposure: 0.0,
            sharpen: 0.0,
            gamma: 1.0,
            temperature: NEUTRAL_KELVIN,
            dehaze: 0.0,
        }
    }
}
