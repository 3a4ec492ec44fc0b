//! Stage orchestration: applies an `AdjustmentSpec` to a whole buffer.

use crate::color_science::{apply_dehaze, apply_temperature};
use crate::image::PixelBuffer;
use crate::transform::params::AdjustmentSpec;
use crate::transform::sharpen::sharpen;
use crate::transform::tone::{
    adjust_brightness, adjust_contrast, adjust_gamma, adjust_saturation,
};

/// Sharpen strength is divided by this before use as the blur sigma.
const SHARPEN_SCALE: f64 = 10.0;

const MAX_SHARPEN: f64 = 100.0;

/// Run the full adjustment chain.
///
/// Stage order is fixed; later stages see the cumulative result of earlier
/// ones:
/// 1. Dehaze
/// 2. Color temperature
/// 3. Exposure
/// 4. Brightness
/// 5. Contrast
/// 6. Saturation
/// 7. Gamma
/// 8. Sharpen
///
/// A stage whose parameter is neutral is skipped and the buffer moves on
/// untouched, so an identity spec returns the input byte for byte.
pub fn adjust(image: PixelBuffer, spec: &AdjustmentSpec) -> PixelBuffer {
    let mut image = image;

    if spec.dehaze_enabled() {
        image = run_stage("dehaze", image, |img| apply_dehaze(img, spec.dehaze));
    }
    if spec.temperature_enabled() {
        image = run_stage("temperature", image, |img| {
            apply_temperature(img, spec.temperature)
        });
    }
    if spec.exposure != 0.0 {
        image = run_stage("exposure", image, |img| adjust_brightness(img, spec.exposure));
    }
    if spec.brightness != 0.0 {
        image = run_stage("brightness", image, |img| {
            adjust_brightness(img, spec.brightness)
        });
    }
    if spec.contrast != 0.0 {
        image = run_stage("contrast", image, |img| adjust_contrast(img, spec.contrast));
    }
    if spec.saturation != 0.0 {
        image = run_stage("saturation", image, |img| {
            adjust_saturation(img, spec.saturation)
        });
    }
    if spec.gamma_enabled() {
        image = run_stage("gamma", image, |img| adjust_gamma(img, spec.gamma));
    }
    if spec.sharpen_enabled() {
        image = run_stage("sharpen", image, |img| {
            sharpen(img, spec.sharpen.min(MAX_SHARPEN) / SHARPEN_SCALE)
        });
    }

    image
}

/// Hand the working buffer to one stage and drop it once the stage is done.
fn run_stage(
    name: &'static str,
    input: PixelBuffer,
    stage: impl FnOnce(&PixelBuffer) -> PixelBuffer,
) -> PixelBuffer {
    tracing::debug!(stage = name, width = input.width(), height = input.height(), "applying");
    stage(&input)
}
