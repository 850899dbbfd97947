// Copyright @yucwang 2026

use crate::math::constants::Float;
use crate::math::spectrum::RGBSpectrum;

pub const MIN_COLOR_TEMPERATURE: Float = 1000.0;
pub const MAX_COLOR_TEMPERATURE: Float = 40000.0;

/// Blackbody colour of a temperature in Kelvin, normalised to [0, 1] per
/// channel. Curve fit of the CIE blackbody locus (Helland), valid on
/// 1000K..40000K; inputs are clamped into that range.
pub fn blackbody_to_rgb(temperature: Float) -> RGBSpectrum {
    let t = temperature.clamp(MIN_COLOR_TEMPERATURE, MAX_COLOR_TEMPERATURE) / 100.0;

    let r = if t <= 66.0 {
        255.0
    } else {
        329.698727446 * (t - 60.0).powf(-0.1332047592)
    };

    let g = if t <= 66.0 {
        99.4708025861 * t.ln() - 161.1195681661
    } else {
        288.1221695283 * (t - 60.0).powf(-0.0755148492)
    };

    let b = if t >= 66.0 {
        255.0
    } else if t <= 19.0 {
        0.0
    } else {
        138.5177312231 * (t - 10.0).ln() - 305.0447927307
    };

    RGBSpectrum::new(r / 255.0, g / 255.0, b / 255.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blackbody_hue_ordering() {
        let warm = blackbody_to_rgb(2500.0);
        let hot = blackbody_to_rgb(20000.0);
        assert!(warm[0] > warm[2]);
        assert!(hot[2] >= hot[0]);
    }

    #[test]
    fn test_blackbody_is_normalised() {
        for t in [0.0, 500.0, 3000.0, 6600.0, 12000.0, 1.0e6] {
            let c = blackbody_to_rgb(t);
            for idx in 0..3 {
                assert!(c[idx] >= 0.0 && c[idx] <= 1.0);
            }
        }
        // near-white around the solar temperature
        let sun = blackbody_to_rgb(6500.0);
        assert!(sun[0] > 0.9 && sun[1] > 0.9 && sun[2] > 0.9);
    }
}
