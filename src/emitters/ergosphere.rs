// Copyright @yucwang 2026

use crate::core::kerr::BlackHole;
use crate::math::constants::Float;
use crate::math::spectrum::RGBSpectrum;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ErgosphereSettings {
    /// Glow per unit path length at the horizon.
    pub intensity: Float,
    pub color: RGBSpectrum,
}

impl Default for ErgosphereSettings {
    fn default() -> Self {
        Self {
            intensity: 0.03,
            color: RGBSpectrum::new(0.6, 0.3, 1.0),
        }
    }
}

/// Faint volumetric tint of the region r_h < r < r_ergo(θ).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ErgosphereGlow {
    settings: ErgosphereSettings,
}

impl ErgosphereGlow {
    pub fn new(settings: ErgosphereSettings) -> Self {
        Self { settings }
    }

    pub fn emission(&self, black_hole: &BlackHole, r: Float, theta: Float, step_length: Float) -> RGBSpectrum {
        if !black_hole.is_inside_ergosphere(r, theta) {
            return RGBSpectrum::default();
        }
        let outer = black_hole.ergosphere_radius(theta);
        let inner = black_hole.event_horizon();
        let depth = ((outer - r) / (outer - inner).max(1e-9)).clamp(0.0, 1.0);
        self.settings.color * (self.settings.intensity * depth * step_length)
    }
}
