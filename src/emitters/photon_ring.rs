// Copyright @yucwang 2026

use crate::core::kerr::BlackHole;
use crate::core::radiance::smoothstep;
use crate::math::constants::{Float, TWO_PI};
use crate::math::spectrum::RGBSpectrum;

// Widths and weights of the three ring terms. Hand-tuned for appearance.
const SHARP_WIDTH: Float = 0.02;
const SECONDARY_WIDTH: Float = 0.08;
const GLOW_WIDTH: Float = 0.3;
const SECONDARY_WEIGHT: Float = 0.35;
const GLOW_WEIGHT: Float = 0.08;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhotonRingSettings {
    pub intensity: Float,
    pub color: RGBSpectrum,
}

impl Default for PhotonRingSettings {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            color: RGBSpectrum::new(1.0, 0.85, 0.6),
        }
    }
}

/// Brightening of rays that skimmed the unstable photon orbit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhotonRing {
    settings: PhotonRingSettings,
}

impl PhotonRing {
    pub fn new(settings: PhotonRingSettings) -> Self {
        Self { settings }
    }

    /// Fractional distance of the closest approach from the photon sphere.
    pub fn closeness(black_hole: &BlackHole, min_radius: Float) -> Float {
        let r_ps = black_hole.photon_sphere_radius();
        (min_radius - r_ps).abs() / r_ps
    }

    pub fn revolutions(total_phi_change: Float) -> Float {
        total_phi_change.abs() / TWO_PI
    }

    /// Sum of a sharp ring, a secondary ring that needs at least half a
    /// winding, and a wide soft glow.
    pub fn enhancement(&self, black_hole: &BlackHole, min_radius: Float, total_phi_change: Float) -> Float {
        if !min_radius.is_finite() {
            return 0.0;
        }
        let d = Self::closeness(black_hole, min_radius);
        let turns = Self::revolutions(total_phi_change);

        let sharp = (-d / SHARP_WIDTH).exp() * turns.min(2.0) * 0.5;
        let secondary = SECONDARY_WEIGHT * (-d / SECONDARY_WIDTH).exp() * smoothstep(0.5, 1.0, turns);
        let glow = GLOW_WEIGHT * (-d / GLOW_WIDTH).exp();
        self.settings.intensity * (sharp + secondary + glow)
    }

    pub fn contribution(&self, black_hole: &BlackHole, min_radius: Float, total_phi_change: Float) -> RGBSpectrum {
        self.settings.color * self.enhancement(black_hole, min_radius, total_phi_change)
    }
}
