// Copyright @yucwang 2026

use crate::core::geodesic_integrator::JetZone;
use crate::core::kerr::BlackHole;
use crate::core::radiance::doppler_factor;
use crate::math::constants::{Float, Vector3f, TWO_PI};
use crate::math::spectrum::RGBSpectrum;

// Knot shape is a visual calibration, not a transport model.
const KNOT_CONTRAST: Float = 0.8;
const KNOT_SHARPNESS: i32 = 6;
const MAX_JET_BOOST: Float = 30.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct JetSettings {
    /// Jets are launched only above this |a|/M.
    pub min_spin: Float,
    /// Emission starts this far above the equatorial plane, in units of M.
    pub min_height: Float,
    pub length: Float,
    pub base_radius: Float,
    /// Half opening angle of the cone, radians.
    pub opening_angle: Float,
    pub bulk_velocity: Float,
    pub knot_spacing: Float,
    pub knot_speed: Float,
    pub brightness: Float,
    pub color: RGBSpectrum,
}

impl Default for JetSettings {
    fn default() -> Self {
        Self {
            min_spin: 0.1,
            min_height: 3.0,
            length: 60.0,
            base_radius: 1.0,
            opening_angle: 0.12,
            bulk_velocity: 0.9,
            knot_spacing: 8.0,
            knot_speed: 2.0,
            brightness: 0.04,
            color: RGBSpectrum::new(0.45, 0.6, 1.0),
        }
    }
}

/// Pair of collimated outflows along ±z. Power follows the Blandford-Znajek
/// a² scaling.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RelativisticJet {
    settings: JetSettings,
}

impl RelativisticJet {
    pub fn new(settings: JetSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &JetSettings {
        &self.settings
    }

    pub fn is_active(&self, black_hole: &BlackHole) -> bool {
        black_hole.chi().abs() > self.settings.min_spin
    }

    pub fn zone(&self) -> JetZone {
        JetZone {
            min_height: self.settings.min_height,
            base_radius: self.settings.base_radius,
            opening_tan: self.settings.opening_angle.tan(),
        }
    }

    /// Periodic brightness modulation travelling outward with time.
    pub fn knot_modulation(&self, height: Float, time: Float) -> Float {
        let phase = TWO_PI * (height.abs() - self.settings.knot_speed * time) / self.settings.knot_spacing;
        let pulse = (0.5 + 0.5 * phase.cos()).powi(KNOT_SHARPNESS);
        1.0 - KNOT_CONTRAST + KNOT_CONTRAST * (0.3 + pulse)
    }

    /// Emission collected over a march segment of length `step_length`
    /// ending at `position`.
    pub fn emission(
        &self,
        black_hole: &BlackHole,
        position: &Vector3f,
        toward_observer: &Vector3f,
        step_length: Float,
        time: Float,
    ) -> RGBSpectrum {
        if !self.is_active(black_hole) {
            return RGBSpectrum::default();
        }

        let zone = self.zone();
        let height = position.z;
        let cylindrical = position.x.hypot(position.y);
        if !zone.contains(cylindrical, height) || height.abs() > self.settings.length {
            return RGBSpectrum::default();
        }

        let width = zone.radius_at(height);
        let core = (-2.0 * (cylindrical / width).powi(2)).exp();
        let axial = (-2.0 * height.abs() / self.settings.length).exp();
        let spin2 = black_hole.chi() * black_hole.chi();

        // bulk flow is along +z above the plane and −z below
        let cos_psi = height.signum() * toward_observer.z;
        let boost = doppler_factor(self.settings.bulk_velocity, cos_psi).powi(3).min(MAX_JET_BOOST);

        let intensity = self.settings.brightness
            * spin2
            * core
            * axial
            * self.knot_modulation(height, time)
            * boost
            * step_length;
        self.settings.color * intensity
    }
}
