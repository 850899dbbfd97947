// Copyright @yucwang 2026

use crate::math::constants::Float;
use crate::math::spectrum::RGBSpectrum;

pub const MIN_DOPPLER_FACTOR: Float = 0.1;
pub const MAX_DOPPLER_FACTOR: Float = 10.0;
/// Speeds are kept strictly below c.
pub const MAX_SPEED: Float = 0.999;

/// Emission state at one sample point along a ray. Computed on demand and
/// folded into the per-ray accumulators.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct RadianceSample {
    pub temperature: Float,
    pub orbital_velocity: Float,
    pub doppler_factor: Float,
    pub gravitational_redshift: Float,
    pub emitted_color: RGBSpectrum,
    pub alpha: Float,
}

pub fn lorentz_factor(speed: Float) -> Float {
    let v = speed.abs().min(MAX_SPEED);
    1.0 / (1.0 - v * v).sqrt()
}

/// g = 1 / [γ (1 − v cos ψ)] where ψ is the angle between the emitter's
/// velocity and the direction toward the observer.
pub fn doppler_factor(speed: Float, cos_view_angle: Float) -> Float {
    let v = speed.clamp(-MAX_SPEED, MAX_SPEED);
    let cos_psi = cos_view_angle.clamp(-1.0, 1.0);
    let g = 1.0 / (lorentz_factor(v) * (1.0 - v * cos_psi));
    if g.is_finite() {
        g.clamp(MIN_DOPPLER_FACTOR, MAX_DOPPLER_FACTOR)
    } else {
        MAX_DOPPLER_FACTOR
    }
}

pub fn smoothstep(edge0: Float, edge1: Float, x: Float) -> Float {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
