// Copyright @yucwang 2026

use crate::core::geodesic::RayOutcome;
use crate::core::scene::Scene;
use crate::core::rng::LcgRng;
use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f};
use crate::math::spectrum::RGBSpectrum;

/// One traced film sample.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PixelSample {
    pub radiance: RGBSpectrum,
    pub alpha: Float,
    pub outcome: RayOutcome,
}

pub trait Integrator: Sync {
    /// `pixel` holds integer pixel coordinates; the integrator chooses the
    /// sub-pixel position.
    fn trace_ray_forward(&self, scene: &Scene, sensor: &dyn Sensor, pixel: Vector2f, rng: &mut LcgRng) -> PixelSample;
    fn samples_per_pixel(&self) -> u32;
}
