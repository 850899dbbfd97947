// Copyright @yucwang 2026

use crate::core::computation_node::{ComputationNode, generate_node_id};
use crate::core::emitter::Emitter;
use crate::math::blackbody::blackbody_to_rgb;
use crate::math::constants::{Float, Vector3f, PI};
use crate::math::spectrum::RGBSpectrum;

const LAYER_BASE_SCALE: Float = 40.0;
const LAYER_SCALE_STEP: Float = 25.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StarfieldSettings {
    /// Fraction of sky cells holding a star.
    pub density: Float,
    pub brightness: Float,
    pub layers: u32,
    pub seed: u64,
    /// Intensity of the faint band along the galactic plane.
    pub band_intensity: Float,
}

impl Default for StarfieldSettings {
    fn default() -> Self {
        Self {
            density: 0.02,
            brightness: 1.0,
            layers: 3,
            seed: 7,
            band_intensity: 0.02,
        }
    }
}

/// Procedural sky. Stars live in cells of an (φ, θ) grid, one hash per cell
/// decides presence, position, brightness and colour temperature, so a
/// direction always evaluates to the same radiance.
pub struct Starfield {
    id: String,
    settings: StarfieldSettings,
    band_normal: Vector3f,
}

fn mix(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}

fn unit(h: u64) -> Float {
    (h >> 11) as Float / (1u64 << 53) as Float
}

impl Starfield {
    pub fn new(settings: StarfieldSettings) -> Self {
        Self::with_id(settings, None)
    }

    pub fn with_id(settings: StarfieldSettings, id: Option<String>) -> Self {
        Self {
            id: id.unwrap_or_else(|| generate_node_id("Starfield")),
            settings,
            band_normal: Vector3f::new(0.3, -0.5, 0.8).normalize(),
        }
    }

    fn cell_hash(&self, layer: u32, i: i64, j: i64) -> u64 {
        let mut h = mix(self.settings.seed ^ 0x9e3779b97f4a7c15);
        h = mix(h ^ layer as u64);
        h = mix(h ^ i as u64);
        mix(h ^ j as u64)
    }

    fn stars(&self, theta: Float, phi: Float) -> RGBSpectrum {
        let mut total = RGBSpectrum::default();
        let sin_theta = theta.sin().max(1e-3);
        for layer in 0..self.settings.layers {
            let scale = LAYER_BASE_SCALE + LAYER_SCALE_STEP * layer as Float;
            let (u, v) = (phi * scale, theta * scale);
            let (i, j) = (u.floor() as i64, v.floor() as i64);
            let h = self.cell_hash(layer, i, j);
            if unit(h) >= self.settings.density {
                continue;
            }

            let h1 = mix(h);
            let h2 = mix(h1);
            let h3 = mix(h2);
            let cx = i as Float + 0.15 + 0.7 * unit(h1);
            let cy = j as Float + 0.15 + 0.7 * unit(h2);
            // azimuthal cell width shrinks toward the poles
            let du = (u - cx) * sin_theta;
            let dv = v - cy;
            let glow = (-(du * du + dv * dv) * 40.0).exp();
            if glow < 1e-4 {
                continue;
            }

            let magnitude = unit(h3);
            let brightness = self.settings.brightness * magnitude.powf(3.0) * (1.0 - 0.2 * layer as Float);
            let temperature = 2500.0 + 25000.0 * unit(mix(h3));
            total += blackbody_to_rgb(temperature) * (brightness * glow);
        }
        total
    }
}

impl ComputationNode for Starfield {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_string(&self) -> String {
        format!("Starfield(density={}, layers={})", self.settings.density, self.settings.layers)
    }
}

impl Emitter for Starfield {
    fn eval_direction(&self, direction: &Vector3f) -> RGBSpectrum {
        let norm = direction.norm();
        if norm <= 0.0 || !norm.is_finite() {
            return RGBSpectrum::default();
        }
        let d = direction / norm;
        let theta = d.z.clamp(-1.0, 1.0).acos();
        let phi = d.y.atan2(d.x) + PI;

        let band_height = d.dot(&self.band_normal);
        let band = (-band_height * band_height * 8.0).exp() * self.settings.band_intensity;
        self.stars(theta, phi) + RGBSpectrum::new(1.0, 0.9, 0.8) * band
    }
}
