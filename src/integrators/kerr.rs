// Copyright @yucwang 2026

use crate::core::geodesic::{GeodesicState, RayOutcome};
use crate::core::geodesic_integrator::{GeodesicIntegrator, IntegratorSettings};
use crate::core::integrator::{Integrator, PixelSample};
use crate::core::rng::LcgRng;
use crate::core::scene::{FeatureFlags, Scene};
use crate::core::sensor::Sensor;
use crate::emitters::accretion_disk::LENSED_IMAGE_BOOST;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Accumulated disk opacity never reaches 1 so lensed images behind the
/// first crossing stay faintly visible.
pub const MAX_DISK_ALPHA: Float = 0.99;
/// Half width of the debug rings, in units of M.
pub const DEBUG_RING_WIDTH: Float = 0.12;
const DEBUG_OVERLAY_WEIGHT: Float = 0.8;

fn debug_isco_color() -> RGBSpectrum {
    RGBSpectrum::new(0.0, 1.0, 0.0)
}

fn debug_photon_sphere_color() -> RGBSpectrum {
    RGBSpectrum::new(0.0, 1.0, 1.0)
}

fn debug_max_steps_color() -> RGBSpectrum {
    RGBSpectrum::new(1.0, 0.0, 1.0)
}

/// Per-ray running sums. Reset at ray start and folded into the final
/// composite once the geodesic terminates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Accumulators {
    pub disk_color: RGBSpectrum,
    pub disk_alpha: Float,
    pub jet_color: RGBSpectrum,
    pub ergo_color: RGBSpectrum,
    pub min_radius: Float,
    /// Signed sum of Δφ over all steps.
    pub total_phi_change: Float,
    pub disk_crossings: u32,
    pub debug_overlay: Option<RGBSpectrum>,
}

impl Accumulators {
    pub fn new(start_radius: Float) -> Self {
        Self {
            disk_color: RGBSpectrum::default(),
            disk_alpha: 0.0,
            jet_color: RGBSpectrum::default(),
            ergo_color: RGBSpectrum::default(),
            min_radius: start_radius,
            total_phi_change: 0.0,
            disk_crossings: 0,
            debug_overlay: None,
        }
    }
}

/// Result of tracing one observer ray, with the diagnostics used by
/// `render_pixel` and by higher-level effects.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RayTrace {
    pub color: RGBSpectrum,
    pub alpha: Float,
    pub outcome: RayOutcome,
    pub min_radius: Float,
    pub total_phi_change: Float,
    pub steps: u32,
    pub disk_crossings: u32,
}

/// Drives a ray through curved spacetime and shades it: seed the geodesic,
/// step it while sampling the disk, jets and ergosphere, then composite sky,
/// photon ring and disk.
pub struct KerrIntegrator {
    settings: IntegratorSettings,
    samples_per_pixel: u32,
}

impl KerrIntegrator {
    pub fn new(settings: IntegratorSettings, samples_per_pixel: u32) -> Self {
        Self { settings, samples_per_pixel }
    }

    pub fn settings(&self) -> &IntegratorSettings {
        &self.settings
    }

    pub fn trace(&self, scene: &Scene, ray: &Ray3f) -> RayTrace {
        let black_hole = scene.black_hole();
        let stepper = GeodesicIntegrator::new(black_hole, self.settings)
            .with_refinement(scene.refinement_zones());

        let mut state = GeodesicState::from_observer_ray(ray, black_hole);
        let mut acc = Accumulators::new(state.r);
        let integration = stepper.integrate(&mut state, |prev, cur, _| {
            self.sample_step(scene, &mut acc, prev, cur);
        });

        let (color, alpha) = self.composite(scene, &acc, &integration.outcome);
        RayTrace {
            color,
            alpha,
            outcome: integration.outcome,
            min_radius: acc.min_radius,
            total_phi_change: acc.total_phi_change,
            steps: integration.steps,
            disk_crossings: acc.disk_crossings,
        }
    }

    fn sample_step(&self, scene: &Scene, acc: &mut Accumulators, prev: &GeodesicState, cur: &GeodesicState) {
        let black_hole = scene.black_hole();
        acc.min_radius = acc.min_radius.min(cur.r);
        acc.total_phi_change += cur.phi - prev.phi;

        let p0 = prev.cartesian_position(black_hole);
        let p1 = cur.cartesian_position(black_hole);
        let segment = p1 - p0;
        let length = segment.norm();
        if length <= 0.0 || !length.is_finite() {
            return;
        }
        let toward_observer: Vector3f = -segment / length;

        if scene.is_enabled(FeatureFlags::ERGOSPHERE) {
            acc.ergo_color += scene.ergosphere().emission(black_hole, cur.r, cur.theta, length);
        }

        if scene.is_enabled(FeatureFlags::JETS) {
            acc.jet_color += scene.jet().emission(black_hole, &p1, &toward_observer, length, scene.time());
        }

        if scene.is_enabled(FeatureFlags::DISK) && acc.disk_alpha < MAX_DISK_ALPHA {
            if let Some(hit) = scene.disk().intersect_segment(black_hole, &p0, &p1) {
                if hit.crossed_midplane {
                    acc.disk_crossings += 1;
                }
                let sample = scene.disk().radiance(black_hole, &hit, &toward_observer);
                let boost = if acc.disk_crossings > 1 { LENSED_IMAGE_BOOST } else { 1.0 };
                let alpha_local = (sample.alpha * boost).min(1.0);
                let weight = (1.0 - acc.disk_alpha) * alpha_local;
                acc.disk_color += sample.emitted_color * weight;
                acc.disk_alpha = (acc.disk_alpha + weight).min(MAX_DISK_ALPHA);
            }
        }

        if scene.is_enabled(FeatureFlags::DEBUG) && acc.debug_overlay.is_none() && p0.z * p1.z < 0.0 {
            let t = p0.z / (p0.z - p1.z);
            let crossing = p0 + segment * t;
            let r = black_hole.cartesian_to_boyer_lindquist(&crossing).x;
            if (r - scene.disk().isco(black_hole)).abs() < DEBUG_RING_WIDTH {
                acc.debug_overlay = Some(debug_isco_color());
            } else if (r - black_hole.photon_sphere_radius()).abs() < DEBUG_RING_WIDTH {
                acc.debug_overlay = Some(debug_photon_sphere_color());
            }
        }
    }

    fn composite(&self, scene: &Scene, acc: &Accumulators, outcome: &RayOutcome) -> (RGBSpectrum, Float) {
        let black_hole = scene.black_hole();
        let debug = scene.is_enabled(FeatureFlags::DEBUG);

        let (background, background_alpha) = match outcome {
            RayOutcome::Escaped { final_direction } => match scene.sky() {
                Some(sky) => (sky.eval_direction(final_direction), 1.0),
                None => (RGBSpectrum::default(), 0.0),
            },
            RayOutcome::MaxStepsReached if debug => (debug_max_steps_color(), 1.0),
            _ => (RGBSpectrum::default(), 1.0),
        };

        let mut rest = background + acc.ergo_color + acc.jet_color;
        if scene.is_enabled(FeatureFlags::PHOTON_RING) && *outcome != RayOutcome::Captured {
            rest += scene.photon_ring().contribution(black_hole, acc.min_radius, acc.total_phi_change);
        }

        let mut color = acc.disk_color + rest * (1.0 - acc.disk_alpha);
        if let Some(overlay) = acc.debug_overlay {
            color = color * (1.0 - DEBUG_OVERLAY_WEIGHT) + overlay * DEBUG_OVERLAY_WEIGHT;
        }
        if color.has_nan() {
            color = RGBSpectrum::default();
        }

        let alpha = acc.disk_alpha + (1.0 - acc.disk_alpha) * background_alpha;
        (color, alpha)
    }
}

impl Integrator for KerrIntegrator {
    fn trace_ray_forward(&self, scene: &Scene, sensor: &dyn Sensor, pixel: Vector2f, rng: &mut LcgRng) -> PixelSample {
        let (width, height) = {
            let bmp = sensor.bitmap();
            (bmp.width(), bmp.height())
        };
        if width == 0 || height == 0 {
            return PixelSample { radiance: RGBSpectrum::default(), alpha: 0.0, outcome: RayOutcome::Captured };
        }

        // a single sample goes through the pixel center
        let (jx, jy) = if self.samples_per_pixel > 1 {
            (rng.next_float(), rng.next_float())
        } else {
            (0.5, 0.5)
        };
        let u = (pixel.x + jx) / (width as Float);
        let v = (pixel.y + jy) / (height as Float);
        let ray = sensor.sample_ray(&Vector2f::new(u, v));

        let trace = self.trace(scene, &ray);
        PixelSample { radiance: trace.color, alpha: trace.alpha, outcome: trace.outcome }
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }
}
