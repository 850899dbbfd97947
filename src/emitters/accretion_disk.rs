// Copyright @yucwang 2026

use crate::core::geodesic_integrator::DiskZone;
use crate::core::kerr::BlackHole;
use crate::core::radiance::{doppler_factor, smoothstep, RadianceSample, MAX_SPEED};
use crate::math::blackbody::blackbody_to_rgb;
use crate::math::constants::{Float, Vector3f, PI};

/// Temperature ceiling of the thin-disk profile, Kelvin.
pub const MAX_DISK_TEMPERATURE: Float = 50_000.0;
pub const MAX_DISK_INTENSITY: Float = 25.0;

// Visually tuned, non-physical calibration constants. They are not derived
// from Novikov-Thorne and must not be changed without re-approving the look.
/// Extra brightness of lensed (second and later) disk images.
pub const LENSED_IMAGE_BOOST: Float = 1.6;
/// Amplitude and e-folding rate of the glow at the disk's inner edge.
pub const INNER_EDGE_GLOW: Float = 2.0;
pub const INNER_EDGE_FALLOFF: Float = 2.0;
/// Fraction of the outer radius where the disk starts fading out.
pub const OUTER_FADE_START: Float = 0.8;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DiskSettings {
    /// Defaults to the ISCO of the disk's rotation sense when unset.
    pub inner_radius: Option<Float>,
    pub outer_radius: Float,
    /// T0 of the temperature profile, Kelvin.
    pub temperature_scale: Float,
    /// Temperature at the profile maximum, Kelvin. Overrides
    /// `temperature_scale` when set.
    pub peak_temperature: Option<Float>,
    pub half_thickness: Float,
    /// Absorption coefficient k of the optical depth 1 − exp(−k·path).
    pub opacity: Float,
    pub brightness: Float,
    /// Also shift the colour temperature and the intensity by the
    /// gravitational redshift of the emitter, not only by the Doppler factor.
    pub gravitational_shift: bool,
}

impl Default for DiskSettings {
    fn default() -> Self {
        Self {
            inner_radius: None,
            outer_radius: 20.0,
            temperature_scale: 1.0e5,
            peak_temperature: None,
            half_thickness: 0.15,
            opacity: 2.0,
            brightness: 1.0,
            gravitational_shift: false,
        }
    }
}

/// Where a march segment passes through the disk slab.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DiskHit {
    pub point: Vector3f,
    /// Boyer-Lindquist radius of `point`.
    pub radius: Float,
    pub phi: Float,
    /// Length of the segment inside the slab.
    pub path_length: Float,
    /// The segment crossed the midplane (z changed sign).
    pub crossed_midplane: bool,
}

/// Thin equatorial disk rotating in +φ.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AccretionDisk {
    settings: DiskSettings,
}

impl AccretionDisk {
    pub fn new(settings: DiskSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DiskSettings {
        &self.settings
    }

    /// ISCO for orbits co-rotating with the disk. A disk around a hole with
    /// negative spin orbits retrograde.
    pub fn isco(&self, black_hole: &BlackHole) -> Float {
        if black_hole.spin() >= 0.0 {
            black_hole.isco_radius()
        } else {
            black_hole.isco_radius_retrograde()
        }
    }

    pub fn inner_radius(&self, black_hole: &BlackHole) -> Float {
        self.settings.inner_radius.unwrap_or_else(|| self.isco(black_hole))
    }

    pub fn outer_radius(&self) -> Float {
        self.settings.outer_radius
    }

    pub fn zone(&self, black_hole: &BlackHole) -> DiskZone {
        DiskZone {
            inner_radius: self.inner_radius(black_hole),
            outer_radius: self.settings.outer_radius,
            half_thickness: self.settings.half_thickness,
        }
    }

    fn profile(&self, black_hole: &BlackHole, r: Float) -> Float {
        let isco = self.isco(black_hole);
        if r <= isco {
            return 0.0;
        }
        let f = 1.0 - (isco / r).sqrt();
        (black_hole.mass() / (r * r * r)).powf(0.25) * f.powf(0.25)
    }

    /// T0 in effect. A configured peak temperature T_peak gives
    /// T0 = T_peak / ((M/r_p³)^¼ (1 − √(r_isco/r_p))^¼) at the peak radius r_p.
    pub fn temperature_scale(&self, black_hole: &BlackHole) -> Float {
        match self.settings.peak_temperature {
            Some(peak_temperature) => {
                let peak = self.profile(black_hole, self.peak_radius(black_hole));
                if peak > 0.0 { peak_temperature / peak } else { 0.0 }
            }
            None => self.settings.temperature_scale,
        }
    }

    /// Novikov-Thorne T(r) = T0 (M/r³)^¼ (1 − √(r_isco/r))^¼, zero inside
    /// the ISCO and capped at `MAX_DISK_TEMPERATURE`.
    pub fn temperature(&self, black_hole: &BlackHole, r: Float) -> Float {
        (self.temperature_scale(black_hole) * self.profile(black_hole, r)).min(MAX_DISK_TEMPERATURE)
    }

    /// Radius of the temperature maximum, r_isco · 49/36.
    pub fn peak_radius(&self, black_hole: &BlackHole) -> Float {
        self.isco(black_hole) * 49.0 / 36.0
    }

    /// (T0/T_peak)⁴, so that (T/T0)⁴ times the gain peaks at 1.
    pub fn intensity_gain(&self, black_hole: &BlackHole) -> Float {
        let peak = self.profile(black_hole, self.peak_radius(black_hole));
        if peak > 0.0 { peak.powi(-4) } else { 0.0 }
    }

    /// Ω = √M / (r^1.5 + a√M)
    pub fn angular_velocity(&self, black_hole: &BlackHole, r: Float) -> Float {
        let sqrt_m = black_hole.mass().sqrt();
        sqrt_m / (r.powf(1.5) + black_hole.spin() * sqrt_m)
    }

    /// Orbital speed measured by the locally non-rotating observer,
    /// v = (Ω − ω) A sinθ / (Σ √Δ). Signed: positive means +φ.
    pub fn orbital_velocity(&self, black_hole: &BlackHole, r: Float) -> Float {
        if r <= black_hole.event_horizon() {
            return 0.0;
        }
        let theta = 0.5 * PI;
        let omega = self.angular_velocity(black_hole, r);
        let drag = black_hole.frame_dragging_omega(r, theta);
        let sigma = black_hole.sigma(r, theta);
        let sqrt_delta = black_hole.delta(r).max(1e-12).sqrt();
        let v = (omega - drag) * black_hole.big_a(r, theta) / (sigma * sqrt_delta);
        v.clamp(-MAX_SPEED, MAX_SPEED)
    }

    /// Doppler factor of the disk element at `r` seen under `view_angle`
    /// between its velocity and the line of sight.
    pub fn doppler_factor(&self, black_hole: &BlackHole, r: Float, view_angle: Float) -> Float {
        let v = self.orbital_velocity(black_hole, r);
        doppler_factor(v.abs(), view_angle.cos())
    }

    /// Intersects a march segment with the slab |z| < half_thickness.
    pub fn intersect_segment(&self, black_hole: &BlackHole, prev: &Vector3f, cur: &Vector3f) -> Option<DiskHit> {
        let half = self.settings.half_thickness;
        let (z0, z1) = (prev.z, cur.z);
        let (t_enter, t_exit) = if (z1 - z0).abs() < 1e-12 {
            if z0.abs() >= half {
                return None;
            }
            (0.0, 1.0)
        } else {
            let ta = (-half - z0) / (z1 - z0);
            let tb = (half - z0) / (z1 - z0);
            (ta.min(tb).max(0.0), ta.max(tb).min(1.0))
        };
        if t_enter >= t_exit {
            return None;
        }

        let crossed_midplane = z0 * z1 < 0.0;
        let t_hit = if crossed_midplane {
            z0 / (z0 - z1)
        } else {
            0.5 * (t_enter + t_exit)
        };
        let point = prev + (cur - prev) * t_hit;
        let radius = black_hole.cartesian_to_boyer_lindquist(&point).x;
        if radius < self.inner_radius(black_hole) || radius > self.settings.outer_radius {
            return None;
        }

        Some(DiskHit {
            point,
            radius,
            phi: point.y.atan2(point.x),
            path_length: (t_exit - t_enter) * (cur - prev).norm(),
            crossed_midplane,
        })
    }

    /// Emission of a disk hit. `toward_observer` is the unit direction
    /// opposite to the marching direction.
    pub fn radiance(&self, black_hole: &BlackHole, hit: &DiskHit, toward_observer: &Vector3f) -> RadianceSample {
        let r = hit.radius;
        let temperature = self.temperature(black_hole, r);
        let alpha = 1.0 - (-self.settings.opacity * hit.path_length).exp();
        if temperature <= 0.0 {
            return RadianceSample { alpha: 0.0, ..RadianceSample::default() };
        }

        let v = self.orbital_velocity(black_hole, r);
        let velocity_dir = Vector3f::new(-hit.phi.sin(), hit.phi.cos(), 0.0) * v.signum();
        let g = doppler_factor(v.abs(), velocity_dir.dot(toward_observer));
        let z = black_hole.gravitational_redshift(r, 0.5 * PI);
        let shift = if self.settings.gravitational_shift { g * z } else { g };

        let inner = self.inner_radius(black_hole);
        let t_ratio = temperature / self.temperature_scale(black_hole);
        let edge = 1.0 + INNER_EDGE_GLOW * (-(r - inner) * INNER_EDGE_FALLOFF).exp();
        let fade = 1.0 - smoothstep(OUTER_FADE_START * self.settings.outer_radius, self.settings.outer_radius, r);
        let intensity = (t_ratio.powi(4) * self.intensity_gain(black_hole)
            * shift.powi(4)
            * (inner / r).sqrt()
            * edge
            * fade
            * self.settings.brightness)
            .min(MAX_DISK_INTENSITY);

        RadianceSample {
            temperature,
            orbital_velocity: v,
            doppler_factor: g,
            gravitational_redshift: z,
            emitted_color: blackbody_to_rgb(temperature * shift) * intensity,
            alpha,
        }
    }
}
