// Copyright @yucwang 2026

use crate::core::geodesic::{ConservedQuantities, GeodesicState, RayOutcome, POLE_SIN2_CUTOFF};
use crate::core::kerr::BlackHole;
use crate::math::constants::{Float, Vector3f, Vector5f};
use crate::math::frame::Frame;

/// Upper bound on steps per ray regardless of the configured budget.
pub const ABSOLUTE_MAX_STEPS: u32 = 4096;
/// Rays closer than this multiple of the event horizon are captured.
pub const HORIZON_CAPTURE_FACTOR: Float = 1.001;
pub const MIN_STEP: Float = 1e-4;

const DELTA_GUARD: Float = 1e-9;
const DISK_MIN_STEP_SCALE: Float = 0.2;
const JET_STEP_SCALE: Float = 0.7;
/// Distance from the spin axis, in M, below which rays with L_z ≠ 0 take
/// proportionally shorter steps.
const AXIS_STEP_DISTANCE: Float = 4.0;
const AXIS_MIN_STEP_SCALE: Float = 1e-4;
const AXIAL_LZ_EPSILON: Float = 1e-12;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IntegratorSettings {
    pub max_steps: u32,
    /// Base spatial step in units of M.
    pub step_size: Float,
    pub escape_radius: Float,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            max_steps: 1000,
            step_size: 0.5,
            escape_radius: 100.0,
        }
    }
}

impl IntegratorSettings {
    pub fn step_limit(&self) -> u32 {
        self.max_steps.min(ABSOLUTE_MAX_STEPS)
    }
}

/// Equatorial slab where the accretion disk is sampled.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DiskZone {
    pub inner_radius: Float,
    pub outer_radius: Float,
    pub half_thickness: Float,
}

impl DiskZone {
    /// 1 away from the disk, falling linearly to 0.2 on the midplane.
    pub fn step_scale(&self, cylindrical_radius: Float, height: Float) -> Float {
        if cylindrical_radius < 0.9 * self.inner_radius || cylindrical_radius > 1.1 * self.outer_radius {
            return 1.0;
        }
        let band = (4.0 * self.half_thickness).max(1.0);
        let proximity = height.abs() / band;
        if proximity >= 1.0 {
            1.0
        } else {
            DISK_MIN_STEP_SCALE + (1.0 - DISK_MIN_STEP_SCALE) * proximity
        }
    }
}

/// Widening cone around the spin axis where jets are sampled.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct JetZone {
    pub min_height: Float,
    pub base_radius: Float,
    pub opening_tan: Float,
}

impl JetZone {
    pub fn radius_at(&self, height: Float) -> Float {
        self.base_radius + height.abs() * self.opening_tan
    }

    pub fn contains(&self, cylindrical_radius: Float, height: Float) -> bool {
        height.abs() >= self.min_height && cylindrical_radius <= self.radius_at(height)
    }
}

/// Feature regions that get extra step resolution.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct RefinementZones {
    pub disk: Option<DiskZone>,
    pub jet: Option<JetZone>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Integration {
    pub outcome: RayOutcome,
    pub steps: u32,
}

/// Adaptive RK4 stepper for Kerr null geodesics.
///
/// State machine: a ray stays `Active` until one of the terminal checks fires
/// at the top of the loop; the terminal value is produced only once the loop
/// exits.
pub struct GeodesicIntegrator<'a> {
    black_hole: &'a BlackHole,
    settings: IntegratorSettings,
    zones: RefinementZones,
}

impl<'a> GeodesicIntegrator<'a> {
    pub fn new(black_hole: &'a BlackHole, settings: IntegratorSettings) -> Self {
        Self {
            black_hole,
            settings,
            zones: RefinementZones::default(),
        }
    }

    pub fn with_refinement(mut self, zones: RefinementZones) -> Self {
        self.zones = zones;
        self
    }

    pub fn settings(&self) -> &IntegratorSettings {
        &self.settings
    }

    /// Mino-time derivatives of (r, θ, φ, p_r, p_θ).
    pub fn derivatives(&self, y: &Vector5f, conserved: &ConservedQuantities) -> Vector5f {
        let bh = self.black_hole;
        let a = bh.spin();
        let (r, theta, p_r, p_theta) = (y[0], y[1], y[3], y[4]);
        let energy = conserved.energy;
        let lz = conserved.angular_momentum;

        let (sin_theta, cos_theta) = theta.sin_cos();
        let sin2 = (sin_theta * sin_theta).max(POLE_SIN2_CUTOFF);
        let sigma = bh.sigma(r, theta).max(1e-12);
        let delta = guard_delta(bh.delta(r));

        let dr = p_r * sigma;
        let dtheta = p_theta * sigma;
        let p = (r * r + a * a) * energy - a * lz;
        let dphi = lz / sin2 - a * energy + a * p / delta;

        let dsigma = 2.0 * r * dr - 2.0 * a * a * cos_theta * sin_theta * dtheta;
        let dp_r = (0.5 * conserved.radial_potential_derivative(bh, r) - p_r * dsigma) / sigma;
        let dp_theta = (0.5 * conserved.polar_potential_derivative(bh, theta) - p_theta * dsigma) / sigma;

        Vector5f::new(dr, dtheta, dphi, dp_r, dp_theta)
    }

    /// One RK4 step covering roughly `h` of coordinate distance.
    pub fn step(&self, state: &mut GeodesicState, h: Float) {
        let conserved = state.conserved;
        let sigma = self.black_hole.sigma(state.r, state.theta).max(1e-12);
        let dl = h / sigma;

        let y = state.phase_vector();
        let k1 = self.derivatives(&y, &conserved);
        let k2 = self.derivatives(&(y + k1 * (0.5 * dl)), &conserved);
        let k3 = self.derivatives(&(y + k2 * (0.5 * dl)), &conserved);
        let k4 = self.derivatives(&(y + k3 * dl), &conserved);
        let next = y + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dl / 6.0);

        state.set_phase_vector(&next);
        state.wrap_polar_angle();
        self.reflect_at_turning_points(state);
    }

    /// Flips p_r (p_θ) when the state sits in a forbidden region of R (Θ)
    /// and the momentum still points deeper into it.
    pub fn reflect_at_turning_points(&self, state: &mut GeodesicState) {
        let bh = self.black_hole;
        let c = state.conserved;
        if c.radial_potential(bh, state.r) < 0.0
            && state.p_r * c.radial_potential_derivative(bh, state.r) < 0.0 {
            state.p_r = -state.p_r;
        }
        if c.polar_potential(bh, state.theta) < 0.0
            && state.p_theta * c.polar_potential_derivative(bh, state.theta) < 0.0 {
            state.p_theta = -state.p_theta;
        }
    }

    pub fn adaptive_step_size(&self, state: &GeodesicState) -> Float {
        let bh = self.black_hole;
        let r_ps = bh.photon_sphere_radius();
        let distance = state.r - bh.event_horizon();
        let mut scale = (distance / r_ps).clamp(0.01, 1.0);
        if (state.r - r_ps).abs() < 0.5 * r_ps {
            scale *= 0.5;
        }

        // φ̇ ∝ L_z / sin²θ, so the step shrinks with the distance to the axis
        let cylindrical = state.r * state.theta.sin().abs();
        if state.conserved.angular_momentum.abs() > AXIAL_LZ_EPSILON {
            scale *= (cylindrical / AXIS_STEP_DISTANCE).clamp(AXIS_MIN_STEP_SCALE, 1.0);
        }

        if self.zones.disk.is_some() || self.zones.jet.is_some() {
            let height = state.height();
            if let Some(disk) = &self.zones.disk {
                scale *= disk.step_scale(cylindrical, height);
            }
            if let Some(jet) = &self.zones.jet {
                if jet.contains(cylindrical, height) {
                    scale *= JET_STEP_SCALE;
                }
            }
        }

        (self.settings.step_size * scale).max(MIN_STEP)
    }

    /// Terminal checks, evaluated before each step.
    pub fn classify(&self, state: &GeodesicState, steps: u32) -> RayOutcome {
        if state.has_nan() || state.r < 0.0 {
            return RayOutcome::Captured;
        }
        if state.r < self.black_hole.event_horizon() * HORIZON_CAPTURE_FACTOR {
            return RayOutcome::Captured;
        }
        // inbound rays seeded beyond the escape sphere are still traced
        if state.r > self.settings.escape_radius && state.p_r >= 0.0 {
            return RayOutcome::Escaped { final_direction: self.local_direction(state) };
        }
        if steps >= self.settings.step_limit() {
            return RayOutcome::MaxStepsReached;
        }
        RayOutcome::Active
    }

    /// Cartesian unit direction of travel rebuilt from the velocity triple on
    /// the local (e_r, e_θ, e_φ) basis.
    pub fn local_direction(&self, state: &GeodesicState) -> Vector3f {
        let d = self.derivatives(&state.phase_vector(), &state.conserved);
        let sin_theta = state.theta.sin();
        let local = Vector3f::new(d[0], state.r * d[1], state.r * sin_theta * d[2]);
        let frame = Frame::spherical(state.theta, state.phi);
        let world = frame.from_local(local);
        let norm = world.norm();
        if norm > 0.0 && norm.is_finite() {
            world / norm
        } else {
            frame.x
        }
    }

    /// Runs the ray to a terminal outcome. `on_step` sees every accepted
    /// (previous, current, step length) triple.
    pub fn integrate<F>(&self, state: &mut GeodesicState, mut on_step: F) -> Integration
    where
        F: FnMut(&GeodesicState, &GeodesicState, Float),
    {
        let mut steps: u32 = 0;
        let outcome = loop {
            let outcome = self.classify(state, steps);
            if outcome.is_terminal() {
                break outcome;
            }

            let previous = *state;
            let h = self.adaptive_step_size(state);
            self.step(state, h);
            steps += 1;

            if !state.has_nan() {
                on_step(&previous, state, h);
            }
        };

        Integration { outcome, steps }
    }
}

fn guard_delta(delta: Float) -> Float {
    if delta.abs() < DELTA_GUARD {
        if delta < 0.0 { -DELTA_GUARD } else { DELTA_GUARD }
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::PI;
    use crate::math::ray::Ray3f;

    fn settings(max_steps: u32, escape_radius: Float) -> IntegratorSettings {
        IntegratorSettings { max_steps, step_size: 0.5, escape_radius }
    }

    fn run(bh: &BlackHole, settings: IntegratorSettings, ray: Ray3f) -> (GeodesicState, Integration, Float) {
        let integrator = GeodesicIntegrator::new(bh, settings);
        let mut state = GeodesicState::from_observer_ray(&ray, bh);
        let mut min_radius = state.r;
        let result = integrator.integrate(&mut state, |_, cur, _| {
            min_radius = min_radius.min(cur.r);
        });
        (state, result, min_radius)
    }

    fn angle_between(a: &Vector3f, b: &Vector3f) -> Float {
        a.normalize().dot(&b.normalize()).clamp(-1.0, 1.0).acos()
    }

    #[test]
    fn test_head_on_ray_is_captured() {
        for spin in [0.0, 0.9] {
            let bh = BlackHole::new(1.0, spin).unwrap();
            let origin = Vector3f::new(50.0, 0.0, 0.5);
            let (state, result, _) = run(&bh, settings(1000, 100.0), Ray3f::new(origin, -origin));
            assert_eq!(result.outcome, RayOutcome::Captured, "spin {}", spin);
            assert!(state.r < bh.event_horizon() * HORIZON_CAPTURE_FACTOR);
            assert!(result.steps < 1000);
        }
    }

    #[test]
    fn test_subcritical_impact_parameter_is_captured() {
        // critical impact parameter is 3√3 M ≈ 5.196 M
        let bh = BlackHole::new(1.0, 0.0).unwrap();
        let ray = Ray3f::new(Vector3f::new(60.0, 4.5, 0.0), Vector3f::new(-1.0, 0.0, 0.0));
        let (_, result, _) = run(&bh, settings(2000, 100.0), ray);
        assert_eq!(result.outcome, RayOutcome::Captured);

        let ray = Ray3f::new(Vector3f::new(60.0, 7.0, 0.0), Vector3f::new(-1.0, 0.0, 0.0));
        let (_, result, _) = run(&bh, settings(2000, 100.0), ray);
        assert!(matches!(result.outcome, RayOutcome::Escaped { .. }));
    }

    #[test]
    fn test_weak_field_escape_preserves_direction() {
        let bh = BlackHole::new(1.0, 0.5).unwrap();
        let dir = Vector3f::new(-1.0, 0.0, 0.0);
        let mut deviations = Vec::new();
        for b in [40.0, 80.0] {
            let ray = Ray3f::new(Vector3f::new(50.0, b, 2.0), dir);
            let (_, result, _) = run(&bh, settings(2000, 200.0), ray);
            match result.outcome {
                RayOutcome::Escaped { final_direction } => {
                    assert!((final_direction.norm() - 1.0).abs() < 1e-9);
                    // bent toward the hole
                    assert!(final_direction.y < 0.0);
                    deviations.push(angle_between(&final_direction, &dir));
                }
                other => panic!("expected escape for b = {}, got {:?}", b, other),
            }
        }
        assert!(deviations[0] < 0.12);
        assert!(deviations[1] < deviations[0]);
        assert!(deviations[1] < 0.06);
    }

    #[test]
    fn test_periapsis_turning_point() {
        let bh = BlackHole::new(1.0, 0.0).unwrap();
        let b: Float = 10.0;
        // periapsis solves r³ − b² r + 2 M b² = 0, largest root
        let (mut lo, mut hi) = (5.0, 10.0);
        for _ in 0..100 {
            let mid = 0.5 * (lo + hi);
            if mid * mid * mid - b * b * mid + 2.0 * b * b < 0.0 { lo = mid; } else { hi = mid; }
        }
        let periapsis = 0.5 * (lo + hi);

        let ray = Ray3f::new(Vector3f::new(80.0, b, 0.0), Vector3f::new(-1.0, 0.0, 0.0));
        let (state, result, min_radius) = run(&bh, settings(2000, 100.0), ray);
        assert!(matches!(result.outcome, RayOutcome::Escaped { .. }));
        assert!(state.p_r > 0.0);
        assert!((min_radius - periapsis).abs() / periapsis < 0.01, "{} vs {}", min_radius, periapsis);
    }

    #[test]
    fn test_null_constraint_is_approximately_conserved() {
        let bh = BlackHole::new(1.0, 0.8).unwrap();
        let ray = Ray3f::new(Vector3f::new(40.0, 9.0, 6.0), Vector3f::new(-1.0, 0.05, -0.1));
        let integrator = GeodesicIntegrator::new(&bh, settings(60, 100.0));
        let mut state = GeodesicState::from_observer_ray(&ray, &bh);
        integrator.integrate(&mut state, |_, _, _| {});
        let sigma = bh.sigma(state.r, state.theta);
        let radial = state.conserved.radial_potential(&bh, state.r);
        let residual = ((state.p_r * sigma).powi(2) - radial).abs();
        assert!(residual < 1e-3 * radial.abs().max(1.0), "residual {}", residual);
    }

    #[test]
    fn test_max_steps_and_hard_cap() {
        let bh = BlackHole::new(1.0, 0.3).unwrap();
        let ray = Ray3f::new(Vector3f::new(50.0, 20.0, 0.0), Vector3f::new(-1.0, 0.0, 0.0));
        let (_, result, _) = run(&bh, settings(5, 100.0), ray);
        assert_eq!(result.outcome, RayOutcome::MaxStepsReached);
        assert_eq!(result.steps, 5);

        let tiny = IntegratorSettings { max_steps: u32::MAX, step_size: 1e-9, escape_radius: 100.0 };
        let (_, result, _) = run(&bh, tiny, ray);
        assert_eq!(result.outcome, RayOutcome::MaxStepsReached);
        assert_eq!(result.steps, ABSOLUTE_MAX_STEPS);
    }

    #[test]
    fn test_degenerate_states_are_captured() {
        let bh = BlackHole::new(1.0, 0.5).unwrap();
        let integrator = GeodesicIntegrator::new(&bh, IntegratorSettings::default());
        let ray = Ray3f::new(Vector3f::new(30.0, 0.0, 0.0), Vector3f::new(-1.0, 0.1, 0.0));
        let mut state = GeodesicState::from_observer_ray(&ray, &bh);

        state.r = Float::NAN;
        assert_eq!(integrator.classify(&state, 0), RayOutcome::Captured);
        state.r = -3.0;
        assert_eq!(integrator.classify(&state, 0), RayOutcome::Captured);
        state.r = 30.0;
        state.p_theta = Float::NAN;
        assert_eq!(integrator.classify(&state, 0), RayOutcome::Captured);
    }

    #[test]
    fn test_integration_is_deterministic() {
        let bh = BlackHole::new(1.0, 0.95).unwrap();
        let ray = Ray3f::new(Vector3f::new(25.0, 6.0, 3.0), Vector3f::new(-1.0, -0.1, -0.05));
        let (a, ra, _) = run(&bh, settings(800, 100.0), ray);
        let (b, rb, _) = run(&bh, settings(800, 100.0), ray);
        assert_eq!(ra, rb);
        assert_eq!(a.phase_vector(), b.phase_vector());
    }

    #[test]
    fn test_adaptive_step_size() {
        let bh = BlackHole::new(1.0, 0.0).unwrap();
        let integrator = GeodesicIntegrator::new(&bh, settings(100, 100.0));
        let ray = Ray3f::new(Vector3f::new(40.0, 0.0, 0.0), Vector3f::new(-1.0, 0.0, 0.0));
        let mut state = GeodesicState::from_observer_ray(&ray, &bh);
        assert_eq!(integrator.adaptive_step_size(&state), 0.5);

        // within half a photon-sphere radius of r = 3M the step is halved
        state.r = 4.0;
        let expected = 0.5 * ((4.0 - 2.0) / 3.0) * 0.5;
        assert!((integrator.adaptive_step_size(&state) - expected).abs() < 1e-12);

        state.r = 2.0001;
        assert!((integrator.adaptive_step_size(&state) - 0.5 * 0.01 * 0.5).abs() < 1e-12);

        let zones = RefinementZones {
            disk: Some(DiskZone { inner_radius: 6.0, outer_radius: 20.0, half_thickness: 0.1 }),
            jet: Some(JetZone { min_height: 3.0, base_radius: 1.0, opening_tan: 0.1 }),
        };
        let refined = GeodesicIntegrator::new(&bh, settings(100, 100.0)).with_refinement(zones);
        state.r = 10.0;
        state.theta = 0.5 * PI;
        assert!((refined.adaptive_step_size(&state) - 0.5 * 0.2).abs() < 1e-9);
        state.r = 30.0;
        state.theta = 0.01;
        assert!((refined.adaptive_step_size(&state) - 0.5 * 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_step_shrinks_near_the_axis_only_with_angular_momentum() {
        let bh = BlackHole::new(1.0, 0.0).unwrap();
        let integrator = GeodesicIntegrator::new(&bh, settings(100, 100.0));
        let conserved = ConservedQuantities { energy: 1.0, angular_momentum: 2.0, carter: 1600.0 };
        let mut state = GeodesicState { r: 40.0, theta: 0.5 * PI, phi: 0.0, p_r: 0.0, p_theta: 0.0, conserved };
        assert_eq!(integrator.adaptive_step_size(&state), 0.5);

        state.theta = 0.05;
        let expected = 0.5 * 40.0 * (0.05 as Float).sin() / AXIS_STEP_DISTANCE;
        assert!((integrator.adaptive_step_size(&state) - expected).abs() < 1e-12);

        state.theta = 1e-9;
        assert_eq!(integrator.adaptive_step_size(&state), MIN_STEP);

        state.conserved.angular_momentum = 0.0;
        assert_eq!(integrator.adaptive_step_size(&state), 0.5);
    }

    /// Final direction and outcome of a ray fired along +x at height 40,
    /// `offset` to the side of the spin axis.
    fn over_the_pole(spin: Float, offset: Float) -> (Vector3f, Integration) {
        let bh = BlackHole::new(1.0, spin).unwrap();
        let ray = Ray3f::new(Vector3f::new(-50.0, offset, 40.0), Vector3f::new(1.0, 0.0, 0.0));
        let (_, result, _) = run(&bh, settings(4096, 100.0), ray);
        match result.outcome {
            RayOutcome::Escaped { final_direction } => (final_direction, result),
            other => panic!("ray at offset {} ended as {:?}", offset, other),
        }
    }

    #[test]
    fn test_ray_passing_over_the_pole() {
        let x = Vector3f::new(1.0, 0.0, 0.0);
        for (spin, tolerance) in [(0.0, 0.01), (0.5, 0.02)] {
            let (on_axis, _) = over_the_pole(spin, 0.0);
            let deviation = angle_between(&on_axis, &x);
            // weak lensing toward the hole, about 4M/b
            assert!(deviation > 0.05 && deviation < 0.2, "spin {}: {}", spin, deviation);
            assert!(on_axis.z < 0.0);

            for offset in [0.05, -0.05, 0.5] {
                let (beside_axis, result) = over_the_pole(spin, offset);
                assert!(result.steps < ABSOLUTE_MAX_STEPS);
                let gap = angle_between(&beside_axis, &on_axis);
                assert!(gap < tolerance, "spin {} offset {}: {}", spin, offset, gap);
            }
        }
    }

    #[test]
    fn test_polar_turning_point() {
        // L_z = -2 and Q = 1600, so Θ vanishes at tan θ = 2/40
        let bh = BlackHole::new(1.0, 0.0).unwrap();
        let ray = Ray3f::new(Vector3f::new(-50.0, 2.0, 40.0), Vector3f::new(1.0, 0.0, 0.0));
        let mut state = GeodesicState::from_observer_ray(&ray, &bh);
        let conserved = state.conserved;
        assert!((conserved.angular_momentum + 2.0).abs() < 1e-9);
        assert!((conserved.carter - 1600.0).abs() < 1e-6);
        assert!(state.p_theta < 0.0);

        let integrator = GeodesicIntegrator::new(&bh, settings(4096, 100.0));
        let mut min_theta = state.theta;
        let mut sign_changes = 0;
        let mut worst_potential: Float = 0.0;
        let result = integrator.integrate(&mut state, |prev, cur, _| {
            assert!(cur.theta > 0.0 && cur.theta < PI);
            min_theta = min_theta.min(cur.theta);
            if prev.p_theta * cur.p_theta < 0.0 {
                sign_changes += 1;
            }
            worst_potential = worst_potential.min(conserved.polar_potential(&bh, cur.theta) / conserved.carter);
        });

        assert!(matches!(result.outcome, RayOutcome::Escaped { .. }));
        let turning = (2.0 as Float / 40.0).atan();
        assert!((min_theta - turning).abs() < 0.01 * turning, "{} vs {}", min_theta, turning);
        assert_eq!(sign_changes, 1);
        assert!(worst_potential >= -1e-3, "{}", worst_potential);
    }

    #[test]
    fn test_reflection_in_the_polar_forbidden_band() {
        let bh = BlackHole::new(1.0, 0.0).unwrap();
        let integrator = GeodesicIntegrator::new(&bh, settings(100, 100.0));
        let conserved = ConservedQuantities { energy: 1.0, angular_momentum: -2.0, carter: 1600.0 };
        let turning = (2.0 as Float / 40.0).atan();
        let mut state = GeodesicState {
            r: 40.0,
            theta: 0.5 * turning,
            phi: 0.0,
            p_r: 0.0,
            p_theta: -0.01,
            conserved,
        };
        assert!(conserved.polar_potential(&bh, state.theta) < 0.0);

        // heading further toward the pole is turned around
        integrator.reflect_at_turning_points(&mut state);
        assert_eq!(state.p_theta, 0.01);
        // already heading back out is left alone
        integrator.reflect_at_turning_points(&mut state);
        assert_eq!(state.p_theta, 0.01);

        // the allowed band is never touched
        state.theta = 2.0 * turning;
        state.p_theta = -0.01;
        integrator.reflect_at_turning_points(&mut state);
        assert_eq!(state.p_theta, -0.01);
    }

    #[test]
    fn test_axis_crossing_is_wrapped_during_stepping() {
        let bh = BlackHole::new(1.0, 0.5).unwrap();
        let ray = Ray3f::new(Vector3f::new(-50.0, 0.0, 40.0), Vector3f::new(1.0, 0.0, 0.0));
        let mut state = GeodesicState::from_observer_ray(&ray, &bh);
        let integrator = GeodesicIntegrator::new(&bh, settings(4096, 100.0));
        let mut max_jump: Float = 0.0;
        integrator.integrate(&mut state, |prev, cur, h| {
            assert!(cur.theta >= 0.0 && cur.theta <= PI);
            let jump = (cur.cartesian_position(&bh) - prev.cartesian_position(&bh)).norm();
            max_jump = max_jump.max(jump / h);
        });
        // the Cartesian path stays continuous across the relabelling
        assert!(max_jump < 2.0, "{}", max_jump);
    }
}
