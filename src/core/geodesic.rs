// Copyright @yucwang 2026

use crate::core::kerr::BlackHole;
use crate::math::constants::{Float, Vector3f, Vector5f, PI};
use crate::math::frame::Frame;
use crate::math::ray::Ray3f;

/// Polar angle clamp used when seeding a ray, keeps cot θ finite.
pub const POLE_CLAMP: Float = 0.01;
/// Below this sin²θ the L_z² cot²θ term of Θ(θ) is dropped.
pub const POLE_SIN2_CUTOFF: Float = 1e-8;

/// Constants of motion of a null geodesic: energy, axial angular momentum and
/// the Carter constant.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ConservedQuantities {
    pub energy: Float,
    pub angular_momentum: Float,
    pub carter: Float,
}

impl ConservedQuantities {
    /// R(r) = [(r² + a²)E − aL_z]² − Δ[(L_z − aE)² + Q]
    pub fn radial_potential(&self, black_hole: &BlackHole, r: Float) -> Float {
        let a = black_hole.spin();
        let p = (r * r + a * a) * self.energy - a * self.angular_momentum;
        let k = self.angular_momentum - a * self.energy;
        p * p - black_hole.delta(r) * (k * k + self.carter)
    }

    /// dR/dr
    pub fn radial_potential_derivative(&self, black_hole: &BlackHole, r: Float) -> Float {
        let a = black_hole.spin();
        let p = (r * r + a * a) * self.energy - a * self.angular_momentum;
        let k = self.angular_momentum - a * self.energy;
        let d_delta = 2.0 * r - 2.0 * black_hole.mass();
        4.0 * r * self.energy * p - d_delta * (k * k + self.carter)
    }

    /// Θ(θ) = Q + a²E²cos²θ − L_z²cot²θ
    pub fn polar_potential(&self, black_hole: &BlackHole, theta: Float) -> Float {
        let a = black_hole.spin();
        let (sin_theta, cos_theta) = theta.sin_cos();
        let sin2 = sin_theta * sin_theta;
        let cos2 = cos_theta * cos_theta;
        let mut value = self.carter + a * a * self.energy * self.energy * cos2;
        if sin2 > POLE_SIN2_CUTOFF {
            value -= self.angular_momentum * self.angular_momentum * cos2 / sin2;
        }
        value
    }

    /// dΘ/dθ
    pub fn polar_potential_derivative(&self, black_hole: &BlackHole, theta: Float) -> Float {
        let a = black_hole.spin();
        let (sin_theta, cos_theta) = theta.sin_cos();
        let sin2 = sin_theta * sin_theta;
        let mut value = -2.0 * a * a * self.energy * self.energy * cos_theta * sin_theta;
        if sin2 > POLE_SIN2_CUTOFF {
            let lz2 = self.angular_momentum * self.angular_momentum;
            value += 2.0 * lz2 * cos_theta / (sin_theta * sin2);
        }
        value
    }

    /// Critical impact parameter b² = L_z² + Q. Schwarzschild rays with
    /// b below 3√3 M are captured.
    pub fn impact_parameter(&self) -> Float {
        (self.angular_momentum * self.angular_momentum + self.carter).max(0.0).sqrt() / self.energy.abs().max(1e-12)
    }
}

/// Terminal classification of a ray. `Active` is the only non-terminal state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RayOutcome {
    Active,
    Captured,
    Escaped { final_direction: Vector3f },
    MaxStepsReached,
}

impl RayOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RayOutcome::Active)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RayOutcome::Active => "active",
            RayOutcome::Captured => "captured",
            RayOutcome::Escaped { .. } => "escaped",
            RayOutcome::MaxStepsReached => "max_steps",
        }
    }
}

/// Phase-space point of a single ray in Boyer-Lindquist coordinates.
///
/// The evolution parameter λ is Mino time (dλ_affine = Σ dλ), in which
/// dr/dλ = p_r Σ = ±√R(r) and dθ/dλ = p_θ Σ = ±√Θ(θ).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeodesicState {
    pub r: Float,
    pub theta: Float,
    pub phi: Float,
    pub p_r: Float,
    pub p_theta: Float,
    pub conserved: ConservedQuantities,
}

impl GeodesicState {
    /// Seeds a ray from an observer far from the hole.
    ///
    /// The Cartesian direction is split on the local spherical basis and read
    /// as flat-space coordinate velocities, from which E = 1, L_z and Q follow.
    /// The initial momenta are then taken from the potentials so the null
    /// constraint holds exactly, keeping the sign of the initial motion.
    pub fn from_observer_ray(ray: &Ray3f, black_hole: &BlackHole) -> Self {
        let bl = black_hole.cartesian_to_boyer_lindquist(&ray.origin());
        let r = bl.x;
        let theta = bl.y.clamp(POLE_CLAMP, PI - POLE_CLAMP);
        let phi = bl.z;

        let local = Frame::spherical(theta, phi).to_local(ray.dir());
        let (sin_theta, cos_theta) = theta.sin_cos();

        let dr = local.x;
        let dtheta = local.y / r;
        let dphi = local.z / (r * sin_theta);

        let a = black_hole.spin();
        let energy = 1.0;
        let angular_momentum = r * r * sin_theta * sin_theta * dphi;
        let p_theta_cov = r * r * dtheta;
        let carter = p_theta_cov * p_theta_cov
            + cos_theta * cos_theta
                * (angular_momentum * angular_momentum / (sin_theta * sin_theta) - a * a * energy * energy);

        let conserved = ConservedQuantities { energy, angular_momentum, carter };
        let sigma = black_hole.sigma(r, theta);
        let radial = conserved.radial_potential(black_hole, r).max(0.0).sqrt();
        let polar = conserved.polar_potential(black_hole, theta).max(0.0).sqrt();

        Self {
            r,
            theta,
            phi,
            p_r: signum_or_zero(dr) * radial / sigma,
            p_theta: signum_or_zero(dtheta) * polar / sigma,
            conserved,
        }
    }

    pub fn phase_vector(&self) -> Vector5f {
        Vector5f::new(self.r, self.theta, self.phi, self.p_r, self.p_theta)
    }

    pub fn set_phase_vector(&mut self, y: &Vector5f) {
        self.r = y[0];
        self.theta = y[1];
        self.phi = y[2];
        self.p_r = y[3];
        self.p_theta = y[4];
    }

    pub fn has_nan(&self) -> bool {
        self.phase_vector().iter().any(|v| v.is_nan())
    }

    pub fn cartesian_position(&self, black_hole: &BlackHole) -> Vector3f {
        black_hole.boyer_lindquist_to_cartesian(self.r, self.theta, self.phi)
    }

    /// Height above the equatorial plane.
    pub fn height(&self) -> Float {
        self.r * self.theta.cos()
    }

    /// Brings θ back into [0, π] after the ray crossed the spin axis.
    /// The point and its velocity are unchanged: θ is reflected, φ moves by
    /// half a turn in the sense of L_z and p_θ changes sign.
    pub fn wrap_polar_angle(&mut self) {
        let crossed = if self.theta < 0.0 {
            self.theta = -self.theta;
            true
        } else if self.theta > PI {
            self.theta = 2.0 * PI - self.theta;
            true
        } else {
            false
        };
        if crossed {
            let turn = if self.conserved.angular_momentum >= 0.0 { PI } else { -PI };
            self.phi += turn;
            self.p_theta = -self.p_theta;
        }
    }
}

fn signum_or_zero(v: Float) -> Float {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
