// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f, PI};

/// Spins below this magnitude are treated as Schwarzschild.
pub const SCHWARZSCHILD_SPIN_TOLERANCE: Float = 1e-6;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum KerrError {
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: Float,
        reason: &'static str,
    },
}

/// Kerr black hole in geometric units (G = c = 1), spin axis along +z.
///
/// The named radii are derived once at construction and rebuilt by every
/// setter, so a `BlackHole` shared across a frame is always consistent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BlackHole {
    mass: Float,
    spin: Float,
    event_horizon: Float,
    inner_horizon: Float,
    isco_prograde: Float,
    isco_retrograde: Float,
    photon_sphere: Float,
}

impl BlackHole {
    pub fn new(mass: Float, spin: Float) -> Result<Self, KerrError> {
        validate(mass, spin)?;
        let mut black_hole = Self {
            mass,
            spin,
            event_horizon: 0.0,
            inner_horizon: 0.0,
            isco_prograde: 0.0,
            isco_retrograde: 0.0,
            photon_sphere: 0.0,
        };
        black_hole.rebuild_radii();
        Ok(black_hole)
    }

    pub fn schwarzschild(mass: Float) -> Result<Self, KerrError> {
        Self::new(mass, 0.0)
    }

    pub fn set_mass(&mut self, mass: Float) -> Result<(), KerrError> {
        validate(mass, self.spin)?;
        self.mass = mass;
        self.rebuild_radii();
        Ok(())
    }

    pub fn set_spin(&mut self, spin: Float) -> Result<(), KerrError> {
        validate(self.mass, spin)?;
        self.spin = spin;
        self.rebuild_radii();
        Ok(())
    }

    fn rebuild_radii(&mut self) {
        let m = self.mass;
        let root = (m * m - self.spin * self.spin).max(0.0).sqrt();
        self.event_horizon = m + root;
        self.inner_horizon = m - root;
        self.isco_prograde = bardeen_press_teukolsky_isco(m, self.chi(), true);
        self.isco_retrograde = bardeen_press_teukolsky_isco(m, self.chi(), false);
        self.photon_sphere = if self.is_schwarzschild() {
            3.0 * m
        } else {
            2.0 * m * (1.0 + ((2.0 / 3.0) * (-self.chi()).acos()).cos())
        };
    }

    pub fn mass(&self) -> Float {
        self.mass
    }

    pub fn spin(&self) -> Float {
        self.spin
    }

    /// Dimensionless spin magnitude |a|/M. Prograde and retrograde are taken
    /// relative to the hole's own rotation, so the radii depend on |a| only.
    pub fn chi(&self) -> Float {
        (self.spin.abs() / self.mass).min(1.0)
    }

    pub fn is_schwarzschild(&self) -> bool {
        self.spin.abs() < SCHWARZSCHILD_SPIN_TOLERANCE
    }

    pub fn event_horizon(&self) -> Float {
        self.event_horizon
    }

    pub fn inner_horizon(&self) -> Float {
        self.inner_horizon
    }

    pub fn isco_radius(&self) -> Float {
        self.isco_prograde
    }

    pub fn isco_radius_retrograde(&self) -> Float {
        self.isco_retrograde
    }

    /// Prograde equatorial circular photon orbit.
    pub fn photon_sphere_radius(&self) -> Float {
        self.photon_sphere
    }

    pub fn ergosphere_radius(&self, theta: Float) -> Float {
        let m = self.mass;
        let a_cos = self.spin * theta.cos();
        m + (m * m - a_cos * a_cos).max(0.0).sqrt()
    }

    /// Σ = r² + a²cos²θ
    pub fn sigma(&self, r: Float, theta: Float) -> Float {
        let cos_theta = theta.cos();
        r * r + self.spin * self.spin * cos_theta * cos_theta
    }

    /// Δ = r² − 2Mr + a²
    pub fn delta(&self, r: Float) -> Float {
        r * r - 2.0 * self.mass * r + self.spin * self.spin
    }

    /// A = (r² + a²)² − a²Δsin²θ
    pub fn big_a(&self, r: Float, theta: Float) -> Float {
        let a2 = self.spin * self.spin;
        let sin_theta = theta.sin();
        let r2a2 = r * r + a2;
        r2a2 * r2a2 - a2 * self.delta(r) * sin_theta * sin_theta
    }

    /// Angular velocity ω = 2aMr / A of zero-angular-momentum observers.
    pub fn frame_dragging_omega(&self, r: Float, theta: Float) -> Float {
        let big_a = self.big_a(r, theta);
        if big_a <= 0.0 {
            return 0.0;
        }
        2.0 * self.spin * self.mass * r / big_a
    }

    /// √(1 − 2Mr/Σ), floored at a small epsilon so it stays real inside the
    /// ergosphere.
    pub fn gravitational_redshift(&self, r: Float, theta: Float) -> Float {
        let sigma = self.sigma(r, theta).max(1e-12);
        (1.0 - 2.0 * self.mass * r / sigma).max(REDSHIFT_FLOOR).sqrt()
    }

    pub fn is_inside_ergosphere(&self, r: Float, theta: Float) -> bool {
        r > self.event_horizon && r < self.ergosphere_radius(theta)
    }

    /// Cartesian → Boyer-Lindquist (r, θ, φ).
    pub fn cartesian_to_boyer_lindquist(&self, p: &Vector3f) -> Vector3f {
        if self.is_schwarzschild() {
            return cartesian_to_spherical(p);
        }

        let a2 = self.spin * self.spin;
        let rho2 = p.norm_squared();
        let b = rho2 - a2;
        // r⁴ − (ρ² − a²) r² − a² z² = 0
        let r2 = 0.5 * (b + (b * b + 4.0 * a2 * p.z * p.z).max(0.0).sqrt());
        let r = r2.max(0.0).sqrt();
        let theta = if r > 0.0 {
            (p.z / r).clamp(-1.0, 1.0).acos()
        } else {
            0.5 * PI
        };
        let phi = p.y.atan2(p.x);
        Vector3f::new(r, theta, phi)
    }

    /// Boyer-Lindquist (r, θ, φ) → Cartesian.
    pub fn boyer_lindquist_to_cartesian(&self, r: Float, theta: Float, phi: Float) -> Vector3f {
        if self.is_schwarzschild() {
            return spherical_to_cartesian(r, theta, phi);
        }

        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let rho = (r * r + self.spin * self.spin).sqrt();
        Vector3f::new(rho * sin_theta * cos_phi,
                      rho * sin_theta * sin_phi,
                      r * cos_theta)
    }
}

pub const REDSHIFT_FLOOR: Float = 1e-6;

fn validate(mass: Float, spin: Float) -> Result<(), KerrError> {
    if !mass.is_finite() || mass <= 0.0 {
        return Err(KerrError::InvalidParameter {
            name: "mass",
            value: mass,
            reason: "mass must be finite and positive",
        });
    }
    if !spin.is_finite() || spin.abs() > mass {
        return Err(KerrError::InvalidParameter {
            name: "spin",
            value: spin,
            reason: "spin must satisfy |a| <= M",
        });
    }
    Ok(())
}

/// Bardeen-Press-Teukolsky closed form for the innermost stable circular
/// orbit, with χ = |a|/M.
pub fn bardeen_press_teukolsky_isco(mass: Float, chi: Float, prograde: bool) -> Float {
    let chi2 = chi * chi;
    let z1 = 1.0 + (1.0 - chi2).max(0.0).cbrt() * ((1.0 + chi).cbrt() + (1.0 - chi).max(0.0).cbrt());
    let z2 = (3.0 * chi2 + z1 * z1).sqrt();
    let root = ((3.0 - z1) * (3.0 + z1 + 2.0 * z2)).max(0.0).sqrt();
    if prograde {
        mass * (3.0 + z2 - root)
    } else {
        mass * (3.0 + z2 + root)
    }
}

pub fn cartesian_to_spherical(p: &Vector3f) -> Vector3f {
    let r = p.norm();
    let theta = if r > 0.0 {
        (p.z / r).clamp(-1.0, 1.0).acos()
    } else {
        0.5 * PI
    };
    Vector3f::new(r, theta, p.y.atan2(p.x))
}

pub fn spherical_to_cartesian(r: Float, theta: Float, phi: Float) -> Vector3f {
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vector3f::new(r * sin_theta * cos_phi, r * sin_theta * sin_phi, r * cos_theta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert!(matches!(BlackHole::new(0.0, 0.0), Err(KerrError::InvalidParameter { name: "mass", .. })));
        assert!(matches!(BlackHole::new(-1.0, 0.0), Err(KerrError::InvalidParameter { name: "mass", .. })));
        assert!(matches!(BlackHole::new(1.0, 1.01), Err(KerrError::InvalidParameter { name: "spin", .. })));
        assert!(matches!(BlackHole::new(1.0, -1.5), Err(KerrError::InvalidParameter { name: "spin", .. })));
        assert!(BlackHole::new(Float::NAN, 0.0).is_err());
        assert!(BlackHole::new(1.0, 1.0).is_ok());
    }

    #[test]
    fn test_setters_validate_and_rebuild() {
        let mut bh = BlackHole::schwarzschild(1.0).unwrap();
        assert_abs_diff_eq!(bh.event_horizon(), 2.0, epsilon = 1e-10);

        bh.set_spin(0.9).unwrap();
        assert_abs_diff_eq!(bh.event_horizon(), 1.43589, epsilon = 1e-4);

        assert!(bh.set_spin(2.0).is_err());
        // failed mutation leaves the previous configuration intact
        assert_abs_diff_eq!(bh.spin(), 0.9, epsilon = 1e-15);

        assert!(bh.set_mass(0.5).is_err());
        bh.set_mass(2.0).unwrap();
        assert_abs_diff_eq!(bh.event_horizon(), 2.0 + (4.0f64 - 0.81).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_schwarzschild_radii() {
        let bh = BlackHole::new(1.0, 0.0).unwrap();
        assert_abs_diff_eq!(bh.event_horizon(), 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(bh.inner_horizon(), 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(bh.photon_sphere_radius(), 3.0, epsilon = 1e-10);
        assert_abs_diff_eq!(bh.isco_radius(), 6.0, epsilon = 1e-10);
        assert_abs_diff_eq!(bh.isco_radius_retrograde(), 6.0, epsilon = 1e-10);
    }

    #[test]
    fn test_kerr_radii_at_high_spin() {
        let bh = BlackHole::new(1.0, 0.9).unwrap();
        assert_abs_diff_eq!(bh.event_horizon(), 1.43589, epsilon = 1e-2);
        assert_abs_diff_eq!(bh.isco_radius(), 2.3209, epsilon = 1e-2);
        assert_abs_diff_eq!(bh.isco_radius_retrograde(), 8.7168, epsilon = 1e-2);
        assert_abs_diff_eq!(bh.photon_sphere_radius(), 1.5579, epsilon = 1e-2);
    }

    #[test]
    fn test_extremal_limit() {
        let near = BlackHole::new(1.0, 0.9999).unwrap();
        assert_relative_eq!(near.event_horizon(), 1.0, max_relative = 0.02);
        assert_relative_eq!(near.isco_radius_retrograde(), 9.0, max_relative = 0.02);

        // prograde ISCO converges as (1 - χ)^(1/3), so probe closer to the limit
        let closer = BlackHole::new(1.0, 1.0 - 1e-9).unwrap();
        assert_relative_eq!(closer.isco_radius(), 1.0, max_relative = 0.02);

        let extremal = BlackHole::new(1.0, 1.0).unwrap();
        assert_abs_diff_eq!(extremal.event_horizon(), 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(extremal.isco_radius(), 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(extremal.isco_radius_retrograde(), 9.0, epsilon = 1e-10);
    }

    #[test]
    fn test_radius_ordering_for_all_spins() {
        for mass in [0.5, 1.0, 3.0] {
            for k in 0..=40 {
                let spin = mass * (-1.0 + 0.05 * k as Float);
                let bh = BlackHole::new(mass, spin).unwrap();
                assert!(bh.inner_horizon() <= bh.event_horizon() + 1e-12);
                assert!(bh.event_horizon() <= bh.photon_sphere_radius() + 1e-12);
                assert!(bh.photon_sphere_radius() <= bh.isco_radius() + 1e-12);
                assert!(bh.isco_radius() <= bh.isco_radius_retrograde() + 1e-12);
            }
        }
    }

    #[test]
    fn test_ergosphere() {
        for spin in [0.0, 0.3, 0.9, 1.0] {
            let bh = BlackHole::new(1.0, spin).unwrap();
            assert_abs_diff_eq!(bh.ergosphere_radius(0.5 * PI), 2.0, epsilon = 1e-10);
            assert_abs_diff_eq!(bh.ergosphere_radius(0.0), bh.event_horizon(), epsilon = 1e-10);
        }
        let bh = BlackHole::new(1.0, 0.9).unwrap();
        assert!(bh.is_inside_ergosphere(1.8, 0.5 * PI));
        assert!(!bh.is_inside_ergosphere(1.8, 0.05));
    }

    #[test]
    fn test_frame_dragging() {
        let schwarzschild = BlackHole::new(1.0, 0.0).unwrap();
        assert_eq!(schwarzschild.frame_dragging_omega(5.0, 1.0), 0.0);

        let bh = BlackHole::new(1.0, 0.9).unwrap();
        let near = bh.frame_dragging_omega(3.0, 0.5 * PI);
        let far = bh.frame_dragging_omega(30.0, 0.5 * PI);
        assert!(near > far && far > 0.0);
        // ω → 2aM/r³ far away
        assert_relative_eq!(far, 2.0 * 0.9 / 27000.0, max_relative = 0.01);

        let counter = BlackHole::new(1.0, -0.9).unwrap();
        assert!(counter.frame_dragging_omega(3.0, 0.5 * PI) < 0.0);
    }

    #[test]
    fn test_gravitational_redshift() {
        let bh = BlackHole::new(1.0, 0.0).unwrap();
        assert_relative_eq!(bh.gravitational_redshift(6.0, 0.5 * PI), (2.0f64 / 3.0).sqrt(), max_relative = 0.01);
        assert!(bh.gravitational_redshift(1.0e6, 0.5 * PI) > 0.999);

        let kerr = BlackHole::new(1.0, 0.7).unwrap();
        let mut r = kerr.event_horizon() * 1.01;
        while r < 200.0 {
            let z = kerr.gravitational_redshift(r, 1.2);
            assert!(z > 0.0 && z <= 1.0);
            r *= 1.3;
        }
    }

    #[test]
    fn test_boyer_lindquist_round_trip() {
        let points = [
            Vector3f::new(10.0, 3.0, 2.0),
            Vector3f::new(-5.0, 7.5, -1.0),
            Vector3f::new(0.3, -20.0, 4.0),
            Vector3f::new(30.0, 0.0, 0.0),
        ];
        for spin in [0.0, 0.5, 0.998] {
            let bh = BlackHole::new(1.0, spin).unwrap();
            for p in points.iter() {
                let bl = bh.cartesian_to_boyer_lindquist(p);
                let back = bh.boyer_lindquist_to_cartesian(bl.x, bl.y, bl.z);
                assert!((back - p).norm() < 0.01, "spin {} point {:?} -> {:?}", spin, p, back);
            }
        }
    }

    #[test]
    fn test_boyer_lindquist_reduces_to_spherical() {
        let bh = BlackHole::new(1.0, 0.0).unwrap();
        let p = Vector3f::new(3.0, 4.0, 12.0);
        let bl = bh.cartesian_to_boyer_lindquist(&p);
        assert_abs_diff_eq!(bl.x, 13.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bl.y, (12.0f64 / 13.0).acos(), epsilon = 1e-12);
        assert_abs_diff_eq!(bl.z, 4.0f64.atan2(3.0), epsilon = 1e-12);

        // with spin the radial coordinate is smaller than the Euclidean norm
        let kerr = BlackHole::new(1.0, 0.9).unwrap();
        assert!(kerr.cartesian_to_boyer_lindquist(&p).x < 13.0);
    }
}
