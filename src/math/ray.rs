// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

/// Observer ray: an origin in Cartesian space around the hole and a unit
/// direction. The spin axis is +z.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray3f {
    origin: Vector3f,
    dir: Vector3f,
}

impl Ray3f {
    pub fn new(o: Vector3f, d: Vector3f) -> Self {
        Self { origin: o, dir: d.normalize() }
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.origin + self.dir * t
    }

    /// Perpendicular distance between the straight-line extension of the ray
    /// and the origin, i.e. the flat-space impact parameter.
    pub fn impact_parameter(&self) -> Float {
        self.origin.cross(&self.dir).norm()
    }
}

/* Tests for Ray */

#[cfg(test)]
mod tests {
    use super::Vector3f;
    use super::{Ray3f};

    #[test]
    fn test_ray3f() {
        let o = Vector3f::new(0.0, 0.0, 0.0);
        let d = Vector3f::new(1.0, 0.0, 1.0);
        let ray = Ray3f::new(o, d);
        assert_eq!(o, ray.origin());
        assert!((ray.dir().norm() - 1.0).abs() < 1e-12);

        let v1 = ray.at(2.0);
        assert!((v1[0] - std::f64::consts::SQRT_2).abs() < 1e-12);
        assert!((v1[1] - 0.0).abs() < 1e-12);
        assert!((v1[2] - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_ray3f_impact_parameter() {
        let ray = Ray3f::new(Vector3f::new(50.0, 7.0, 0.0), Vector3f::new(-1.0, 0.0, 0.0));
        assert!((ray.impact_parameter() - 7.0).abs() < 1e-12);
    }
}
