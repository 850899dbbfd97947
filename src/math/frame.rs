// Copyright @yucwang 2023

use crate::math::constants::{ Float, Vector3f };

/// Orthonormal frame. The spherical frame at (θ, φ) is the local
/// (radial, polar, azimuthal) basis used to move between Cartesian and
/// Boyer-Lindquist velocity components.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub x: Vector3f,
    pub y: Vector3f,
    pub z: Vector3f
}

impl Frame {
    /// x = e_r, y = e_θ, z = e_φ.
    pub fn spherical(theta: Float, phi: Float) -> Frame {
        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        Frame {
            x: Vector3f::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta),
            y: Vector3f::new(cos_theta * cos_phi, cos_theta * sin_phi, -sin_theta),
            z: Vector3f::new(-sin_phi, cos_phi, 0.0)
        }
    }

    pub fn to_local(&self, v: Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.x), v.dot(&self.y), v.dot(&self.z))
    }

    pub fn from_local(&self, v: Vector3f) -> Vector3f {
        v.x * self.x + v.y * self.y + v.z * self.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spherical_frame_is_orthonormal() {
        let frame = Frame::spherical(1.1, -2.3);
        assert!((frame.x.norm() - 1.0).abs() < 1e-12);
        assert!((frame.y.norm() - 1.0).abs() < 1e-12);
        assert!((frame.z.norm() - 1.0).abs() < 1e-12);
        assert!(frame.x.dot(&frame.y).abs() < 1e-12);
        assert!(frame.y.dot(&frame.z).abs() < 1e-12);
        assert!(frame.z.dot(&frame.x).abs() < 1e-12);
        // right handed: e_r x e_θ = e_φ
        assert!((frame.x.cross(&frame.y) - frame.z).norm() < 1e-12);
    }

    #[test]
    fn test_local_round_trip() {
        let frame = Frame::spherical(0.4, 0.9);
        let v = Vector3f::new(0.3, -1.2, 2.0);
        let back = frame.from_local(frame.to_local(v));
        assert!((back - v).norm() < 1e-12);
    }
}
