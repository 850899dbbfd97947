// Copyright @yucwang 2026

use crate::core::computation_node::{ComputationNode, generate_node_id};
use crate::core::emitter::Emitter;
use crate::math::constants::{Float, Vector2f, Vector3f, INV_PI, PI};
use crate::math::spectrum::RGBSpectrum;
use crate::textures::image::ImageTexture;

/// Equirectangular sky. The spin axis (+z) is the map's vertical axis: the
/// top row is the north pole, u runs with φ.
pub struct EnvMap {
    id: String,
    texture: ImageTexture,
    scale: Float,
    /// Rotation of the map about the spin axis, radians.
    rotation: Float,
}

impl EnvMap {
    pub fn from_file(path: &str, scale: Float) -> std::result::Result<Self, String> {
        Self::from_file_with_id(path, scale, None)
    }

    pub fn from_file_with_id(path: &str, scale: Float, id: Option<String>) -> std::result::Result<Self, String> {
        let texture = ImageTexture::from_file(path)?;
        Ok(Self::from_texture(texture, scale, id))
    }

    pub fn from_texture(texture: ImageTexture, scale: Float, id: Option<String>) -> Self {
        Self {
            id: id.unwrap_or_else(|| generate_node_id("EnvMap")),
            texture,
            scale,
            rotation: 0.0,
        }
    }

    pub fn set_rotation(&mut self, rotation: Float) {
        self.rotation = rotation;
    }

    pub fn uv_from_direction(&self, d: &Vector3f) -> Vector2f {
        let phi = d.y.atan2(d.x) - self.rotation;
        let raw_u = (phi + PI) * 0.5 * INV_PI;
        let u = raw_u - raw_u.floor();
        let v = d.z.clamp(-1.0, 1.0).acos() * INV_PI;
        Vector2f::new(u, v)
    }
}

impl ComputationNode for EnvMap {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_string(&self) -> String {
        let (w, h) = self.texture.dimensions();
        format!("EnvMap({}x{}, scale={})", w, h, self.scale)
    }
}

impl Emitter for EnvMap {
    fn eval_direction(&self, direction: &Vector3f) -> RGBSpectrum {
        let len = direction.norm();
        if len <= 0.0 || !len.is_finite() {
            return RGBSpectrum::default();
        }
        let uv = self.uv_from_direction(&(direction / len));
        self.texture.eval(uv) * self.scale
    }
}
