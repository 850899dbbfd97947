// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::math::constants::Vector3f;
use crate::math::spectrum::RGBSpectrum;

/// Background radiance at infinity, looked up with the final direction of
/// escaped rays.
pub trait Emitter: ComputationNode + Send + Sync {
    fn eval_direction(&self, _direction: &Vector3f) -> RGBSpectrum {
        RGBSpectrum::default()
    }
}
