// Copyright @yucwang 2021

pub mod computation_node;
pub mod emitter;
pub mod geodesic;
pub mod geodesic_integrator;
pub mod integrator;
pub mod kerr;
pub mod radiance;
pub mod rng;
pub mod scene;
pub mod scene_loader;
pub mod sensor;
