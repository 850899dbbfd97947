// Copyright @yucwang 2026

pub mod accretion_disk;
pub mod envmap;
pub mod ergosphere;
pub mod jet;
pub mod photon_ring;
pub mod starfield;
