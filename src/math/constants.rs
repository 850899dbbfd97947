/* Copyright 2020 @Yuchen Wong */

// Geodesic work needs double precision: horizon and ISCO radii are pinned to 1e-10.
pub type Float = f64;

pub type Vector2f = nalgebra::Vector2<Float>;
pub type Vector3f = nalgebra::Vector3<Float>;
pub type Vector4f = nalgebra::Vector4<Float>;
pub type Vector5f = nalgebra::Vector5<Float>;

pub const PI: Float = std::f64::consts::PI;
pub const TWO_PI: Float = 2.0 * std::f64::consts::PI;
pub const INV_PI: Float = std::f64::consts::FRAC_1_PI;
