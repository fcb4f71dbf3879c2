//! Lux math - vector, ray and interval types shared by the renderer.
//!
//! Vectors are double precision throughout. A single `Vec3` type stands in
//! for points, directions and linear RGB colors.

pub use glam;

mod interval;
mod ray;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{reflect, refract, unit_vector, VecExt};

/// Double precision 3D vector.
pub type Vec3 = glam::DVec3;

/// A position in world space.
pub type Point3 = Vec3;

/// Linear RGB color, each channel nominally in [0, 1].
pub type Color = Vec3;
