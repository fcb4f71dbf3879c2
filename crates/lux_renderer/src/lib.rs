//! Lux renderer - CPU path tracing over a scene of spheres.
//!
//! A single-threaded Monte Carlo path tracer with diffuse, metallic and
//! dielectric materials. All randomness is drawn from a caller-supplied
//! generator, so a fixed seed reproduces the same image byte for byte.

mod camera;
mod hittable;
mod material;
mod output;
mod renderer;
mod sampling;
mod sphere;

pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use output::{write_ppm, ImageBuffer, PPM_MAX_VALUE};
pub use renderer::{
    color_to_rgb, linear_to_gamma, ray_color, render, render_pixel, sky_gradient, SHADOW_EPSILON,
};
pub use sampling::{gen_f64, gen_range_f64, random_in_unit_sphere, random_unit_vector, sample_square};
pub use sphere::Sphere;

/// Re-export the math types the public API is expressed in.
pub use lux_math::{Color, Interval, Point3, Ray, Vec3};
