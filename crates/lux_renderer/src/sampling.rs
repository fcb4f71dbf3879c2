//! Random sampling helpers.
//!
//! Everything takes the generator explicitly. The renderer threads one
//! stream through the whole image, so draw order is part of the output.

use lux_math::{unit_vector, Vec3};
use rand::{Rng, RngCore};

/// Uniform f64 in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Uniform f64 in [min, max).
#[inline]
pub fn gen_range_f64(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * gen_f64(rng)
}

/// Uniform point strictly inside the unit sphere, by rejection.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range_f64(rng, -1.0, 1.0),
            gen_range_f64(rng, -1.0, 1.0),
            gen_range_f64(rng, -1.0, 1.0),
        );
        // Tiny vectors are rejected too so normalizing them stays finite.
        let len_sq = p.length_squared();
        if len_sq > 1e-160 && len_sq < 1.0 {
            return p;
        }
    }
}

/// Uniform point on the surface of the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    unit_vector(random_in_unit_sphere(rng))
}

/// Offset within the unit square centered on the origin, [-0.5, 0.5) on x and y.
pub fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    let x = gen_f64(rng) - 0.5;
    let y = gen_f64(rng) - 0.5;
    Vec3::new(x, y, 0.0)
}
