//! Vector helpers that glam does not provide in the form the tracer needs.

use crate::Vec3;

/// Components below this magnitude count as zero.
const NEAR_ZERO_EPSILON: f64 = 1e-8;

/// Extra queries on [`Vec3`].
pub trait VecExt {
    /// True if every component is within `1e-8` of zero.
    fn near_zero(&self) -> bool;
}

impl VecExt for Vec3 {
    #[inline]
    fn near_zero(&self) -> bool {
        self.x.abs() < NEAR_ZERO_EPSILON
            && self.y.abs() < NEAR_ZERO_EPSILON
            && self.z.abs() < NEAR_ZERO_EPSILON
    }
}

/// Scale `v` to unit length.
///
/// A zero-length input produces NaN components. Callers are expected to
/// avoid normalizing degenerate vectors.
#[inline]
pub fn unit_vector(v: Vec3) -> Vec3 {
    v / v.length()
}

/// Mirror `v` about the surface normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with normal `n`.
///
/// `etai_over_etat` is the ratio of the incident to the transmitted
/// refractive index.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
