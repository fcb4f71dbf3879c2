//! Material trait for surface scattering.

use crate::{
    hittable::HitRecord,
    sampling::{gen_f64, random_unit_vector},
};
use lux_math::{reflect, refract, unit_vector, Color, Ray, VecExt};
use rand::RngCore;

/// Outcome of a scattering event that was not absorbed.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel fraction of light kept by the bounce
    pub attenuation: Color,
    /// The continuing ray, starting at the hit point
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Normal plus a point on the unit sphere gives a cosine-weighted direction
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.near_zero() {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(unit_vector(ray_in.direction()), rec.normal);
        let scattered_dir = if self.fuzz > 0.0 {
            reflected + self.fuzz * random_unit_vector(rng)
        } else {
            reflected
        };

        // Fuzzed reflections that dip below the surface are absorbed
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f64) -> Self {
        Self { ior }
    }

    pub fn ior(&self) -> f64 {
        self.ior
    }

    /// Schlick's approximation for reflectance
    pub fn reflectance(cosine: f64, ior: f64) -> f64 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Entering from air on the front face, leaving into air on the back
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = unit_vector(ray_in.direction());
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > gen_f64(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}
