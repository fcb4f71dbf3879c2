//! Sphere primitive for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use lux_math::{Interval, Point3, Ray};
use std::sync::Arc;

/// A sphere primitive.
pub struct Sphere {
    center: Point3,
    radius: f64,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Create a new sphere. The sign of the radius is ignored.
    pub fn new(center: Point3, radius: f64, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius: radius.abs(),
            material,
        }
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn material(&self) -> &Arc<dyn Material> {
        &self.material
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // A point has no surface normal
        if self.radius <= 0.0 {
            return None;
        }

        // |origin + t*d - center|^2 = r^2 expanded into a*t^2 + b*t + c = 0
        let oc = ray.origin() - self.center;
        let a = ray.direction().dot(ray.direction());
        let b = 2.0 * oc.dot(ray.direction());
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (-b - sqrtd) / (2.0 * a);
        if !ray_t.surrounds(root) {
            root = (-b + sqrtd) / (2.0 * a);
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = ray.at(root);
        let outward_normal = (p - self.center) / self.radius;

        Some(HitRecord::new(ray, p, root, outward_normal, self.material.as_ref()))
    }
}
