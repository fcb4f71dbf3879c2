//! Hittable trait and HitRecord for ray-object intersection.

use crate::Material;
use lux_math::{Interval, Point3, Ray, Vec3};
use std::sync::Arc;

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point3,
    /// Unit surface normal, always facing against the incoming ray
    pub normal: Vec3,
    /// Material of the surface that was hit
    pub material: &'a dyn Material,
    /// Ray parameter of the intersection
    pub t: f64,
    /// Whether the ray hit the outward-facing side of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record from the geometric (outward) unit normal.
    ///
    /// The stored normal is flipped when the ray arrives from inside, so
    /// `ray.direction().dot(normal) <= 0` holds for every record.
    pub fn new(
        ray: &Ray,
        p: Point3,
        t: f64,
        outward_normal: Vec3,
        material: &'a dyn Material,
    ) -> Self {
        let front_face = ray.direction().dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            p,
            normal,
            material,
            t,
            front_face,
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with parameter strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}

/// An ordered collection of hittable objects, scanned linearly.
///
/// Objects are shared so scene setup code can keep handles to them.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for object in &self.objects {
            // Later objects only count if strictly closer than the best so far.
            let max = closest.as_ref().map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, ray_t.with_max(max)) {
                closest = Some(rec);
            }
        }

        closest
    }
}
