//! Camera for ray generation.

use crate::sampling::sample_square;
use lux_math::{unit_vector, Point3, Ray, Vec3};
use rand::RngCore;

/// Positionable pinhole camera.
///
/// The public fields are the configuration. Everything else is derived by
/// [`Camera::initialize`], which must run before rays are generated.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub aspect_ratio: f64,
    pub image_width: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,

    // Camera positioning
    pub vfov: f64, // Vertical field of view in degrees
    pub look_from: Point3,
    pub look_at: Point3,
    pub vup: Vec3,

    // Cached computed values (set by initialize())
    image_height: u32,
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    samples_scale: f64,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 400,
            samples_per_pixel: 10,
            max_depth: 10,
            vfov: 90.0,
            look_from: Vec3::new(0.0, 0.0, 0.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            image_height: 0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            samples_scale: 0.1,
        }
    }

    /// Set the image width to height ratio.
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set the image width. The height follows from the aspect ratio.
    pub fn with_image_width(mut self, width: u32) -> Self {
        self.image_width = width;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_vfov(mut self, vfov: f64) -> Self {
        self.vfov = vfov;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.image_height = ((self.image_width as f64 / self.aspect_ratio) as u32).max(1);
        self.samples_scale = 1.0 / self.samples_per_pixel as f64;
        self.center = self.look_from;

        // Calculate viewport dimensions
        let focal_length = (self.look_from - self.look_at).length();
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * focal_length;
        let viewport_width =
            viewport_height * (self.image_width as f64 / self.image_height as f64);

        // Calculate camera basis vectors
        self.w = unit_vector(self.look_from - self.look_at);
        self.u = unit_vector(self.vup.cross(self.w));
        self.v = self.w.cross(self.u);

        // Viewport edges: u runs right, v runs down the image
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        // Calculate upper left pixel location
        let viewport_upper_left =
            self.center - focal_length * self.w - viewport_u / 2.0 - viewport_v / 2.0;

        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);
    }

    /// Generate a ray for pixel (i, j) with a random offset inside the pixel.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f64) + offset.x) * self.pixel_delta_u
            + ((j as f64) + offset.y) * self.pixel_delta_v;

        Ray::new(self.center, pixel_sample - self.center)
    }

    /// Image height in pixels, valid after [`Camera::initialize`].
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f64 {
        self.samples_scale
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Orthonormal camera basis: right, up, and backward.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Center of the top-left pixel.
    pub fn pixel00_loc(&self) -> Point3 {
        self.pixel00_loc
    }

    /// Per-pixel step to the right and downward.
    pub fn pixel_deltas(&self) -> (Vec3, Vec3) {
        (self.pixel_delta_u, self.pixel_delta_v)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
