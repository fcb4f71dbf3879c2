//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a bounce budget
//! - Sky gradient background
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma correction on output

use crate::{Camera, Color, Hittable, ImageBuffer, Ray};
use lux_math::{unit_vector, Interval};
use rand::RngCore;
use std::time::Instant;

/// Lower bound on accepted hit distances, so a bounce does not re-hit the
/// surface it just left.
pub const SHADOW_EPSILON: f64 = 1e-4;

/// Output scale; truncating `255.99 * c` maps [0, 1] onto 0..=255.
const CHANNEL_SCALE: f64 = 255.99;

/// Compute the color seen by a ray.
///
/// Follows the ray through up to `depth` bounces. Running out of depth or
/// being absorbed yields black; escaping the scene yields the sky.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    // Bounce budget spent, no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(SHADOW_EPSILON, f64::INFINITY)) else {
        return sky_gradient(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            result.attenuation * ray_color(&result.scattered, world, depth - 1, rng)
        }
        None => Color::ZERO,
    }
}

/// Vertical white to sky-blue gradient used as the background.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = unit_vector(ray.direction());
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    (1.0 - a) * white + a * blue
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert an averaged linear color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.0, 1.0);
    let quantize = |c: f64| (CHANNEL_SCALE * intensity.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Render a single pixel, averaging `samples_per_pixel` jittered samples.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth, rng);
    }

    pixel_color * camera.samples_scale()
}

/// Render the entire scene to an image buffer.
///
/// Pixels are visited row by row from the top, left to right, drawing every
/// sample from `rng` in that order. The camera must already be initialized.
pub fn render(camera: &Camera, world: &dyn Hittable, rng: &mut dyn RngCore) -> ImageBuffer {
    let width = camera.image_width;
    let height = camera.image_height();
    let mut image = ImageBuffer::new(width, height);

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}",
        width,
        height,
        camera.samples_per_pixel,
        camera.max_depth
    );
    let start = Instant::now();

    for y in 0..height {
        log::info!("Scanlines remaining: {}", height - y);
        for x in 0..width {
            let color = render_pixel(camera, world, x, y, rng);
            image.set(x, y, color);
        }
    }

    log::info!("Rendered in {:?}", start.elapsed());
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Dielectric, HitRecord, HittableList, Lambertian, Material, Metal, ScatterResult, Sphere,
        Vec3,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn two_sphere_world() -> HittableList {
        let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0)));
        let center: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5)));

        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, ground)));
        world.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -1.2), 0.5, center)));
        world
    }

    fn small_camera() -> Camera {
        let mut camera = Camera::new()
            .with_image_width(16)
            .with_aspect_ratio(16.0 / 9.0)
            .with_quality(4, 8)
            .with_position(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_vfov(60.0);
        camera.initialize();
        camera
    }

    #[test]
    fn test_sky_gradient() {
        let up = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)));
        assert_eq!(up, Color::new(0.5, 0.7, 1.0));

        let down = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0)));
        assert_eq!(down, Color::new(1.0, 1.0, 1.0));

        // Only the direction matters, not its length
        let long_up = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 7.0, 0.0)));
        assert_eq!(long_up, up);
    }

    #[test]
    fn test_zero_depth_is_black() {
        let world = two_sphere_world();
        let mut rng = StdRng::seed_from_u64(1);

        for dir in [Vec3::NEG_Z, Vec3::Y, Vec3::NEG_Y] {
            let ray = Ray::new(Vec3::ZERO, dir);
            assert_eq!(ray_color(&ray, &world, 0, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_miss_returns_background() {
        let world = two_sphere_world();
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(ray_color(&ray, &world, 5, &mut rng), Color::new(0.5, 0.7, 1.0));
    }

    struct Absorber;

    impl Material for Absorber {
        fn scatter(&self, _: &Ray, _: &HitRecord, _: &mut dyn RngCore) -> Option<ScatterResult> {
            None
        }
    }

    #[test]
    fn test_absorbed_ray_is_black() {
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, Arc::new(Absorber))));
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(ray_color(&ray, &world, 50, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_zero_radius_sphere_is_invisible() {
        let gray: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.0, gray)));
        let mut rng = StdRng::seed_from_u64(1);

        // Straight through the center: nothing is hit, so the sky shows
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let color = ray_color(&ray, &world, 10, &mut rng);
        assert!(color.is_finite());
        assert_eq!(color, sky_gradient(&ray));
    }

    #[test]
    fn test_trapped_ray_runs_out_of_depth() {
        let mirror: Arc<dyn Material> = Arc::new(Metal::new(Color::ONE, 0.0));
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(Vec3::ZERO, 1.0, mirror)));
        let mut rng = StdRng::seed_from_u64(1);

        // Reflecting off the inside of a mirror ball never escapes
        let inside = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ray_color(&inside, &world, 10, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_attenuation_multiplies_bounce() {
        // Ray hits a mirror once and escapes straight up into the sky.
        let mirror: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.5, 0.5, 0.5), 0.0));
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(Vec3::new(0.0, -2.0, 0.0), 1.0, mirror)));
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Y);
        let color = ray_color(&ray, &world, 5, &mut rng);
        assert!((color - Color::new(0.25, 0.35, 0.5)).length() < 1e-12);

        // One bounce of budget is not enough to reach the sky after the hit.
        assert_eq!(ray_color(&ray, &world, 1, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_glass_sphere_transmits() {
        let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, glass)));
        let mut rng = StdRng::seed_from_u64(2);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let color = ray_color(&ray, &world, 10, &mut rng);
        // Glass absorbs nothing, so whatever comes back is sky.
        assert!(color.x > 0.0 && color.y > 0.0 && color.z > 0.0);
        assert!(color.max_element() <= 1.0 + 1e-12);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert_eq!(linear_to_gamma(f64::NAN), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-12);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::new(4.0, -1.0, 0.25)), [255, 0, 127]);
    }

    #[test]
    fn test_render_pixel_hits_sphere() {
        let world = two_sphere_world();
        let camera = small_camera();
        let mut rng = StdRng::seed_from_u64(42);

        let color = render_pixel(&camera, &world, 8, 4, &mut rng);

        // The blue sphere darkens the pixel well below the bright sky
        assert!(color.length() > 0.0);
        assert!(color.x < 0.5);
    }

    #[test]
    fn test_render_is_deterministic() {
        let world = two_sphere_world();
        let camera = small_camera();

        let a = render(&camera, &world, &mut StdRng::seed_from_u64(7));
        let b = render(&camera, &world, &mut StdRng::seed_from_u64(7));

        assert_eq!(a.width, 16);
        assert_eq!(a.height, 9);
        assert_eq!(a.to_rgb8(), b.to_rgb8());
    }
}
