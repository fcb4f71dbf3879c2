//! Build a scene in code and render it to PPM.
//!
//! Run with: cargo run --release --example simple_render

use std::fs::File;
use std::sync::Arc;

use lux_renderer::{
    gen_f64, gen_range_f64, render, write_ppm, Camera, Color, Dielectric, HittableList,
    Lambertian, Material, Metal, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut rng = StdRng::seed_from_u64(2024);

    let start = std::time::Instant::now();
    let world = build_scene(&mut rng);
    log::info!("Scene with {} spheres built in {:?}", world.len(), start.elapsed());

    let mut camera = Camera::new()
        .with_aspect_ratio(16.0 / 9.0)
        .with_image_width(600)
        .with_quality(32, 10)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_vfov(20.0);
    camera.initialize();

    let image = render(&camera, &world, &mut rng);

    let filename = "simple_render.ppm";
    write_ppm(&image, File::create(filename)?)?;
    log::info!("Saved to {}", filename);
    Ok(())
}

fn build_scene(rng: &mut StdRng) -> HittableList {
    let mut world = HittableList::new();

    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground)));

    // One glass material shared by every glass sphere
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));

    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass.clone())));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    for a in -5..5 {
        for b in -5..5 {
            let center = Vec3::new(
                a as f64 + 0.9 * gen_f64(rng),
                0.2,
                b as f64 + 0.9 * gen_f64(rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat = gen_f64(rng);
            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                let albedo = Color::new(
                    gen_f64(rng) * gen_f64(rng),
                    gen_f64(rng) * gen_f64(rng),
                    gen_f64(rng) * gen_f64(rng),
                );
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    gen_range_f64(rng, 0.5, 1.0),
                    gen_range_f64(rng, 0.5, 1.0),
                    gen_range_f64(rng, 0.5, 1.0),
                );
                Arc::new(Metal::new(albedo, gen_range_f64(rng, 0.0, 0.5)))
            } else {
                glass.clone()
            };

            world.add(Arc::new(Sphere::new(center, 0.2, material)));
        }
    }

    world
}
