//! Built scenes ready for rendering.

use std::path::Path;

use lux_renderer::{Camera, HittableList};

use crate::description::{
    CameraDescription, MaterialDescription, SceneDescription, SceneResult, SphereDescription,
};

/// A validated world plus an initialized camera.
pub struct Scene {
    pub camera: Camera,
    pub world: HittableList,
}

/// Load, validate and build a scene from a JSON file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> SceneResult<Scene> {
    SceneDescription::from_file(path)?.build()
}

/// The built-in scene: a large ground sphere, a diffuse sphere in the
/// middle, glass on the left and fuzzy gold metal on the right, seen from
/// above and to the left.
pub fn default_scene() -> SceneDescription {
    let materials = [
        (
            "ground",
            MaterialDescription::Lambertian {
                albedo: [0.8, 0.8, 0.0],
            },
        ),
        (
            "center",
            MaterialDescription::Lambertian {
                albedo: [0.1, 0.2, 0.5],
            },
        ),
        (
            "left",
            MaterialDescription::Dielectric {
                refraction_index: 1.5,
            },
        ),
        (
            "right",
            MaterialDescription::Metal {
                albedo: [0.8, 0.6, 0.2],
                fuzz: 1.0,
            },
        ),
    ]
    .into_iter()
    .map(|(name, material)| (name.to_string(), material))
    .collect();

    let sphere = |center: [f64; 3], radius: f64, material: &str| SphereDescription {
        center,
        radius,
        material: material.to_string(),
    };

    SceneDescription {
        camera: CameraDescription {
            aspect_ratio: 16.0 / 9.0,
            image_width: 400,
            samples_per_pixel: 100,
            max_depth: 50,
            vfov: 20.0,
            look_from: [-2.0, 2.0, 1.0],
            look_at: [0.0, 0.0, -1.0],
            vup: [0.0, 1.0, 0.0],
        },
        materials,
        spheres: vec![
            sphere([0.0, -100.5, -1.0], 100.0, "ground"),
            sphere([0.0, 0.0, -1.2], 0.5, "center"),
            sphere([-1.0, 0.0, -1.0], 0.5, "left"),
            sphere([1.0, 0.0, -1.0], 0.5, "right"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_renderer::{render, write_ppm};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn render_ppm(scene: &Scene, seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        let image = render(&scene.camera, &scene.world, &mut rng);
        let mut out = Vec::new();
        write_ppm(&image, &mut out).unwrap();
        out
    }

    #[test]
    fn test_default_scene_builds() {
        let scene = default_scene().build().unwrap();

        assert_eq!(scene.world.len(), 4);
        assert_eq!(scene.camera.image_width, 400);
        assert_eq!(scene.camera.image_height(), 225);
        assert_eq!(scene.camera.samples_per_pixel, 100);
        assert_eq!(scene.camera.max_depth, 50);
    }

    #[test]
    fn test_default_scene_header() {
        let mut desc = default_scene();
        desc.camera.samples_per_pixel = 1;
        desc.camera.max_depth = 1;
        let scene = desc.build().unwrap();

        let out = render_ppm(&scene, 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("P3\n400 225\n255\n"));
    }

    #[test]
    fn test_render_reproducible_with_seed() {
        // Ground plus one foreground sphere
        let json = r#"{
            "camera": {
                "image_width": 32,
                "samples_per_pixel": 4,
                "max_depth": 8,
                "look_from": [0, 0, 1],
                "look_at": [0, 0, -1],
                "vfov": 60
            },
            "materials": {
                "ground": { "type": "lambertian", "albedo": [0.8, 0.8, 0.0] },
                "ball": { "type": "lambertian", "albedo": [0.1, 0.2, 0.5] }
            },
            "spheres": [
                { "center": [0, -100.5, -1], "radius": 100, "material": "ground" },
                { "center": [0, 0, -1], "radius": 0.5, "material": "ball" }
            ]
        }"#;

        let first = render_ppm(&SceneDescription::from_json_str(json).unwrap().build().unwrap(), 42);
        let second = render_ppm(&SceneDescription::from_json_str(json).unwrap().build().unwrap(), 42);
        assert_eq!(first, second);

        let other_seed = render_ppm(&SceneDescription::from_json_str(json).unwrap().build().unwrap(), 43);
        assert_ne!(first, other_seed);
    }

    #[test]
    fn test_load_scene_from_file() {
        let path = std::env::temp_dir().join(format!("lux_scene_test_{}.json", std::process::id()));
        std::fs::write(&path, default_scene().to_json_string().unwrap()).unwrap();

        let scene = load_scene(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(scene.unwrap().world.len(), 4);
    }
}
