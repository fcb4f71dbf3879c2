//! Serializable scene descriptions.
//!
//! A scene file is JSON:
//!
//! ```json
//! {
//!   "camera": { "image_width": 400, "vfov": 20, "look_from": [-2, 2, 1] },
//!   "materials": {
//!     "ground": { "type": "lambertian", "albedo": [0.8, 0.8, 0.0] },
//!     "glass": { "type": "dielectric", "refraction_index": 1.5 }
//!   },
//!   "spheres": [
//!     { "center": [0, -100.5, -1], "radius": 100, "material": "ground" }
//!   ]
//! }
//! ```
//!
//! Camera fields that are left out take the renderer's defaults. Materials
//! are named so several spheres can share one instance.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use lux_math::{Color, Vec3};
use lux_renderer::{Camera, Dielectric, HittableList, Lambertian, Material, Metal, Sphere};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::Scene;

/// Errors that can occur while loading or building a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    #[error("Invalid material '{name}': {reason}")]
    InvalidMaterial { name: String, reason: String },

    #[error("Invalid sphere #{index}: {reason}")]
    InvalidSphere { index: usize, reason: String },

    #[error("Sphere #{index} references unknown material '{name}'")]
    UnknownMaterial { index: usize, name: String },
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Camera block of a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraDescription {
    pub aspect_ratio: f64,
    pub image_width: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    /// Vertical field of view in degrees
    pub vfov: f64,
    pub look_from: [f64; 3],
    pub look_at: [f64; 3],
    pub vup: [f64; 3],
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self::from_camera(&Camera::default())
    }
}

impl CameraDescription {
    fn from_camera(camera: &Camera) -> Self {
        Self {
            aspect_ratio: camera.aspect_ratio,
            image_width: camera.image_width,
            samples_per_pixel: camera.samples_per_pixel,
            max_depth: camera.max_depth,
            vfov: camera.vfov,
            look_from: camera.look_from.to_array(),
            look_at: camera.look_at.to_array(),
            vup: camera.vup.to_array(),
        }
    }

    /// Build an initialized camera. Call [`CameraDescription::validate`] first.
    pub fn to_camera(&self) -> Camera {
        let mut camera = Camera::new()
            .with_aspect_ratio(self.aspect_ratio)
            .with_image_width(self.image_width)
            .with_quality(self.samples_per_pixel, self.max_depth)
            .with_vfov(self.vfov)
            .with_position(
                Vec3::from_array(self.look_from),
                Vec3::from_array(self.look_at),
                Vec3::from_array(self.vup),
            );
        camera.initialize();
        camera
    }

    pub fn validate(&self) -> SceneResult<()> {
        let invalid = |reason: &str| Err(SceneError::InvalidCamera(reason.to_string()));

        if self.image_width == 0 {
            return invalid("image width must be at least 1");
        }
        if self.samples_per_pixel == 0 {
            return invalid("samples per pixel must be at least 1");
        }
        if self.max_depth == 0 {
            return invalid("max depth must be at least 1");
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return invalid("aspect ratio must be a positive number");
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return invalid("vertical field of view must be between 0 and 180 degrees");
        }

        let look_from = Vec3::from_array(self.look_from);
        let look_at = Vec3::from_array(self.look_at);
        let vup = Vec3::from_array(self.vup);
        if !(look_from.is_finite() && look_at.is_finite() && vup.is_finite()) {
            return invalid("positions must be finite");
        }

        let view = look_from - look_at;
        if view.length_squared() == 0.0 {
            return invalid("look_from and look_at must differ");
        }
        if vup.cross(view).length_squared() == 0.0 {
            return invalid("up vector must not be parallel to the view direction");
        }

        Ok(())
    }
}

/// A named material in a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum MaterialDescription {
    /// Diffuse surface
    Lambertian { albedo: [f64; 3] },
    /// Reflective surface, `fuzz` in [0, 1] roughens the reflection
    Metal {
        albedo: [f64; 3],
        #[serde(default)]
        fuzz: f64,
    },
    /// Clear refractive surface such as glass or water
    Dielectric { refraction_index: f64 },
}

impl MaterialDescription {
    pub fn to_material(&self) -> Arc<dyn Material> {
        match *self {
            Self::Lambertian { albedo } => Arc::new(Lambertian::new(Color::from_array(albedo))),
            Self::Metal { albedo, fuzz } => Arc::new(Metal::new(Color::from_array(albedo), fuzz)),
            Self::Dielectric { refraction_index } => Arc::new(Dielectric::new(refraction_index)),
        }
    }

    pub fn validate(&self, name: &str) -> SceneResult<()> {
        let reason = match *self {
            Self::Lambertian { albedo } | Self::Metal { albedo, .. }
                if !albedo.iter().all(|c| c.is_finite() && *c >= 0.0) =>
            {
                Some("albedo components must be finite and non-negative")
            }
            Self::Metal { fuzz, .. } if !(0.0..=1.0).contains(&fuzz) => {
                Some("fuzz must be between 0 and 1")
            }
            Self::Dielectric { refraction_index }
                if !(refraction_index.is_finite() && refraction_index > 0.0) =>
            {
                Some("refraction index must be a positive number")
            }
            _ => None,
        };

        match reason {
            Some(reason) => Err(SceneError::InvalidMaterial {
                name: name.to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// A sphere in a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SphereDescription {
    pub center: [f64; 3],
    pub radius: f64,
    /// Name of an entry in the scene's material table
    pub material: String,
}

/// Everything needed to render: camera, material table and spheres.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraDescription,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDescription>,
    #[serde(default)]
    pub spheres: Vec<SphereDescription>,
}

impl SceneDescription {
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> SceneResult<Self> {
        let path = path.as_ref();
        log::info!("Loading scene from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the whole description before anything is built.
    pub fn validate(&self) -> SceneResult<()> {
        self.camera.validate()?;

        for (name, material) in &self.materials {
            material.validate(name)?;
        }

        for (index, sphere) in self.spheres.iter().enumerate() {
            if !Vec3::from_array(sphere.center).is_finite() {
                return Err(SceneError::InvalidSphere {
                    index,
                    reason: "center must be finite".to_string(),
                });
            }
            if !(sphere.radius.is_finite() && sphere.radius > 0.0) {
                return Err(SceneError::InvalidSphere {
                    index,
                    reason: "radius must be a positive number".to_string(),
                });
            }
            if !self.materials.contains_key(&sphere.material) {
                return Err(SceneError::UnknownMaterial {
                    index,
                    name: sphere.material.clone(),
                });
            }
        }

        Ok(())
    }

    /// Validate, then build the world and an initialized camera.
    ///
    /// Each named material is instantiated once and shared by every sphere
    /// that refers to it.
    pub fn build(&self) -> SceneResult<Scene> {
        self.validate()?;

        let materials: HashMap<&str, Arc<dyn Material>> = self
            .materials
            .iter()
            .map(|(name, desc)| (name.as_str(), desc.to_material()))
            .collect();

        let mut used = HashSet::new();
        let mut world = HittableList::new();
        for (index, sphere) in self.spheres.iter().enumerate() {
            let material = materials.get(sphere.material.as_str()).cloned().ok_or_else(|| {
                SceneError::UnknownMaterial {
                    index,
                    name: sphere.material.clone(),
                }
            })?;
            used.insert(sphere.material.as_str());
            world.add(Arc::new(Sphere::new(
                Vec3::from_array(sphere.center),
                sphere.radius,
                material,
            )));
        }

        for name in self.materials.keys() {
            if !used.contains(name.as_str()) {
                log::warn!("Material '{}' is not used by any sphere", name);
            }
        }

        let camera = self.camera.to_camera();
        log::info!(
            "Built scene: {} spheres, {} materials, {}x{} image",
            world.len(),
            materials.len(),
            camera.image_width,
            camera.image_height()
        );

        Ok(Scene { camera, world })
    }
}
