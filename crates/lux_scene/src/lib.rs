//! Lux scene - builds the world and camera the renderer consumes.
//!
//! This crate provides:
//!
//! - **Scene descriptions**: serde types for a JSON scene file with named,
//!   shared materials, spheres and a camera block
//! - **Validation**: configuration is checked here, before any rendering
//! - **A built-in scene**: ground plus three spheres in diffuse, glass and metal
//!
//! # Example
//!
//! ```ignore
//! use lux_scene::load_scene;
//!
//! let scene = load_scene("scene.json")?;
//! println!("Loaded {} spheres", scene.world.len());
//! ```

pub mod description;
pub mod scene;

pub use description::{
    CameraDescription, MaterialDescription, SceneDescription, SceneError, SceneResult,
    SphereDescription,
};
pub use scene::{default_scene, load_scene, Scene};
