//! glint core - renderer-agnostic scene data.
//!
//! This crate provides:
//!
//! - **Shading data**: `Material`, `MaterialKind`, `PointLight`
//! - **Scene description**: the serde model of a scene file and its loader
//! - **Index selection**: `AccelKind`, the per-mesh spatial index choice
//!
//! # Example
//!
//! ```ignore
//! use glint_core::description::load_scene_description;
//!
//! let description = load_scene_description("scene.json")?;
//! println!("{} cameras, {} meshes",
//!     description.cameras.len(),
//!     description.meshes.len());
//! ```

pub mod description;
pub mod error;
pub mod light;
pub mod material;

// Re-export commonly used types
pub use description::{
    load_scene_description, AccelKind, CameraDescription, MeshDescription, SceneDescription,
    SphereDescription,
};
pub use error::{SceneError, SceneResult};
pub use light::PointLight;
pub use material::{Color, Material, MaterialKind};
