//! glint renderer - deterministic recursive CPU ray tracing.
//!
//! Turns a [`Scene`] into 8-bit images:
//!
//! - Spatial indices over triangle meshes (brute force, bounding box, BVH,
//!   KD-tree) in [`accel`]
//! - Whitted-style shading with mirrors, Fresnel conductors and absorbing
//!   dielectrics in [`shading`]
//! - Tile-parallel frame rendering on a reusable thread pool, plus a
//!   per-pixel timing heatmap
//!
//! # Example
//!
//! ```ignore
//! use glint_renderer::{BuildConfig, Renderer, RenderSettings, Scene};
//!
//! let scene = Scene::from_description(&description, &BuildConfig::default())?;
//! let renderer = Renderer::new(RenderSettings::default())?;
//! for frame in renderer.render_scene(&scene) {
//!     frame.image.save(&frame.image_name)?;
//! }
//! ```

pub mod accel;
mod camera;
pub mod heatmap;
mod mesh;
mod renderer;
mod scene;
pub mod scheduler;
pub mod shading;
mod sphere;
mod surface;
pub mod tile;
mod triangle;

pub use accel::{BuildConfig, SpatialIndex};
pub use camera::{Camera, CameraBasis, NearPlane, PerspectiveCamera};
pub use mesh::Mesh;
pub use renderer::{ExecutionMode, Frame, RenderError, RenderSettings, Renderer};
pub use scene::{Scene, SceneHit};
pub use sphere::Sphere;
pub use surface::{Hit, Surface};
pub use triangle::Triangle;

/// Re-export the math types used throughout the public API
pub use glint_math::{Aabb, Axis, Ray, Vec3};
