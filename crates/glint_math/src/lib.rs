//! glint math - vector types and ray/box primitives shared by every crate.
//!
//! Vectors come straight from `glam`; this crate adds the ray, the
//! axis-aligned bounding box and the slab test used by all spatial indices.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod axis;
mod ray;

pub use aabb::{slab_span, Aabb};
pub use axis::Axis;
pub use ray::Ray;
