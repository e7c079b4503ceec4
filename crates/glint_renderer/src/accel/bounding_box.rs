//! A single bounding box guarding a linear scan.

use glint_math::{Aabb, Ray};

use super::BruteForce;
use crate::{Hit, Triangle};

/// Rejects rays that miss the box around all triangles before scanning them.
#[derive(Debug, Clone)]
pub struct BoundingBox {
    bounds: Aabb,
    triangles: BruteForce,
}

impl BoundingBox {
    pub fn build(triangles: Vec<Triangle>) -> Self {
        Self {
            bounds: enclosing_box(&triangles),
            triangles: BruteForce::build(triangles),
        }
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn triangles(&self) -> &[Triangle] {
        self.triangles.triangles()
    }

    pub fn intersect(&self, ray: &Ray, epsilon: f32) -> Option<Hit> {
        if self.bounds.hit(ray) {
            self.triangles.intersect(ray, epsilon)
        } else {
            None
        }
    }

    /// Distance at which the ray enters the box; `Some(0.0)` from inside.
    pub fn entry_distance(&self, ray: &Ray) -> Option<f32> {
        self.bounds.entry_distance(ray)
    }
}

/// Box around every vertex of `triangles`.
pub(crate) fn enclosing_box(triangles: &[Triangle]) -> Aabb {
    Aabb::enclosing(triangles.iter().flat_map(|t| t.vertices()))
}
