//! Linear scan over every triangle.

use glint_math::Ray;

use crate::{Hit, Triangle};

/// Holds triangles and tests all of them. Also the leaf of every tree.
#[derive(Debug, Clone, Default)]
pub struct BruteForce {
    triangles: Vec<Triangle>,
}

impl BruteForce {
    pub fn build(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn intersect(&self, ray: &Ray, epsilon: f32) -> Option<Hit> {
        let mut min_t = f32::INFINITY;
        let mut normal = None;
        for triangle in &self.triangles {
            if let Some(t) = triangle.intersect(ray, epsilon) {
                if t < min_t {
                    min_t = t;
                    normal = Some(triangle.normal());
                }
            }
        }
        normal.map(|normal| Hit::new(min_t, normal))
    }
}
