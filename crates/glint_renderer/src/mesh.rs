//! Triangle mesh surface.
//!
//! A mesh is a triangle soup sharing one material, queried through the
//! spatial index chosen for it at construction.

use glint_core::{AccelKind, Material};
use glint_math::{Aabb, Ray, Vec3};

use crate::accel::{BuildConfig, SpatialIndex};
use crate::{Hit, Surface, Triangle};

/// A triangle mesh with its acceleration structure.
#[derive(Debug, Clone)]
pub struct Mesh {
    index: SpatialIndex,
    material: Material,
    triangle_count: usize,
}

impl Mesh {
    /// Build a mesh over `triangles` using the index `kind`.
    pub fn new(
        triangles: Vec<Triangle>,
        material: Material,
        kind: AccelKind,
        config: &BuildConfig,
    ) -> Self {
        let triangle_count = triangles.len();
        Self {
            index: SpatialIndex::build_with(kind, triangles, config),
            material,
            triangle_count,
        }
    }

    /// Build a mesh from a shared vertex list; every three entries of
    /// `indices` name one counterclockwise triangle. A trailing partial
    /// triangle is ignored.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of range for `vertices`. Scene descriptions
    /// are validated before they get here.
    pub fn from_indexed(
        vertices: &[Vec3],
        indices: &[usize],
        material: Material,
        kind: AccelKind,
        config: &BuildConfig,
    ) -> Self {
        let triangles = indices
            .chunks_exact(3)
            .map(|tri| Triangle::new(vertices[tri[0]], vertices[tri[1]], vertices[tri[2]]))
            .collect();
        Self::new(triangles, material, kind, config)
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    pub fn bounds(&self) -> Aabb {
        self.index.bounds()
    }
}

impl Surface for Mesh {
    fn material(&self) -> &Material {
        &self.material
    }

    #[inline]
    fn intersect(&self, ray: &Ray, epsilon: f32) -> Option<Hit> {
        self.index.intersect(ray, epsilon)
    }
}
