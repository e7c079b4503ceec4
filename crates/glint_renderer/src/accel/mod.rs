//! Spatial acceleration structures for closest ray/triangle queries.
//!
//! Four interchangeable variants answer the same question, "which triangle
//! does this ray hit first", with different build and query costs:
//!
//! - [`BruteForce`]: test every triangle
//! - [`BoundingBox`]: one box test in front of the scan
//! - [`Bvh`]: midpoint-split bounding volume hierarchy
//! - [`KdTree`]: area-balanced KD-tree
//!
//! All of them are built once from an owned triangle list and are read-only
//! afterwards.

mod bounding_box;
mod brute_force;
mod bvh;
mod kd_tree;

pub use bounding_box::BoundingBox;
pub use brute_force::BruteForce;
pub use bvh::{Bvh, BvhNode};
pub use kd_tree::{KdNode, KdTree};

use glint_core::AccelKind;
use glint_math::{Aabb, Ray};
use serde::{Deserialize, Serialize};

use crate::{Hit, Triangle};

/// Tuning knobs for index construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// BVH nodes with at most this many triangles become leaves
    pub bvh_leaf_size: usize,
    /// KD nodes with at most this many triangles become leaves
    pub kd_leaf_size: usize,
    /// Meshes this small get a bounding box instead of a KD-tree
    pub kd_min_triangles: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            bvh_leaf_size: 8,
            kd_leaf_size: 8,
            kd_min_triangles: 128,
        }
    }
}

/// One of the acceleration structures, chosen per mesh.
#[derive(Debug, Clone)]
pub enum SpatialIndex {
    BruteForce(BruteForce),
    BoundingBox(BoundingBox),
    Bvh(Bvh),
    KdTree(KdTree),
}

impl SpatialIndex {
    /// Build with the default [`BuildConfig`].
    pub fn build(kind: AccelKind, triangles: Vec<Triangle>) -> Self {
        Self::build_with(kind, triangles, &BuildConfig::default())
    }

    pub fn build_with(kind: AccelKind, triangles: Vec<Triangle>, config: &BuildConfig) -> Self {
        let count = triangles.len();
        let index = match kind {
            AccelKind::BruteForce => SpatialIndex::BruteForce(BruteForce::build(triangles)),
            AccelKind::BoundingBox => SpatialIndex::BoundingBox(BoundingBox::build(triangles)),
            AccelKind::Bvh => SpatialIndex::Bvh(Bvh::build(triangles, config.bvh_leaf_size)),
            AccelKind::KdTree => SpatialIndex::KdTree(KdTree::build(
                triangles,
                config.kd_min_triangles,
                config.kd_leaf_size,
            )),
        };

        match &index {
            SpatialIndex::Bvh(bvh) => log::debug!(
                "Built BVH over {} triangles: depth {}, {} leaves",
                count,
                bvh.depth(),
                bvh.leaf_count()
            ),
            SpatialIndex::KdTree(KdTree::Tree { root, .. }) => log::debug!(
                "Built KD-tree over {} triangles: depth {}, {} leaves, {} stored references",
                count,
                root.depth(),
                root.leaf_count(),
                root.stored_triangles()
            ),
            _ => log::debug!("Built {:?} index over {} triangles", index.kind(), count),
        }

        index
    }

    pub fn kind(&self) -> AccelKind {
        match self {
            SpatialIndex::BruteForce(_) => AccelKind::BruteForce,
            SpatialIndex::BoundingBox(_) => AccelKind::BoundingBox,
            SpatialIndex::Bvh(_) => AccelKind::Bvh,
            SpatialIndex::KdTree(_) => AccelKind::KdTree,
        }
    }

    /// Box around every triangle; a brute-force index computes it on demand.
    pub fn bounds(&self) -> Aabb {
        match self {
            SpatialIndex::BruteForce(bf) => bounding_box::enclosing_box(bf.triangles()),
            SpatialIndex::BoundingBox(bb) => *bb.bounds(),
            SpatialIndex::Bvh(bvh) => *bvh.bounds(),
            SpatialIndex::KdTree(kd) => *kd.bounds(),
        }
    }

    /// Closest hit in front of the ray origin.
    #[inline]
    pub fn intersect(&self, ray: &Ray, epsilon: f32) -> Option<Hit> {
        match self {
            SpatialIndex::BruteForce(bf) => bf.intersect(ray, epsilon),
            SpatialIndex::BoundingBox(bb) => bb.intersect(ray, epsilon),
            SpatialIndex::Bvh(bvh) => bvh.intersect(ray, epsilon),
            SpatialIndex::KdTree(kd) => kd.intersect(ray, epsilon),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_point(rng: &mut StdRng, extent: f32) -> Vec3 {
        Vec3::new(
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
        )
    }

    fn random_triangles(rng: &mut StdRng, count: usize) -> Vec<Triangle> {
        (0..count)
            .map(|_| {
                let center = random_point(rng, 10.0);
                Triangle::new(
                    center + random_point(rng, 1.5),
                    center + random_point(rng, 1.5),
                    center + random_point(rng, 1.5),
                )
            })
            .collect()
    }

    fn random_rays(rng: &mut StdRng, count: usize) -> Vec<Ray> {
        (0..count)
            .map(|_| {
                let origin = random_point(rng, 20.0);
                let target = random_point(rng, 10.0);
                Ray::new(origin, (target - origin).normalize())
            })
            .collect()
    }

    fn assert_matches_oracle(triangles: Vec<Triangle>, rays: &[Ray], config: &BuildConfig) {
        let oracle = SpatialIndex::build(AccelKind::BruteForce, triangles.clone());
        let indices: Vec<SpatialIndex> = AccelKind::ALL
            .iter()
            .map(|&kind| SpatialIndex::build_with(kind, triangles.clone(), config))
            .collect();

        let mut hits = 0;
        for ray in rays {
            let expected = oracle.intersect(ray, 0.0);
            hits += expected.is_some() as usize;
            for index in &indices {
                let got = index.intersect(ray, 0.0);
                match (expected, got) {
                    (None, None) => {}
                    (Some(e), Some(g)) => {
                        assert!(
                            (e.t - g.t).abs() < 1e-4,
                            "{:?}: t {} vs oracle {}",
                            index.kind(),
                            g.t,
                            e.t
                        );
                        assert!(
                            (e.normal - g.normal).abs().max_element() < 1e-4,
                            "{:?}: normal {} vs oracle {}",
                            index.kind(),
                            g.normal,
                            e.normal
                        );
                    }
                    _ => panic!(
                        "{:?} disagrees with brute force: {:?} vs {:?}",
                        index.kind(),
                        got,
                        expected
                    ),
                }
            }
        }
        // make sure the comparison exercised actual hits
        assert!(hits > rays.len() / 10);
    }

    #[test]
    fn test_indices_agree_with_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let triangles = random_triangles(&mut rng, 400);
        let rays = random_rays(&mut rng, 500);
        assert_matches_oracle(triangles, &rays, &BuildConfig::default());
    }

    #[test]
    fn test_deep_trees_agree_with_brute_force() {
        let mut rng = StdRng::seed_from_u64(42);
        let triangles = random_triangles(&mut rng, 200);
        let rays = random_rays(&mut rng, 400);
        let config = BuildConfig {
            bvh_leaf_size: 1,
            kd_leaf_size: 2,
            kd_min_triangles: 0,
        };
        assert_matches_oracle(triangles, &rays, &config);
    }

    #[test]
    fn test_kd_tree_kind_falls_back_below_threshold() {
        let mut rng = StdRng::seed_from_u64(3);
        let index = SpatialIndex::build(AccelKind::KdTree, random_triangles(&mut rng, 64));
        assert!(matches!(index, SpatialIndex::KdTree(KdTree::Flat(_))));
        assert_eq!(index.kind(), AccelKind::KdTree);

        let index = SpatialIndex::build(AccelKind::KdTree, random_triangles(&mut rng, 129));
        assert!(matches!(index, SpatialIndex::KdTree(KdTree::Tree { .. })));
    }

    #[test]
    fn test_bounds_contain_every_vertex() {
        let mut rng = StdRng::seed_from_u64(11);
        let triangles = random_triangles(&mut rng, 150);
        for kind in AccelKind::ALL {
            let index = SpatialIndex::build(kind, triangles.clone());
            let bounds = index.bounds();
            for v in triangles.iter().flat_map(|t| t.vertices()) {
                assert!(bounds.contains(v), "{:?} box misses {}", kind, v);
            }
        }
    }

    #[test]
    fn test_empty_index_never_hits() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        for kind in AccelKind::ALL {
            let index = SpatialIndex::build(kind, Vec::new());
            assert!(!index.bounds().hit(&ray));
            assert_eq!(index.intersect(&ray, 1e-6), None);
        }
    }

    #[test]
    fn test_build_config_defaults() {
        let config = BuildConfig::default();
        assert_eq!(config.bvh_leaf_size, 8);
        assert_eq!(config.kd_leaf_size, 8);
        assert_eq!(config.kd_min_triangles, 128);
    }
}
