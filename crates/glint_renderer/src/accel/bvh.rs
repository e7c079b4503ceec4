//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree of boxes built by midpoint splits. Each node owns its two
//! children outright, so a built tree is plain immutable data and can be
//! shared across render threads.

use glint_math::{Aabb, Axis, Ray};

use super::bounding_box::enclosing_box;
use super::BruteForce;
use crate::{Hit, Triangle};

/// BVH node: its box plus either two children or a leaf of triangles.
#[derive(Debug, Clone)]
pub struct Bvh {
    bounds: Aabb,
    node: BvhNode,
}

/// Contents of a BVH node.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Few enough triangles to scan, or no axis separates them.
    Leaf(BruteForce),
    /// Internal node with two children.
    Branch { left: Box<Bvh>, right: Box<Bvh> },
}

impl Bvh {
    /// Recursive BVH construction.
    ///
    /// Sets of at most `leaf_size` triangles become leaves. Larger sets are
    /// split at the box midpoint, trying the longest axis first and falling
    /// back to the others when every triangle lands on one side.
    pub fn build(triangles: Vec<Triangle>, leaf_size: usize) -> Self {
        let bounds = enclosing_box(&triangles);

        if triangles.len() <= leaf_size {
            return Self::leaf(bounds, triangles);
        }

        for axis in bounds.axes_by_extent() {
            let (low, high) = split_at_midpoint(&triangles, axis, bounds.midpoint(axis));
            if !low.is_empty() && !high.is_empty() {
                return Self {
                    bounds,
                    node: BvhNode::Branch {
                        left: Box::new(Self::build(low, leaf_size)),
                        right: Box::new(Self::build(high, leaf_size)),
                    },
                };
            }
        }

        Self::leaf(bounds, triangles)
    }

    fn leaf(bounds: Aabb, triangles: Vec<Triangle>) -> Self {
        Self {
            bounds,
            node: BvhNode::Leaf(BruteForce::build(triangles)),
        }
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn node(&self) -> &BvhNode {
        &self.node
    }

    pub fn intersect(&self, ray: &Ray, epsilon: f32) -> Option<Hit> {
        if self.bounds.hit(ray) {
            self.intersect_children(ray, epsilon)
        } else {
            None
        }
    }

    /// Traverse below a node whose own box is already known to be hit.
    ///
    /// The nearer child is searched first. The farther child can only hold
    /// a closer hit if the near hit lies beyond the point where the ray
    /// enters the far box.
    fn intersect_children(&self, ray: &Ray, epsilon: f32) -> Option<Hit> {
        let (left, right) = match &self.node {
            BvhNode::Leaf(triangles) => return triangles.intersect(ray, epsilon),
            BvhNode::Branch { left, right } => (left, right),
        };

        let (near, far, far_entry) = match (
            left.bounds.entry_distance(ray),
            right.bounds.entry_distance(ray),
        ) {
            (None, None) => return None,
            (Some(_), None) => return left.intersect_children(ray, epsilon),
            (None, Some(_)) => return right.intersect_children(ray, epsilon),
            (Some(t_left), Some(t_right)) if t_left < t_right => (left, right, t_right),
            (Some(t_left), Some(_)) => (right, left, t_left),
        };

        match near.intersect_children(ray, epsilon) {
            None => far.intersect_children(ray, epsilon),
            Some(hit) if hit.t <= far_entry => Some(hit),
            near_hit => Hit::closer(near_hit, far.intersect_children(ray, epsilon)),
        }
    }

    /// Longest root-to-leaf path, counting the root as 1.
    pub fn depth(&self) -> usize {
        match &self.node {
            BvhNode::Leaf(_) => 1,
            BvhNode::Branch { left, right } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match &self.node {
            BvhNode::Leaf(_) => 1,
            BvhNode::Branch { left, right } => left.leaf_count() + right.leaf_count(),
        }
    }
}

/// Partition triangles around `middle` on `axis`.
///
/// Triangles entirely below go low, entirely above go high. Triangles
/// touching the midpoint alternate between the two sides, starting high,
/// which keeps the tree balanced when many of them straddle.
fn split_at_midpoint(
    triangles: &[Triangle],
    axis: Axis,
    middle: f32,
) -> (Vec<Triangle>, Vec<Triangle>) {
    let mut low = Vec::new();
    let mut high = Vec::new();
    let mut to_low = false;

    for triangle in triangles {
        let coords = triangle.vertices().map(|v| axis.of(v));
        if coords.iter().all(|&c| c < middle) {
            low.push(*triangle);
        } else if coords.iter().all(|&c| c > middle) {
            high.push(*triangle);
        } else {
            if to_low {
                low.push(*triangle);
            } else {
                high.push(*triangle);
            }
            to_low = !to_low;
        }
    }

    (low, high)
}
