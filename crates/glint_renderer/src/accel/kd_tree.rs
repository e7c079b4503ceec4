//! KD-tree acceleration structure.
//!
//! Space is cut by axis-aligned planes, rotating x → y → z with depth. A
//! plane is placed where it splits the total triangle area in half, judged by
//! triangle centroids. Triangles crossing a plane are stored on both sides,
//! so traversal can stop at the first hit found before the plane.

use glint_math::{Aabb, Axis, Ray};

use super::bounding_box::enclosing_box;
use super::{BoundingBox, BruteForce};
use crate::{Hit, Triangle};

/// Top level of a KD-tree.
#[derive(Debug, Clone)]
pub enum KdTree {
    /// Too few triangles to be worth a tree.
    Flat(BoundingBox),
    /// Scene box plus the root node.
    Tree { bounds: Aabb, root: KdNode },
}

/// A KD-tree node. Each split exclusively owns both children.
#[derive(Debug, Clone)]
pub enum KdNode {
    Leaf(BruteForce),
    Split {
        axis: Axis,
        plane: f32,
        /// Triangles with any vertex at or below the plane
        left: Box<KdNode>,
        /// Triangles with any vertex above the plane
        right: Box<KdNode>,
    },
}

impl KdTree {
    /// Build a tree when there are more than `min_triangles` triangles,
    /// leaves holding at most `leaf_size` triangles where possible.
    pub fn build(triangles: Vec<Triangle>, min_triangles: usize, leaf_size: usize) -> Self {
        if triangles.len() <= min_triangles {
            return KdTree::Flat(BoundingBox::build(triangles));
        }

        let bounds = enclosing_box(&triangles);
        let root = KdNode::build(triangles, bounds.longest_axis(), leaf_size);
        KdTree::Tree { bounds, root }
    }

    pub fn intersect(&self, ray: &Ray, epsilon: f32) -> Option<Hit> {
        match self {
            KdTree::Flat(bounding_box) => bounding_box.intersect(ray, epsilon),
            KdTree::Tree { bounds, root } => {
                let max_t = bounds.exit_distance(ray)?;
                root.intersect(ray, epsilon, max_t)
            }
        }
    }

    pub fn bounds(&self) -> &Aabb {
        match self {
            KdTree::Flat(bounding_box) => bounding_box.bounds(),
            KdTree::Tree { bounds, .. } => bounds,
        }
    }

    pub fn root(&self) -> Option<&KdNode> {
        match self {
            KdTree::Flat(_) => None,
            KdTree::Tree { root, .. } => Some(root),
        }
    }
}

impl KdNode {
    pub fn build(triangles: Vec<Triangle>, axis: Axis, leaf_size: usize) -> Self {
        // a plane needs two centroids to sit between
        if triangles.len() <= leaf_size.max(1) {
            return KdNode::Leaf(BruteForce::build(triangles));
        }

        let plane = area_bisecting_plane(&triangles, axis);
        let (left, right) = split_by_plane(&triangles, axis, plane);

        // a side that did not shrink would recurse forever
        if left.len() == triangles.len() || right.len() == triangles.len() {
            return KdNode::Leaf(BruteForce::build(triangles));
        }

        KdNode::Split {
            axis,
            plane,
            left: Box::new(KdNode::build(left, axis.next(), leaf_size)),
            right: Box::new(KdNode::build(right, axis.next(), leaf_size)),
        }
    }

    /// Closest hit below this node. Far children whose plane crossing lies
    /// beyond `max_t` are not visited.
    pub fn intersect(&self, ray: &Ray, epsilon: f32, max_t: f32) -> Option<Hit> {
        let (axis, plane, left, right) = match self {
            KdNode::Leaf(triangles) => return triangles.intersect(ray, epsilon),
            KdNode::Split {
                axis,
                plane,
                left,
                right,
            } => (*axis, *plane, left, right),
        };

        let origin = axis.of(ray.origin);
        let direction = axis.of(ray.direction);

        let (near, far) = if direction > 0.0 {
            if origin > plane {
                // already past the plane, moving away from it
                return right.intersect(ray, epsilon, max_t);
            }
            (left, right)
        } else if direction < 0.0 {
            if origin <= plane {
                return left.intersect(ray, epsilon, max_t);
            }
            (right, left)
        } else {
            // parallel to the plane, never crosses it
            let side = if origin <= plane { left } else { right };
            return side.intersect(ray, epsilon, max_t);
        };

        let plane_t = (plane - origin) / direction;
        match near.intersect(ray, epsilon, max_t) {
            Some(hit) if hit.t <= plane_t => Some(hit),
            near_hit if plane_t > max_t => near_hit,
            near_hit => Hit::closer(near_hit, far.intersect(ray, epsilon, max_t)),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            KdNode::Leaf(_) => 1,
            KdNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            KdNode::Leaf(_) => 1,
            KdNode::Split { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Triangle references over all leaves; duplicates counted each time.
    pub fn stored_triangles(&self) -> usize {
        match self {
            KdNode::Leaf(triangles) => triangles.triangles().len(),
            KdNode::Split { left, right, .. } => {
                left.stored_triangles() + right.stored_triangles()
            }
        }
    }
}

/// Plane on `axis` that splits the summed triangle area roughly in half.
///
/// Triangles are ordered by centroid and their areas accumulated until half
/// the total is reached; the plane sits midway between that centroid and
/// the next one. Needs at least two triangles.
fn area_bisecting_plane(triangles: &[Triangle], axis: Axis) -> f32 {
    let mut data: Vec<(f32, f32)> = triangles
        .iter()
        .map(|t| (axis.of(t.centroid()), t.area()))
        .collect();
    data.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let total_area: f32 = data.iter().map(|&(_, area)| area).sum();
    let mut area = 0.0;
    let mut next = 0;
    while next < data.len() && area < total_area / 2.0 {
        area += data[next].1;
        next += 1;
    }

    // keep both neighbours in range for zero-area and lopsided inputs
    let next = next.clamp(1, data.len() - 1);
    (data[next - 1].0 + data[next].0) / 2.0
}

/// Split triangles by `plane`. A triangle with vertices on both sides goes
/// into both lists.
fn split_by_plane(
    triangles: &[Triangle],
    axis: Axis,
    plane: f32,
) -> (Vec<Triangle>, Vec<Triangle>) {
    let mut left = Vec::with_capacity(triangles.len() / 2 + 1);
    let mut right = Vec::with_capacity(triangles.len() / 2 + 1);
    for triangle in triangles {
        if triangle.touches_below(axis, plane) {
            left.push(*triangle);
        }
        if triangle.touches_above(axis, plane) {
            right.push(*triangle);
        }
    }
    (left, right)
}
