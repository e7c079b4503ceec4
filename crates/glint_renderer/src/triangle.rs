//! Triangle primitive for ray tracing.
//!
//! Uses Cramer's rule on the barycentric system
//! `o + t·d = v1 + β(v2 − v1) + γ(v3 − v1)`.

use glint_math::{Axis, Mat3, Ray, Vec3};

/// A triangle with counterclockwise (front-facing) vertex order.
///
/// The unit normal is computed once at construction; a zero-area triangle
/// gets a NaN normal and is never reported as hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    v1: Vec3,
    v2: Vec3,
    v3: Vec3,
    normal: Vec3,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v1: Vec3, v2: Vec3, v3: Vec3) -> Self {
        let normal = (v2 - v1).cross(v3 - v2).normalize();
        Self { v1, v2, v3, normal }
    }

    #[inline]
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v1, self.v2, self.v3]
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn area(&self) -> f32 {
        0.5 * (self.v2 - self.v1).cross(self.v3 - self.v1).length()
    }

    pub fn centroid(&self) -> Vec3 {
        (self.v1 + self.v2 + self.v3) / 3.0
    }

    /// Whether any vertex lies on the low side of (or on) `plane`.
    #[inline]
    pub fn touches_below(&self, axis: Axis, plane: f32) -> bool {
        self.vertices().iter().any(|&v| axis.of(v) <= plane)
    }

    /// Whether any vertex lies strictly above `plane`.
    #[inline]
    pub fn touches_above(&self, axis: Axis, plane: f32) -> bool {
        self.vertices().iter().any(|&v| axis.of(v) > plane)
    }

    /// Parametric distance to the hit point, if the ray hits in front of
    /// its origin.
    ///
    /// `epsilon` widens the accepted barycentric range on every edge so
    /// that rays grazing a shared edge hit one of the two triangles instead
    /// of slipping between them.
    pub fn intersect(&self, ray: &Ray, epsilon: f32) -> Option<f32> {
        let edge_b = self.v1 - self.v2;
        let edge_c = self.v1 - self.v3;
        let rhs = self.v1 - ray.origin;

        // degenerate triangles give det_a == 0; the NaN/inf results fail the
        // range checks below or are discarded by the caller's `t < best`
        let det_a = Mat3::from_cols(ray.direction, edge_b, edge_c).determinant();

        let t = Mat3::from_cols(rhs, edge_b, edge_c).determinant() / det_a;
        if t <= 0.0 {
            return None;
        }

        let beta = Mat3::from_cols(ray.direction, rhs, edge_c).determinant() / det_a;
        if beta < -epsilon || beta > 1.0 + epsilon {
            return None;
        }

        let gamma = Mat3::from_cols(ray.direction, edge_b, rhs).determinant() / det_a;
        if gamma < -epsilon || beta + gamma > 1.0 + epsilon {
            return None;
        }

        Some(t)
    }
}
