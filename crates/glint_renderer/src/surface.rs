//! Surface trait and the hit record shared by every intersection routine.

use glint_core::Material;
use glint_math::{Ray, Vec3};

/// Closest intersection found along a ray.
///
/// `normal` is the geometric normal of the surface, not flipped toward the
/// ray; shading decides which side it is on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Surface normal at the intersection (unit length)
    pub normal: Vec3,
}

impl Hit {
    #[inline]
    pub fn new(t: f32, normal: Vec3) -> Self {
        Self { t, normal }
    }

    /// The closer of two optional hits. Ties keep `a`.
    #[inline]
    pub fn closer(a: Option<Hit>, b: Option<Hit>) -> Option<Hit> {
        match (a, b) {
            (Some(a), Some(b)) => Some(if b.t < a.t { b } else { a }),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

/// Trait for objects that can be hit by rays.
///
/// Surfaces are immutable once built and are read concurrently from every
/// render thread.
pub trait Surface: Send + Sync {
    /// Material applied to the whole surface.
    fn material(&self) -> &Material;

    /// Closest hit strictly in front of the ray origin.
    fn intersect(&self, ray: &Ray, epsilon: f32) -> Option<Hit>;
}
