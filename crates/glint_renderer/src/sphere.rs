//! Sphere primitive for ray tracing.

use glint_core::Material;
use glint_math::{Ray, Vec3};

use crate::{Hit, Surface};

/// An analytic sphere.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Material,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Surface for Sphere {
    fn material(&self) -> &Material {
        &self.material
    }

    /// Smallest positive root of `|o + t·d − c|² = r²`.
    ///
    /// A ray starting inside gets the exit point. The normal always points
    /// away from the center.
    fn intersect(&self, ray: &Ray, _epsilon: f32) -> Option<Hit> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in front of the origin
        let mut root = (h - sqrtd) / a;
        if root <= 0.0 {
            root = (h + sqrtd) / a;
            if root <= 0.0 {
                return None;
            }
        }

        let normal = (ray.at(root) - self.center).normalize();
        Some(Hit::new(root, normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere() -> Sphere {
        Sphere::new(Vec3::ZERO, 5.0, Material::default())
    }

    #[test]
    fn test_sphere_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 20.0), Vec3::NEG_Z);
        let hit = sphere().intersect(&ray, 0.0).unwrap();

        assert!((hit.t - 15.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_sphere_miss() {
        let ray = Ray::new(Vec3::new(6.0, 0.0, 20.0), Vec3::NEG_Z);
        assert_eq!(sphere().intersect(&ray, 0.0), None);

        // pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, 20.0), Vec3::Z);
        assert_eq!(sphere().intersect(&ray, 0.0), None);
    }

    #[test]
    fn test_sphere_from_inside_returns_exit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let hit = sphere().intersect(&ray, 0.0).unwrap();

        assert!((hit.t - 5.0).abs() < 1e-5);
        // outward, not flipped toward the ray
        assert!((hit.normal - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_sphere_tangent() {
        let ray = Ray::new(Vec3::new(5.0, 0.0, 10.0), Vec3::NEG_Z);
        let hit = sphere().intersect(&ray, 0.0).unwrap();

        assert_eq!(hit.t, 10.0);
        assert_eq!(hit.normal, Vec3::X);
    }

    #[test]
    fn test_unnormalized_direction() {
        // shadow rays are not normalized; t is in units of the direction
        let ray = Ray::new(Vec3::new(0.0, 0.0, 20.0), Vec3::new(0.0, 0.0, -30.0));
        let hit = sphere().intersect(&ray, 0.0).unwrap();
        assert!((hit.t - 0.5).abs() < 1e-6);
    }
}
