//! Render-ready scene: built surfaces, cameras and lights.

use glint_core::{Color, PointLight, SceneDescription, SceneResult};
use glint_math::{Ray, Vec3};

use crate::accel::BuildConfig;
use crate::{Camera, Mesh, PerspectiveCamera, Sphere, Surface};

/// Closest intersection over every surface in a scene.
#[derive(Clone, Copy)]
pub struct SceneHit<'a> {
    pub t: f32,
    /// Geometric normal as reported by the surface
    pub normal: Vec3,
    pub surface: &'a dyn Surface,
}

/// Everything a renderer reads while tracing. Immutable during a render.
pub struct Scene {
    pub cameras: Vec<Box<dyn Camera>>,
    pub surfaces: Vec<Box<dyn Surface>>,
    pub lights: Vec<PointLight>,
    pub ambient_light: Color,
    pub background_color: Color,
    /// Offset along the normal applied to secondary ray origins
    pub shadow_ray_epsilon: f32,
    /// Barycentric slack for triangle tests
    pub intersection_test_epsilon: f32,
    pub max_recursion_depth: u32,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            cameras: Vec::new(),
            surfaces: Vec::new(),
            lights: Vec::new(),
            ambient_light: Color::ZERO,
            background_color: Color::ZERO,
            shadow_ray_epsilon: 1e-3,
            intersection_test_epsilon: 1e-6,
            max_recursion_depth: 6,
        }
    }
}

impl Scene {
    /// Build surfaces and cameras from a scene description.
    ///
    /// The description is validated first, so dangling material or vertex
    /// indices are reported as errors instead of panicking during the build.
    pub fn from_description(desc: &SceneDescription, config: &BuildConfig) -> SceneResult<Self> {
        desc.validate()?;

        let mut surfaces: Vec<Box<dyn Surface>> =
            Vec::with_capacity(desc.spheres.len() + desc.meshes.len());

        for sphere in &desc.spheres {
            surfaces.push(Box::new(Sphere::new(
                sphere.center,
                sphere.radius,
                desc.materials[sphere.material],
            )));
        }

        for (i, mesh) in desc.meshes.iter().enumerate() {
            let start = std::time::Instant::now();
            let built = Mesh::from_indexed(
                &mesh.vertices,
                &mesh.indices,
                desc.materials[mesh.material],
                mesh.accel,
                config,
            );
            log::debug!(
                "Mesh {}: {} triangles, {:?} index built in {:?}",
                i,
                built.triangle_count(),
                mesh.accel,
                start.elapsed()
            );
            surfaces.push(Box::new(built));
        }

        let cameras = desc
            .cameras
            .iter()
            .map(|c| Box::new(PerspectiveCamera::from(c)) as Box<dyn Camera>)
            .collect();

        Ok(Self {
            cameras,
            surfaces,
            lights: desc.lights.clone(),
            ambient_light: desc.ambient_light,
            background_color: desc.background_color,
            shadow_ray_epsilon: desc.shadow_ray_epsilon,
            intersection_test_epsilon: desc.intersection_test_epsilon,
            max_recursion_depth: desc.max_recursion_depth,
        })
    }

    /// Closest hit over all surfaces. Ties keep the surface listed first.
    pub fn closest_hit(&self, ray: &Ray) -> Option<SceneHit<'_>> {
        let mut closest: Option<SceneHit<'_>> = None;
        let mut min_t = f32::INFINITY;

        for surface in &self.surfaces {
            if let Some(hit) = surface.intersect(ray, self.intersection_test_epsilon) {
                if hit.t < min_t {
                    min_t = hit.t;
                    closest = Some(SceneHit {
                        t: hit.t,
                        normal: hit.normal,
                        surface: surface.as_ref(),
                    });
                }
            }
        }

        closest
    }

    /// Whether nothing lies between `point` and the light.
    ///
    /// The shadow ray direction is the unnormalized vector to the light, so
    /// a hit with `t < 1` is in front of the light and blocks it, while
    /// `t >= 1` is behind the light and does not.
    pub fn light_visible(&self, point: Vec3, light: &PointLight) -> bool {
        let ray = Ray::new(point, light.position - point);
        !self.surfaces.iter().any(|surface| {
            surface
                .intersect(&ray, self.intersection_test_epsilon)
                .is_some_and(|hit| hit.t < 1.0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::{
        AccelKind, CameraDescription, Material, MeshDescription, SceneError, SphereDescription,
    };

    fn description() -> SceneDescription {
        SceneDescription {
            background_color: Color::new(10.0, 20.0, 30.0),
            ambient_light: Color::splat(25.0),
            shadow_ray_epsilon: 1e-3,
            intersection_test_epsilon: 1e-6,
            max_recursion_depth: 2,
            cameras: vec![CameraDescription {
                image_name: "test.png".to_string(),
                position: Vec3::new(0.0, 0.0, 20.0),
                gaze: Vec3::NEG_Z,
                up: Vec3::Y,
                near_plane: [-1.0, 1.0, -1.0, 1.0],
                near_distance: 1.0,
                resolution: [8, 8],
                num_samples: 1,
            }],
            lights: vec![PointLight::new(Vec3::new(0.0, 0.0, 100.0), Color::splat(1e6))],
            materials: vec![Material::default()],
            spheres: vec![SphereDescription {
                center: Vec3::ZERO,
                radius: 5.0,
                material: 0,
            }],
            meshes: vec![MeshDescription {
                vertices: vec![
                    Vec3::new(-10.0, -10.0, -10.0),
                    Vec3::new(10.0, -10.0, -10.0),
                    Vec3::new(0.0, 10.0, -10.0),
                ],
                indices: vec![0, 1, 2],
                material: 0,
                accel: AccelKind::BoundingBox,
            }],
        }
    }

    #[test]
    fn test_from_description() {
        let scene = Scene::from_description(&description(), &BuildConfig::default()).unwrap();

        assert_eq!(scene.cameras.len(), 1);
        assert_eq!(scene.surfaces.len(), 2);
        assert_eq!(scene.lights.len(), 1);
        assert_eq!(scene.max_recursion_depth, 2);
        assert_eq!(scene.cameras[0].resolution(), (8, 8));
    }

    #[test]
    fn test_from_description_rejects_bad_material() {
        let mut desc = description();
        desc.meshes[0].material = 3;
        let err = Scene::from_description(&desc, &BuildConfig::default()).err();
        assert!(matches!(err, Some(SceneError::MissingMaterial { index: 3, .. })));
    }

    #[test]
    fn test_closest_hit_picks_nearest_surface() {
        let scene = Scene::from_description(&description(), &BuildConfig::default()).unwrap();

        let ray = Ray::new(Vec3::new(0.0, 0.0, 20.0), Vec3::NEG_Z);
        let hit = scene.closest_hit(&ray).unwrap();
        assert!((hit.t - 15.0).abs() < 1e-5);

        // passes beside the sphere and reaches the triangle
        let ray = Ray::new(Vec3::new(0.0, -7.0, 20.0), Vec3::NEG_Z);
        let hit = scene.closest_hit(&ray).unwrap();
        assert!((hit.t - 30.0).abs() < 1e-4);
        assert!((hit.normal - Vec3::Z).length() < 1e-6);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 20.0), Vec3::Z);
        assert!(scene.closest_hit(&ray).is_none());
    }

    #[test]
    fn test_shadow_ray_convention() {
        let blocker = Sphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0, Material::default());
        let scene = Scene {
            surfaces: vec![Box::new(blocker)],
            ..Default::default()
        };

        // blocker between point and light: t ~ 0.45 along the unnormalized ray
        let near_light = PointLight::new(Vec3::new(0.0, 0.0, 20.0), Color::ONE);
        assert!(!scene.light_visible(Vec3::ZERO, &near_light));

        // light in front of the blocker: the hit lies beyond t = 1
        let close_light = PointLight::new(Vec3::new(0.0, 0.0, 5.0), Color::ONE);
        assert!(scene.light_visible(Vec3::ZERO, &close_light));

        // light exactly on the blocker surface: t == 1 does not block
        let touching = PointLight::new(Vec3::new(0.0, 0.0, 9.0), Color::ONE);
        assert!(scene.light_visible(Vec3::ZERO, &touching));
    }
}
