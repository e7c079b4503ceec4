//! Serde model of a scene file.
//!
//! A scene file is a single JSON document. Everything except the cameras,
//! materials and geometry has a sensible default, so a minimal file only
//! names what it renders:
//!
//! ```json
//! {
//!   "cameras": [{ "image_name": "out.png", "position": [0, 0, 20],
//!                 "gaze": [0, 0, -1], "up": [0, 1, 0],
//!                 "near_plane": [-1, 1, -1, 1], "near_distance": 1,
//!                 "resolution": [400, 400] }],
//!   "materials": [{ "diffuse": [1, 0, 0] }],
//!   "lights": [{ "position": [0, 0, 100], "intensity": [1e6, 1e6, 1e6] }],
//!   "spheres": [{ "center": [0, 0, 0], "radius": 5, "material": 0 }]
//! }
//! ```

use std::path::Path;

use glint_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::{Color, Material, PointLight, SceneError, SceneResult};

fn default_shadow_ray_epsilon() -> f32 {
    1e-3
}

fn default_intersection_test_epsilon() -> f32 {
    1e-6
}

fn default_max_recursion_depth() -> u32 {
    6
}

fn default_num_samples() -> u32 {
    1
}

/// Which spatial index a mesh builds over its triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccelKind {
    /// Linear scan over every triangle.
    BruteForce,
    /// Single bounding box in front of a linear scan.
    BoundingBox,
    /// Bounding volume hierarchy.
    #[default]
    Bvh,
    /// KD-tree with area-balanced split planes.
    KdTree,
}

impl AccelKind {
    pub const ALL: [AccelKind; 4] = [
        AccelKind::BruteForce,
        AccelKind::BoundingBox,
        AccelKind::Bvh,
        AccelKind::KdTree,
    ];
}

/// Perspective camera as written in the scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    /// Output file name for this camera's image
    pub image_name: String,
    pub position: Vec3,
    pub gaze: Vec3,
    pub up: Vec3,
    /// Near plane rectangle: left, right, bottom, top
    pub near_plane: [f32; 4],
    pub near_distance: f32,
    /// Width and height in pixels
    pub resolution: [u32; 2],
    #[serde(default = "default_num_samples")]
    pub num_samples: u32,
}

/// Analytic sphere referencing a material by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereDescription {
    pub center: Vec3,
    pub radius: f32,
    pub material: usize,
}

/// Indexed triangle mesh. Every three entries of `indices` form one
/// counterclockwise triangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshDescription {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<usize>,
    pub material: usize,
    #[serde(default)]
    pub accel: AccelKind,
}

/// A complete scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub background_color: Color,
    #[serde(default)]
    pub ambient_light: Color,
    #[serde(default = "default_shadow_ray_epsilon")]
    pub shadow_ray_epsilon: f32,
    #[serde(default = "default_intersection_test_epsilon")]
    pub intersection_test_epsilon: f32,
    #[serde(default = "default_max_recursion_depth")]
    pub max_recursion_depth: u32,
    pub cameras: Vec<CameraDescription>,
    #[serde(default)]
    pub lights: Vec<PointLight>,
    pub materials: Vec<Material>,
    #[serde(default)]
    pub spheres: Vec<SphereDescription>,
    #[serde(default)]
    pub meshes: Vec<MeshDescription>,
}

impl SceneDescription {
    /// Parse and validate a scene from a JSON string.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let description: SceneDescription = serde_json::from_str(json)?;
        description.validate()?;
        Ok(description)
    }

    /// Check cross references and numeric constraints the type system
    /// cannot express.
    pub fn validate(&self) -> SceneResult<()> {
        check_epsilon("shadow_ray_epsilon", self.shadow_ray_epsilon)?;
        check_epsilon("intersection_test_epsilon", self.intersection_test_epsilon)?;

        let material_count = self.materials.len();
        for (i, sphere) in self.spheres.iter().enumerate() {
            if sphere.material >= material_count {
                return Err(SceneError::MissingMaterial {
                    owner: format!("Sphere {}", i),
                    index: sphere.material,
                    count: material_count,
                });
            }
        }

        for (i, mesh) in self.meshes.iter().enumerate() {
            if mesh.material >= material_count {
                return Err(SceneError::MissingMaterial {
                    owner: format!("Mesh {}", i),
                    index: mesh.material,
                    count: material_count,
                });
            }
            if mesh.indices.is_empty() {
                return Err(SceneError::EmptyMesh { mesh: i });
            }
            if mesh.indices.len() % 3 != 0 {
                return Err(SceneError::RaggedIndices {
                    mesh: i,
                    count: mesh.indices.len(),
                });
            }
            if let Some(&index) = mesh.indices.iter().find(|&&v| v >= mesh.vertices.len()) {
                return Err(SceneError::VertexOutOfRange {
                    mesh: i,
                    index,
                    count: mesh.vertices.len(),
                });
            }
        }

        if self.cameras.is_empty() {
            log::warn!("Scene has no cameras, nothing will be rendered");
        }

        Ok(())
    }

    /// Number of triangles over all meshes.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len() / 3).sum()
    }
}

fn check_epsilon(name: &'static str, value: f32) -> SceneResult<()> {
    // NaN fails this comparison too
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SceneError::NegativeEpsilon { name, value })
    }
}

/// Load and validate a scene file from disk.
pub fn load_scene_description<P: AsRef<Path>>(path: P) -> SceneResult<SceneDescription> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let description = SceneDescription::from_json_str(&json)?;

    log::info!(
        "Loaded {}: {} cameras, {} lights, {} spheres, {} meshes ({} triangles)",
        path.display(),
        description.cameras.len(),
        description.lights.len(),
        description.spheres.len(),
        description.meshes.len(),
        description.triangle_count()
    );

    Ok(description)
}
