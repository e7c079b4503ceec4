//! Surface materials.
//!
//! Every material carries Blinn-Phong coefficients for direct lighting.
//! `MaterialKind` selects what happens after that: nothing, a mirror bounce,
//! a Fresnel-weighted conductor bounce, or refraction through a dielectric.

use glint_math::Vec3;
use serde::{Deserialize, Serialize};

/// Color type alias (RGB radiance, 0-255 scale after shading)
pub type Color = Vec3;

/// Secondary-ray behaviour of a material.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialKind {
    /// Direct lighting only.
    #[default]
    Default,

    /// Perfect reflector scaled by a constant per-channel reflectance.
    Mirror { mirror_reflectance: Color },

    /// Metal: reflection weighted by the conductor Fresnel term.
    Conductor {
        mirror_reflectance: Color,
        refraction_index: f32,
        absorption_index: f32,
    },

    /// Transparent medium with Beer-Lambert absorption.
    Dielectric {
        absorption_coefficient: Color,
        refraction_index: f32,
    },
}

/// A surface material. Immutable once the scene is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub phong_exponent: f32,
    pub kind: MaterialKind,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Color::ONE,
            diffuse: Color::ONE,
            specular: Color::ONE,
            phong_exponent: 1.0,
            kind: MaterialKind::Default,
        }
    }
}

impl Material {
    /// Create a plain Blinn-Phong material.
    pub fn new(ambient: Color, diffuse: Color, specular: Color, phong_exponent: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            phong_exponent,
            kind: MaterialKind::Default,
        }
    }

    /// Turn this material into a mirror.
    pub fn with_mirror(mut self, mirror_reflectance: Color) -> Self {
        self.kind = MaterialKind::Mirror { mirror_reflectance };
        self
    }

    /// Turn this material into a conductor.
    pub fn with_conductor(
        mut self,
        mirror_reflectance: Color,
        refraction_index: f32,
        absorption_index: f32,
    ) -> Self {
        self.kind = MaterialKind::Conductor {
            mirror_reflectance,
            refraction_index,
            absorption_index,
        };
        self
    }

    /// Turn this material into a dielectric.
    pub fn with_dielectric(mut self, absorption_coefficient: Color, refraction_index: f32) -> Self {
        self.kind = MaterialKind::Dielectric {
            absorption_coefficient,
            refraction_index,
        };
        self
    }
}
