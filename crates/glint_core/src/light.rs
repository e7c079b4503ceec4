//! Point light source.

use glint_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::Color;

/// An isotropic point light.
///
/// `intensity` is per channel; irradiance at distance `d` is
/// `intensity / d²`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: Color,
}

impl PointLight {
    pub fn new(position: Vec3, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }

    /// Irradiance arriving at `point`, ignoring occlusion.
    pub fn irradiance_at(&self, point: Vec3) -> Color {
        self.intensity / self.position.distance_squared(point)
    }
}
