//! Cameras for primary ray generation.

use glint_core::CameraDescription;
use glint_math::{Ray, Vec3};

/// Orthonormal camera frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub position: Vec3,
    pub gaze: Vec3,
    pub up: Vec3,
    pub right: Vec3,
}

impl CameraBasis {
    /// Normalizes `gaze` and removes its component from `up`, so a slightly
    /// tilted up vector still yields a right-angled frame.
    pub fn new(position: Vec3, gaze: Vec3, up: Vec3) -> Self {
        let gaze = gaze.normalize();
        let up = (up - gaze * up.dot(gaze)).normalize();
        Self {
            position,
            gaze,
            up,
            right: gaze.cross(up),
        }
    }
}

/// Anything that can turn a pixel coordinate into a primary ray.
pub trait Camera: Send + Sync {
    fn basis(&self) -> &CameraBasis;

    /// Image size in pixels (width, height).
    fn resolution(&self) -> (u32, u32);

    /// File name the rendered image is written to.
    fn image_name(&self) -> &str;

    fn sample_count(&self) -> u32;

    /// World-space ray through the centre of pixel (x, y), (0, 0) being the
    /// top-left pixel. The direction is a unit vector.
    fn cast_ray(&self, x: u32, y: u32) -> Ray;
}

/// Near-plane rectangle, measured from where the gaze pierces the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearPlane {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub distance: f32,
}

impl NearPlane {
    pub fn new(left: f32, right: f32, bottom: f32, top: f32, distance: f32) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
            distance,
        }
    }
}

/// Pinhole camera projecting onto a uniform pixel grid on its near plane.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    image_name: String,
    basis: CameraBasis,
    width: u32,
    height: u32,
    samples: u32,
    near_plane: NearPlane,

    // Cached pixel stepping (set at construction)
    top_left: Vec3,
    pixel_right: Vec3,
    pixel_down: Vec3,
}

impl PerspectiveCamera {
    pub fn new(
        image_name: impl Into<String>,
        basis: CameraBasis,
        resolution: (u32, u32),
        near_plane: NearPlane,
    ) -> Self {
        let (width, height) = resolution;
        let plane_width = near_plane.right - near_plane.left;
        let plane_height = near_plane.top - near_plane.bottom;

        let pixel_right = basis.right * (plane_width / width as f32);
        let pixel_down = basis.up * (-plane_height / height as f32);

        // centre of the top-left pixel, relative to the camera position
        let top_left = basis.gaze * near_plane.distance
            + basis.right * (near_plane.left + plane_width / width as f32 / 2.0)
            + basis.up * (near_plane.top - plane_height / height as f32 / 2.0);

        Self {
            image_name: image_name.into(),
            basis,
            width,
            height,
            samples: 1,
            near_plane,
            top_left,
            pixel_right,
            pixel_down,
        }
    }

    /// Set the stored sample count.
    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }

    pub fn near_plane(&self) -> &NearPlane {
        &self.near_plane
    }
}

impl From<&CameraDescription> for PerspectiveCamera {
    fn from(desc: &CameraDescription) -> Self {
        let [left, right, bottom, top] = desc.near_plane;
        let [width, height] = desc.resolution;
        Self::new(
            desc.image_name.clone(),
            CameraBasis::new(desc.position, desc.gaze, desc.up),
            (width, height),
            NearPlane::new(left, right, bottom, top, desc.near_distance),
        )
        .with_samples(desc.num_samples)
    }
}

impl Camera for PerspectiveCamera {
    fn basis(&self) -> &CameraBasis {
        &self.basis
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn image_name(&self) -> &str {
        &self.image_name
    }

    fn sample_count(&self) -> u32 {
        self.samples
    }

    #[inline]
    fn cast_ray(&self, x: u32, y: u32) -> Ray {
        let direction = self.top_left + self.pixel_right * x as f32 + self.pixel_down * y as f32;
        Ray::new(self.basis.position, direction.normalize())
    }
}
