//! Layer camera
//!
//! Supplies the view matrix (inverse of the camera's own transform) and,
//! together with a viewport, the projection matrix.
//!
//! # Example
//!
//! ```ignore
//! use void_layer::camera::Camera;
//!
//! // 2D camera: orthographic, projection comes from the viewport
//! let camera = Camera::orthographic().with_location(Vec3::new(100.0, 50.0, 0.0));
//!
//! // 3D camera
//! let camera = Camera::perspective(60.0, 0.1, 1000.0);
//! ```

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use void_math::{radians, try_inverse};

use crate::viewport::Viewport;

/// Camera projection mode
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Use the viewport's own orthographic projection
    Orthographic,
    /// Perspective with vertical field of view in degrees
    Perspective { fov_y: f32 },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Orthographic
    }
}

/// Camera with a position in the world
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub location: Vec3,
    /// Euler rotation in degrees (applied X, then Y, then Z)
    pub rotation: Vec3,
    /// Scale > 1 shows more of the world (zoom out)
    pub scale: Vec3,
    pub projection: Projection,
    /// Near clipping plane distance (perspective only)
    pub near: f32,
    /// Far clipping plane distance (perspective only)
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            location: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            projection: Projection::Orthographic,
            near: 1.0,
            far: 10000.0,
        }
    }
}

impl Camera {
    pub fn orthographic() -> Self {
        Self::default()
    }

    pub fn perspective(fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            projection: Projection::Perspective { fov_y: fov_degrees },
            near,
            far,
            ..Default::default()
        }
    }

    pub fn with_location(mut self, location: Vec3) -> Self {
        self.location = location;
        self
    }

    pub fn with_rotation(mut self, degrees: Vec3) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn is_ortho(&self) -> bool {
        matches!(self.projection, Projection::Orthographic)
    }

    pub fn local_to_world(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            radians(self.rotation.x),
            radians(self.rotation.y),
            radians(self.rotation.z),
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.location)
    }

    /// World -> view. A degenerate (zero scale) camera yields identity.
    pub fn view_matrix(&self) -> Mat4 {
        match try_inverse(&self.local_to_world()) {
            Some(view) => view,
            None => {
                log::warn!("Camera transform is singular (scale {:?}); using identity view", self.scale);
                Mat4::IDENTITY
            }
        }
    }

    /// View -> normalized device projection for the given viewport
    pub fn projection_matrix(&self, viewport: &Viewport) -> Mat4 {
        match self.projection {
            Projection::Orthographic => viewport.projection_matrix(),
            Projection::Perspective { fov_y } => {
                Mat4::perspective_rh_gl(radians(fov_y), viewport.aspect(), self.near, self.far)
            }
        }
    }
}
