//! # void_math - Layer Geometry
//!
//! Geometry used by the layer compositor, built on top of `glam`:
//! - `Rect` for window and world rectangles in the XY plane
//! - `Aabb` for prop bounds and view volume extents
//! - `Frustum` for view-volume culling
//! - Projective helpers for window <-> world conversion

pub mod bounds;
pub mod frustum;
pub mod project;

pub use bounds::*;
pub use frustum::*;
pub use project::*;

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// Common math constants
pub mod consts {
    pub const EPSILON: f32 = 1e-6;
    pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

pub mod prelude {
    pub use crate::bounds::{Aabb, Rect};
    pub use crate::frustum::{Frustum, FrustumTest, Plane};
    pub use crate::project::{project_point, transform_rect, try_inverse};
    pub use crate::radians;
    pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
}
