//! Viewport: window rectangle plus 2D projection parameters
//!
//! The viewport maps world units onto a rectangle of window pixels. Its
//! projection is orthographic; cameras in perspective mode replace the
//! projection but keep the window mapping.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use void_math::{radians, Rect};

/// Half-depth of the orthographic volume, in world units along Z
pub const VIEWPORT_DEPTH: f32 = 1000.0;

/// Window-space rectangle and projection parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Window rectangle in pixels (Y down)
    rect: Rect,
    /// World units spanned horizontally and vertically; zero falls back to the rect size
    scale: Vec2,
    /// Offset in normalized device units
    offset: Vec2,
    /// Rotation about the view axis, in degrees
    rotation: f32,
}

impl Viewport {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect: rect.bless(),
            scale: Vec2::ZERO,
            offset: Vec2::ZERO,
            rotation: 0.0,
        }
    }

    /// Viewport at the window origin with the given pixel size
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Rect::from_origin_size(0.0, 0.0, width, height))
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.rect = Rect::from_origin_size(0.0, 0.0, width, height);
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect.bless();
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_scale(&mut self, x: f32, y: f32) {
        self.scale = Vec2::new(x, y);
    }

    /// World units spanned by the viewport on each axis
    pub fn scale(&self) -> Vec2 {
        Vec2::new(
            if self.scale.x != 0.0 { self.scale.x } else { self.rect.width() },
            if self.scale.y != 0.0 { self.scale.y } else { self.rect.height() },
        )
    }

    pub fn set_offset(&mut self, x: f32, y: f32) {
        self.offset = Vec2::new(x, y);
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Width over height, 1.0 for a degenerate rect
    pub fn aspect(&self) -> f32 {
        let height = self.rect.height();
        if height > 0.0 {
            self.rect.width() / height
        } else {
            1.0
        }
    }

    /// Orthographic world -> normalized device projection.
    ///
    /// +Z in world faces the viewer, so window depth grows along -Z.
    pub fn projection_matrix(&self) -> Mat4 {
        let scale = self.scale();
        let sx = if scale.x != 0.0 { 2.0 / scale.x } else { 1.0 };
        let sy = if scale.y != 0.0 { 2.0 / scale.y } else { 1.0 };

        Mat4::from_translation(self.offset.extend(0.0))
            * Mat4::from_rotation_z(radians(self.rotation))
            * Mat4::from_scale(Vec3::new(sx, sy, -1.0 / VIEWPORT_DEPTH))
    }

    /// Normalized device -> window pixel mapping; depth passes through
    pub fn norm_to_wnd_matrix(&self) -> Mat4 {
        let half_w = self.rect.width() * 0.5;
        let half_h = self.rect.height() * 0.5;

        Mat4::from_translation(Vec3::new(self.rect.x_min + half_w, self.rect.y_min + half_h, 0.0))
            * Mat4::from_scale(Vec3::new(half_w, -half_h, 1.0))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Rect::default())
    }
}
