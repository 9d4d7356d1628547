//! Graphics device seam
//!
//! Layers never talk to a GPU API directly. They drive a `GfxDevice`:
//! bind a target, set the viewport and the world/view/projection
//! transforms, recompute the view volume, submit draws, flush.
//!
//! `RecordingDevice` is a headless implementation that records every call;
//! real backends implement the same trait.

mod recording;

pub use recording::{GfxCommand, RecordingDevice};

use glam::Mat4;
use serde::{Deserialize, Serialize};
use void_math::{Frustum, Rect};

use crate::debug_lines::DebugVertex;
use crate::frame_buffer::FrameBuffer;
use crate::prop::PropId;

/// Vertex transform slots
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexTransform {
    World,
    View,
    Projection,
}

/// One prop sub-primitive handed to the device
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    pub prop: PropId,
    pub sub_prim: u32,
    /// Prop state (shader, textures, blend) must be rebound before drawing
    pub reload_state: bool,
    pub world: Mat4,
}

/// Rendering pipeline consumed by layers
pub trait GfxDevice {
    /// Restore default pipeline state
    fn reset_state(&mut self);

    /// Bind a render target; `None` binds the main screen
    fn set_frame_buffer(&mut self, frame_buffer: Option<&FrameBuffer>);

    /// Window-space rectangle to render into
    fn set_viewport(&mut self, rect: Rect);

    fn set_vertex_transform(&mut self, slot: VertexTransform, matrix: Mat4);

    /// Recompute the view volume from the current transforms
    fn update_view_volume(&mut self);

    /// View volume as of the last `update_view_volume`
    fn view_volume(&self) -> &Frustum;

    fn submit_draw(&mut self, call: DrawCall);

    /// Line list (pairs of vertices)
    fn draw_lines(&mut self, vertices: &[DebugVertex], width: f32);

    /// Submit everything buffered so far
    fn flush(&mut self);
}

/// World/view/projection state with its derived view volume.
///
/// Backends embed this to implement the transform half of `GfxDevice`.
#[derive(Clone, Debug)]
pub struct TransformState {
    world: Mat4,
    view: Mat4,
    projection: Mat4,
    view_volume: Frustum,
}

impl TransformState {
    pub fn new() -> Self {
        Self {
            world: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            view_volume: Frustum::default(),
        }
    }

    pub fn set(&mut self, slot: VertexTransform, matrix: Mat4) {
        match slot {
            VertexTransform::World => self.world = matrix,
            VertexTransform::View => self.view = matrix,
            VertexTransform::Projection => self.projection = matrix,
        }
    }

    pub fn get(&self, slot: VertexTransform) -> Mat4 {
        match slot {
            VertexTransform::World => self.world,
            VertexTransform::View => self.view,
            VertexTransform::Projection => self.projection,
        }
    }

    /// Clip transform: world first, projection last
    pub fn world_view_projection(&self) -> Mat4 {
        self.projection * self.view * self.world
    }

    pub fn update_view_volume(&mut self) {
        self.view_volume = Frustum::from_view_projection(&self.world_view_projection());
    }

    pub fn view_volume(&self) -> &Frustum {
        &self.view_volume
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::new()
    }
}
