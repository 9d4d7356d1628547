//! # void_layer - Scene Layers
//!
//! A layer renders one camera's view of a partition of props into a
//! viewport:
//! - Camera and viewport derive the view, projection and window transforms
//! - A BVH partition culls props against the view volume
//! - Gathered props are sorted (priority, axis or weighted vector) and drawn
//! - Optional physics debug drawers and debug line overlays
//! - Window <-> world queries and camera fitting for picking and framing
//!
//! ## Architecture
//!
//! Collaborators are attached as shared handles (`Shared<T>`), so several
//! layers can share a camera, viewport or partition. Drawing goes through
//! the `GfxDevice` trait; `RecordingDevice` is a headless implementation.
//! Per-frame scratch state (result buffers, debug lines) travels in a
//! `DrawContext` owned by the caller.
//!
//! ## Example
//!
//! ```ignore
//! use void_layer::prelude::*;
//!
//! let mut layer = Layer::new();
//! layer.set_viewport(Some(shared(Viewport::from_size(1280.0, 720.0))));
//! layer.set_camera(Some(shared(Camera::orthographic())));
//! layer.insert_prop(share_prop(BasicProp::square(Vec3::ZERO, 32.0)));
//!
//! let mut device = RecordingDevice::new();
//! let mut pool = PartitionResultPool::new();
//! let mut lines = DebugLines::new();
//! layer.draw(&mut DrawContext::new(&mut device, &mut pool, &mut lines));
//! ```

pub mod camera;
pub mod capability;
pub mod config;
pub mod context;
pub mod debug_lines;
pub mod error;
pub mod frame_buffer;
pub mod gfx;
pub mod layer;
pub mod partition;
pub mod physics_debug;
pub mod prop;
pub mod viewport;

use std::sync::Arc;

use parking_lot::RwLock;

pub use error::{LayerError, Result};

/// Shared, lockable handle to a collaborator
pub type Shared<T> = Arc<RwLock<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(RwLock::new(value))
}

pub mod prelude {
    pub use crate::camera::{Camera, Projection};
    pub use crate::capability::{Capability, CapabilitySet};
    pub use crate::config::LayerConfig;
    pub use crate::context::DrawContext;
    pub use crate::debug_lines::{DebugLineKind, DebugLineStyle, DebugLines, DebugVertex};
    pub use crate::error::{LayerError, Result};
    pub use crate::frame_buffer::FrameBuffer;
    pub use crate::gfx::{DrawCall, GfxCommand, GfxDevice, RecordingDevice, TransformState, VertexTransform};
    pub use crate::layer::{Fitting, Layer, LayerDrawStats, WindowRay};
    pub use crate::partition::{
        CullVolume, Partition, PartitionResult, PartitionResultBuffer, PartitionResultPool, SortMode, SortScale,
    };
    pub use crate::physics_debug::{PhysicsBackend, PhysicsDebugDraw};
    pub use crate::prop::{share_prop, BasicProp, Prop, PropId, SharedProp, SubPrimitive, WHOLE_PROP};
    pub use crate::viewport::{Viewport, VIEWPORT_DEPTH};
    pub use crate::{shared, Shared};
    pub use void_math::{Aabb, Frustum, Rect};
    pub use glam::{Mat4, Vec2, Vec3};
}
