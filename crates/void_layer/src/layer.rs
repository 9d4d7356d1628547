//! Layer: camera + viewport + partition, drawn as one pass
//!
//! A layer owns the link between a camera, a viewport and a partition of
//! props. Drawing a layer:
//! - binds its frame buffer (or the main screen) and viewport rect
//! - loads the camera's view and projection and recomputes the view volume
//! - runs attached physics debug drawers
//! - gathers visible props from the partition, sorts them and draws them
//! - emits queued debug lines and flushes
//!
//! Layers are props themselves, so a layer can sit in another layer's
//! partition and be drawn as part of it.
//!
//! # Example
//!
//! ```ignore
//! use void_layer::prelude::*;
//!
//! let mut layer = Layer::new();
//! layer.set_viewport(Some(shared(Viewport::from_size(640.0, 480.0))));
//! layer.insert_prop(share_prop(BasicProp::square(Vec3::ZERO, 16.0)));
//!
//! let mut ctx = DrawContext::new(&mut device, &mut pool, &mut lines);
//! let stats = layer.draw(&mut ctx);
//! ```

use core::fmt;

use glam::{Mat4, Vec2, Vec3};
use void_math::{project_point, transform_rect, try_inverse, Aabb, Rect};

use crate::camera::Camera;
use crate::capability::CapabilitySet;
use crate::config::LayerConfig;
use crate::context::DrawContext;
use crate::error::Result;
use crate::frame_buffer::FrameBuffer;
use crate::gfx::{GfxDevice, VertexTransform};
use crate::partition::{CullVolume, Partition, PartitionResultBuffer, SortMode, SortScale};
use crate::physics_debug::{PhysicsBackend, PhysicsDebugDraw};
use crate::prop::{Prop, PropId, SharedProp};
use crate::viewport::Viewport;
use crate::{shared, Shared};

/// Window depth step used to find the direction of a window ray
const WND_RAY_DEPTH_STEP: f32 = 0.1;

/// Camera target that frames a world rectangle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fitting {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

/// World-space ray under a window point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowRay {
    pub origin: Vec3,
    /// Unit length, pointing away from the viewer
    pub direction: Vec3,
}

/// What one `Layer::draw` did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerDrawStats {
    /// Results returned by the partition query
    pub gathered: usize,
    /// Sub-primitives dispatched to `Prop::draw`
    pub drawn: usize,
}

/// A camera's view of a partition, rendered into a viewport
pub struct Layer {
    id: PropId,
    camera: Option<Shared<Camera>>,
    viewport: Option<Shared<Viewport>>,
    partition: Option<Shared<Partition>>,
    frame_buffer: Option<Shared<FrameBuffer>>,
    physics_debug: [Option<Shared<dyn PhysicsDebugDraw>>; 2],
    /// Local-to-world; places the viewport rect on the main screen
    transform: Mat4,
    priority: i32,
    parallax: Vec2,
    sort_mode: SortMode,
    sort_scale: SortScale,
    partition_cull_2d: bool,
    show_debug_lines: bool,
}

impl Layer {
    pub fn new() -> Self {
        Self::from_valid_config(&LayerConfig::default())
    }

    /// Layer with validated settings
    pub fn with_config(config: &LayerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: &LayerConfig) -> Self {
        let mut layer = Self {
            id: PropId::new(),
            camera: None,
            viewport: None,
            partition: None,
            frame_buffer: None,
            physics_debug: [None, None],
            transform: Mat4::IDENTITY,
            priority: 0,
            parallax: Vec2::ONE,
            sort_mode: SortMode::PriorityAscending,
            sort_scale: SortScale::default(),
            partition_cull_2d: false,
            show_debug_lines: true,
        };
        layer.set_config_fields(config);
        layer
    }

    /// Snapshot of the plain-data settings
    pub fn config(&self) -> LayerConfig {
        LayerConfig {
            sort_mode: self.sort_mode,
            sort_scale: self.sort_scale,
            partition_cull_2d: self.partition_cull_2d,
            show_debug_lines: self.show_debug_lines,
            parallax: self.parallax,
        }
    }

    /// Replace the plain-data settings. Invalid configs leave the layer unchanged.
    pub fn apply_config(&mut self, config: &LayerConfig) -> Result<()> {
        config.validate()?;
        self.set_config_fields(config);
        Ok(())
    }

    fn set_config_fields(&mut self, config: &LayerConfig) {
        self.sort_mode = config.sort_mode;
        self.sort_scale = config.sort_scale;
        self.partition_cull_2d = config.partition_cull_2d;
        self.show_debug_lines = config.show_debug_lines;
        self.parallax = config.parallax;
    }

    pub fn id(&self) -> PropId {
        self.id
    }

    // ------------------------------------------------------------------
    // Collaborators
    // ------------------------------------------------------------------

    pub fn set_camera(&mut self, camera: Option<Shared<Camera>>) {
        log::debug!("Layer {:?}: camera {}", self.id, attach_verb(camera.is_some()));
        self.camera = camera;
    }

    pub fn camera(&self) -> Option<&Shared<Camera>> {
        self.camera.as_ref()
    }

    pub fn set_viewport(&mut self, viewport: Option<Shared<Viewport>>) {
        log::debug!("Layer {:?}: viewport {}", self.id, attach_verb(viewport.is_some()));
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Option<&Shared<Viewport>> {
        self.viewport.as_ref()
    }

    pub fn set_partition(&mut self, partition: Option<Shared<Partition>>) {
        log::debug!("Layer {:?}: partition {}", self.id, attach_verb(partition.is_some()));
        self.partition = partition;
    }

    pub fn partition(&self) -> Option<&Shared<Partition>> {
        self.partition.as_ref()
    }

    /// The partition, created on first use
    pub fn affirm_partition(&mut self) -> Shared<Partition> {
        match &self.partition {
            Some(partition) => partition.clone(),
            None => {
                log::debug!("Layer {:?}: created partition", self.id);
                let partition = shared(Partition::new());
                self.partition = Some(partition.clone());
                partition
            }
        }
    }

    pub fn set_frame_buffer(&mut self, frame_buffer: Option<Shared<FrameBuffer>>) {
        log::debug!("Layer {:?}: frame buffer {}", self.id, attach_verb(frame_buffer.is_some()));
        self.frame_buffer = frame_buffer;
    }

    pub fn frame_buffer(&self) -> Option<&Shared<FrameBuffer>> {
        self.frame_buffer.as_ref()
    }

    /// Attach or detach the debug drawer for one physics backend
    pub fn set_physics_debug(&mut self, backend: PhysicsBackend, hook: Option<Shared<dyn PhysicsDebugDraw>>) {
        log::debug!("Layer {:?}: {} debug {}", self.id, backend, attach_verb(hook.is_some()));
        self.physics_debug[backend.slot()] = hook;
    }

    pub fn physics_debug(&self, backend: PhysicsBackend) -> Option<&Shared<dyn PhysicsDebugDraw>> {
        self.physics_debug[backend.slot()].as_ref()
    }

    // ------------------------------------------------------------------
    // Props
    // ------------------------------------------------------------------

    /// Add a prop, creating the partition if needed. A layer can't contain itself.
    pub fn insert_prop(&mut self, prop: SharedProp) -> bool {
        // a prop write-locked here can only be the layer itself
        let id = match prop.try_read() {
            Some(guard) => guard.id(),
            None => {
                log::warn!("Layer {:?}: prop is locked, not inserting", self.id);
                return false;
            }
        };
        if id == self.id {
            log::warn!("Layer {:?}: refusing to insert layer into itself", self.id);
            return false;
        }

        let partition = self.affirm_partition();
        let mut partition = partition.write();
        let inserted = partition.insert_prop(prop);
        partition.mark_dirty();
        inserted
    }

    pub fn remove_prop(&mut self, id: PropId) -> bool {
        self.partition
            .as_ref()
            .map_or(false, |partition| partition.write().remove_prop(id))
    }

    /// Remove every prop from the partition
    pub fn clear(&mut self) {
        if let Some(partition) = &self.partition {
            partition.write().clear();
        }
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn set_parallax(&mut self, x: f32, y: f32) {
        self.parallax = Vec2::new(x, y);
    }

    pub fn parallax(&self) -> Vec2 {
        self.parallax
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
    }

    /// Sort mode from its integer code
    pub fn set_sort_mode_raw(&mut self, raw: u32) -> Result<()> {
        self.sort_mode = SortMode::try_from(raw)?;
        Ok(())
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn set_sort_scale(&mut self, x: f32, y: f32, z: f32, priority: f32) {
        self.sort_scale = SortScale::new(x, y, z, priority);
    }

    pub fn sort_scale(&self) -> SortScale {
        self.sort_scale
    }

    pub fn set_partition_cull_2d(&mut self, enabled: bool) {
        self.partition_cull_2d = enabled;
    }

    pub fn partition_cull_2d(&self) -> bool {
        self.partition_cull_2d
    }

    pub fn show_debug_lines(&mut self, show: bool) {
        self.show_debug_lines = show;
    }

    pub fn shows_debug_lines(&self) -> bool {
        self.show_debug_lines
    }

    /// Drawing into a realized frame buffer rather than the main screen
    pub fn is_offscreen(&self) -> bool {
        self.frame_buffer
            .as_ref()
            .map_or(false, |fb| fb.read().is_realized())
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    fn view_matrix(&self) -> Mat4 {
        self.camera
            .as_ref()
            .map_or(Mat4::IDENTITY, |camera| camera.read().view_matrix())
    }

    fn projection_matrix(&self, viewport: &Viewport) -> Mat4 {
        match &self.camera {
            Some(camera) => camera.read().projection_matrix(viewport),
            None => viewport.projection_matrix(),
        }
    }

    fn load_transforms(gfx: &mut dyn GfxDevice, view: Mat4, proj: Mat4) {
        gfx.set_vertex_transform(VertexTransform::World, Mat4::IDENTITY);
        gfx.set_vertex_transform(VertexTransform::View, view);
        gfx.set_vertex_transform(VertexTransform::Projection, proj);
    }

    /// Render the layer. Does nothing without a viewport.
    pub fn draw(&self, ctx: &mut DrawContext<'_>) -> LayerDrawStats {
        let mut stats = LayerDrawStats::default();

        let Some(viewport) = &self.viewport else {
            log::trace!("Layer {:?}: no viewport, skipping draw", self.id);
            return stats;
        };

        ctx.gfx.reset_state();
        let offscreen = {
            let frame_buffer = self.frame_buffer.as_ref().map(|fb| fb.read());
            ctx.gfx.set_frame_buffer(frame_buffer.as_deref());
            frame_buffer.map_or(false, |fb| fb.is_realized())
        };

        let (rect, view, proj) = {
            let viewport = viewport.read();
            let rect = if offscreen {
                viewport.rect()
            } else {
                transform_rect(&self.transform, &viewport.rect())
            };
            (rect, self.view_matrix(), self.projection_matrix(&viewport))
        };
        ctx.gfx.set_viewport(rect);

        Self::load_transforms(ctx.gfx, view, proj);
        ctx.gfx.update_view_volume();

        if self.show_debug_lines {
            for backend in PhysicsBackend::ALL {
                if let Some(hook) = &self.physics_debug[backend.slot()] {
                    hook.read().draw_debug(ctx.gfx, ctx.debug_lines);
                    ctx.debug_lines.draw(ctx.gfx);
                    ctx.gfx.flush();
                }
            }
        }

        // debug drawers may have changed the transforms
        Self::load_transforms(ctx.gfx, view, proj);

        // lines queued before this draw belong to someone else
        let queued_before = ctx.debug_lines.pending_count();

        if let Some(partition) = &self.partition {
            let mut buffer = ctx.results.acquire();

            let volume = if self.partition_cull_2d {
                CullVolume::Rect(ctx.gfx.view_volume().aabb.rect_xy())
            } else {
                CullVolume::Frustum(ctx.gfx.view_volume().clone())
            };
            stats.gathered =
                partition
                    .write()
                    .gather_props(&mut buffer, Some(self.id), &volume, CapabilitySet::DRAWABLE);

            log::trace!(
                "Layer {:?}: gathered {} results, sort {:?}",
                self.id,
                stats.gathered,
                self.sort_mode
            );

            if stats.gathered == 0 {
                ctx.results.release(buffer);
                return stats;
            }

            let scale = self.sort_scale;
            let total = buffer.prepare_results(self.sort_mode, true, scale.x, scale.y, scale.z, scale.priority);
            stats.drawn = self.dispatch(&buffer, total, ctx);

            ctx.results.release(buffer);
        }

        if self.show_debug_lines {
            ctx.debug_lines.draw(ctx.gfx);
        } else {
            ctx.debug_lines.truncate(queued_before);
        }
        ctx.gfx.flush();

        stats
    }

    /// Draw sorted results; state reloads only when the prop changes
    fn dispatch(&self, buffer: &PartitionResultBuffer, total: usize, ctx: &mut DrawContext<'_>) -> usize {
        let mut previous: Option<PropId> = None;
        let mut drawn = 0;

        for result in buffer.iter().take(total) {
            let reload = previous != Some(result.prop_id);

            let prop = result.prop.read();
            prop.draw(result.sub_prim_id, reload, ctx);
            prop.draw_debug(result.sub_prim_id, ctx);

            previous = Some(result.prop_id);
            drawn += 1;
        }
        drawn
    }

    // ------------------------------------------------------------------
    // Transform queries
    // ------------------------------------------------------------------

    /// World -> window pixels. Identity without a viewport.
    pub fn world_to_wnd_matrix(&self) -> Mat4 {
        let Some(viewport) = &self.viewport else {
            return Mat4::IDENTITY;
        };
        let viewport = viewport.read();
        viewport.norm_to_wnd_matrix() * self.projection_matrix(&viewport) * self.view_matrix()
    }

    /// Window pixels -> world. Identity without a viewport.
    pub fn wnd_to_world_matrix(&self) -> Mat4 {
        if self.viewport.is_none() {
            return Mat4::IDENTITY;
        }
        match try_inverse(&self.world_to_wnd_matrix()) {
            Some(inverse) => inverse,
            None => {
                log::warn!("Layer {:?}: world to window transform is singular", self.id);
                Mat4::IDENTITY
            }
        }
    }

    /// Unproject a window point into a world-space picking ray
    pub fn wnd_to_world(&self, wnd: Vec3) -> WindowRay {
        let wnd_to_world = self.wnd_to_world_matrix();

        let origin = project_point(&wnd_to_world, wnd);
        let ahead = project_point(&wnd_to_world, wnd + Vec3::new(0.0, 0.0, WND_RAY_DEPTH_STEP));

        WindowRay {
            origin,
            direction: (ahead - origin).normalize_or_zero(),
        }
    }

    pub fn world_to_wnd(&self, world: Vec3) -> Vec3 {
        project_point(&self.world_to_wnd_matrix(), world)
    }

    // ------------------------------------------------------------------
    // Fitting
    // ------------------------------------------------------------------

    /// Center and scale that frame `rect` in the viewport, with padding in
    /// window pixels. Scale is 1.0 unless both camera and viewport are set.
    pub fn fitting(&self, rect: Rect, h_pad: f32, v_pad: f32) -> Fitting {
        let rect = rect.bless();
        let center = rect.center();

        Fitting {
            x: center.x,
            y: center.y,
            scale: self.fitting_scale(rect, h_pad, v_pad),
        }
    }

    /// Scale part of `fitting`
    pub fn fitting_scale(&self, rect: Rect, h_pad: f32, v_pad: f32) -> f32 {
        let (Some(_), Some(viewport)) = (&self.camera, &self.viewport) else {
            return 1.0;
        };

        let rect = rect.bless();
        let view = viewport.read().rect();

        let h_fit = (rect.width() > 0.0).then(|| (view.width() - h_pad * 2.0) / rect.width());
        let v_fit = (rect.height() > 0.0).then(|| (view.height() - v_pad * 2.0) / rect.height());

        match (h_fit, v_fit) {
            (Some(h), Some(v)) => h.min(v),
            (Some(fit), None) | (None, Some(fit)) => fit,
            (None, None) => {
                log::warn!("Layer {:?}: fitting an empty rect {:?}", self.id, rect);
                1.0
            }
        }
    }

    // ------------------------------------------------------------------
    // Picking
    // ------------------------------------------------------------------

    /// Props under a window point, nearest first
    pub fn pick(&self, wnd: Vec2, mask: CapabilitySet) -> Vec<SharedProp> {
        let Some(partition) = &self.partition else {
            return Vec::new();
        };

        let ray = self.wnd_to_world(wnd.extend(0.0));
        let mut buffer = PartitionResultBuffer::new();
        partition
            .write()
            .gather_props_on_ray(&mut buffer, Some(self.id), ray.origin, ray.direction, mask);

        let mut seen = Vec::new();
        buffer
            .iter()
            .filter(|result| {
                if seen.contains(&result.prop_id) {
                    false
                } else {
                    seen.push(result.prop_id);
                    true
                }
            })
            .map(|result| result.prop.clone())
            .collect()
    }
}

fn attach_verb(attached: bool) -> &'static str {
    if attached {
        "attached"
    } else {
        "detached"
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("id", &self.id)
            .field("camera", &self.camera.is_some())
            .field("viewport", &self.viewport.is_some())
            .field("partition", &self.partition.is_some())
            .field("frame_buffer", &self.frame_buffer.is_some())
            .field("sort_mode", &self.sort_mode)
            .field("sort_scale", &self.sort_scale)
            .field("partition_cull_2d", &self.partition_cull_2d)
            .field("show_debug_lines", &self.show_debug_lines)
            .finish()
    }
}

impl Prop for Layer {
    fn id(&self) -> PropId {
        self.id
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::DRAWABLE
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    /// The viewport rect, flat at z = 0
    fn world_bounds(&self) -> Option<Aabb> {
        self.viewport.as_ref().map(|v| v.read().rect().to_aabb(0.0))
    }

    fn draw(&self, _sub_prim: u32, _reload: bool, ctx: &mut DrawContext<'_>) {
        Layer::draw(self, ctx);
    }

    /// Nested layers draw their own debug overlay
    fn draw_debug(&self, _sub_prim: u32, _ctx: &mut DrawContext<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::RecordingDevice;
    use crate::partition::PartitionResultPool;
    use crate::debug_lines::DebugLines;
    use crate::prop::{share_prop, BasicProp};
    use approx::assert_relative_eq;

    fn layer_640x480() -> Layer {
        let mut layer = Layer::new();
        layer.set_viewport(Some(shared(Viewport::from_size(640.0, 480.0))));
        layer
    }

    #[test]
    fn test_defaults() {
        let layer = Layer::new();
        assert_eq!(layer.sort_mode(), SortMode::PriorityAscending);
        assert_eq!(layer.sort_scale().to_array(), [0.0, 0.0, 0.0, 1.0]);
        assert!(layer.shows_debug_lines());
        assert!(!layer.partition_cull_2d());
        assert_eq!(layer.parallax(), Vec2::ONE);
        assert!(layer.partition().is_none());
        assert!(!layer.is_offscreen());
    }

    #[test]
    fn test_sort_scale_returns_all_weights() {
        let mut layer = Layer::new();
        layer.set_sort_scale(1.0, 2.0, 3.0, 4.0);
        assert_eq!(layer.sort_scale().to_array(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_sort_mode_raw() {
        let mut layer = Layer::new();
        layer.set_sort_mode_raw(7).unwrap();
        assert_eq!(layer.sort_mode(), SortMode::VectorAscending);
        assert!(layer.set_sort_mode_raw(42).is_err());
        assert_eq!(layer.sort_mode(), SortMode::VectorAscending);
    }

    #[test]
    fn test_partition_created_on_insert() {
        let mut layer = Layer::new();
        assert!(layer.insert_prop(share_prop(BasicProp::square(Vec3::ZERO, 1.0))));
        let partition = layer.partition().unwrap().clone();
        assert_eq!(partition.read().len(), 1);

        layer.clear();
        assert!(partition.read().is_empty());
    }

    #[test]
    fn test_remove_without_partition() {
        let mut layer = Layer::new();
        assert!(!layer.remove_prop(PropId::new()));
    }

    #[test]
    fn test_layer_cannot_contain_itself() {
        let layer = shared(layer_640x480());
        let as_prop: SharedProp = layer.clone();
        assert!(!layer.write().insert_prop(as_prop));
    }

    #[test]
    fn test_offscreen_needs_realized_frame_buffer() {
        let mut layer = Layer::new();
        let fb = shared(FrameBuffer::new("minimap", 128, 128));
        layer.set_frame_buffer(Some(fb.clone()));
        assert!(!layer.is_offscreen());

        fb.write().realize(core::num::NonZeroU32::new(1).unwrap());
        assert!(layer.is_offscreen());
    }

    #[test]
    fn test_bounds_follow_viewport() {
        assert!(Layer::new().world_bounds().is_none());

        let bounds = layer_640x480().world_bounds().unwrap();
        assert_eq!(bounds.min, Vec3::ZERO);
        assert_eq!(bounds.max, Vec3::new(640.0, 480.0, 0.0));
    }

    #[test]
    fn test_fitting_requires_camera_and_viewport() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(Layer::new().fitting(rect, 0.0, 0.0).scale, 1.0);
        assert_eq!(layer_640x480().fitting(rect, 0.0, 0.0).scale, 1.0);

        let mut layer = layer_640x480();
        layer.set_camera(Some(shared(Camera::orthographic())));
        let fit = layer.fitting(rect, 0.0, 0.0);
        assert_relative_eq!(fit.scale, 6.4);
        assert_relative_eq!(fit.x, 50.0);
        assert_relative_eq!(fit.y, 25.0);
    }

    #[test]
    fn test_fitting_blesses_rect_and_pads() {
        let mut layer = layer_640x480();
        layer.set_camera(Some(shared(Camera::orthographic())));

        let fit = layer.fitting(Rect::new(100.0, 50.0, 0.0, 0.0), 20.0, 40.0);
        assert_relative_eq!(fit.x, 50.0);
        assert_relative_eq!(fit.y, 25.0);
        // min((640 - 40) / 100, (480 - 80) / 50) = min(6.0, 8.0)
        assert_relative_eq!(fit.scale, 6.0);
    }

    #[test]
    fn test_fitting_degenerate_rect() {
        let mut layer = layer_640x480();
        layer.set_camera(Some(shared(Camera::orthographic())));

        assert_relative_eq!(layer.fitting_scale(Rect::new(0.0, 0.0, 0.0, 48.0), 0.0, 0.0), 10.0);
        assert_eq!(layer.fitting_scale(Rect::new(5.0, 5.0, 5.0, 5.0), 0.0, 0.0), 1.0);
    }

    #[test]
    fn test_transform_queries_without_viewport() {
        let layer = Layer::new();
        assert_eq!(layer.world_to_wnd_matrix(), Mat4::IDENTITY);
        assert_eq!(layer.wnd_to_world_matrix(), Mat4::IDENTITY);
        assert_eq!(layer.world_to_wnd(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_world_to_wnd_and_back() {
        let mut layer = layer_640x480();
        layer.set_camera(Some(shared(Camera::orthographic().with_location(Vec3::new(100.0, 0.0, 0.0)))));

        let wnd = layer.world_to_wnd(Vec3::new(100.0, 0.0, 0.0));
        assert_relative_eq!(wnd.x, 320.0, epsilon = 1e-3);
        assert_relative_eq!(wnd.y, 240.0, epsilon = 1e-3);

        let ray = layer.wnd_to_world(wnd);
        assert_relative_eq!(ray.origin.x, 100.0, epsilon = 1e-2);
        assert_relative_eq!(ray.origin.y, 0.0, epsilon = 1e-2);
        assert_relative_eq!(ray.direction.length(), 1.0, epsilon = 1e-5);
        assert!(ray.direction.z < 0.0);
    }

    #[test]
    fn test_nested_layer_draws_inside_parent() {
        let mut inner = layer_640x480();
        inner.insert_prop(share_prop(BasicProp::square(Vec3::ZERO, 4.0)));

        let mut outer = layer_640x480();
        outer.insert_prop(share_prop(inner));

        let mut device = RecordingDevice::new();
        let mut pool = PartitionResultPool::new();
        let mut lines = DebugLines::new();
        let stats = outer.draw(&mut DrawContext::new(&mut device, &mut pool, &mut lines));

        assert_eq!(stats.drawn, 1);
        // the inner layer reached its own prop
        assert_eq!(device.draw_calls().count(), 1);
        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.available(), 2);
    }
}
