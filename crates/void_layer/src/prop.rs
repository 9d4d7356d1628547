//! Props: anything a layer can gather and draw
//!
//! A prop lives in a partition and is drawn by the layer that owns the
//! partition. Props expose one or more sub-primitives, each with its own
//! bounds; the partition indexes and returns sub-primitives, and the layer
//! hands the sub-primitive id back to `Prop::draw`.

use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use glam::{Mat4, Vec3};
use parking_lot::RwLock;
use void_math::Aabb;

use crate::capability::CapabilitySet;
use crate::context::DrawContext;
use crate::debug_lines::DebugLineKind;
use crate::gfx::DrawCall;

/// Global prop ID counter for unique IDs
static PROP_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a prop
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropId(u64);

impl PropId {
    /// Create a new unique prop ID
    pub fn new() -> Self {
        Self(PROP_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for PropId {
    fn default() -> Self {
        Self::new()
    }
}

/// Sub-primitive id used when a prop is indexed as a single piece
pub const WHOLE_PROP: u32 = u32::MAX;

/// An independently culled piece of a prop
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubPrimitive {
    pub id: u32,
    pub bounds: Aabb,
    /// Position used by the sort modes
    pub location: Vec3,
}

/// Drawable object registered in a partition
pub trait Prop: Send + Sync {
    fn id(&self) -> PropId;

    fn capabilities(&self) -> CapabilitySet;

    /// Sort priority
    fn priority(&self) -> i32 {
        0
    }

    /// World bounds; `None` means empty bounds and the prop is never gathered
    fn world_bounds(&self) -> Option<Aabb>;

    fn world_location(&self) -> Vec3 {
        self.world_bounds().map_or(Vec3::ZERO, |b| b.center())
    }

    /// Pieces to index. Defaults to the whole prop.
    fn sub_primitives(&self, out: &mut Vec<SubPrimitive>) {
        if let Some(bounds) = self.world_bounds() {
            out.push(SubPrimitive {
                id: WHOLE_PROP,
                bounds,
                location: self.world_location(),
            });
        }
    }

    /// Render one sub-primitive. `reload` is false when the previous draw
    /// was this same prop, so bound state can be reused.
    fn draw(&self, sub_prim: u32, reload: bool, ctx: &mut DrawContext<'_>);

    fn draw_debug(&self, _sub_prim: u32, ctx: &mut DrawContext<'_>) {
        if let Some(bounds) = self.world_bounds() {
            ctx.debug_lines.push_aabb(DebugLineKind::PropWorldBounds, &bounds);
        }
    }
}

/// Shared handle to a prop
pub type SharedProp = Arc<RwLock<dyn Prop>>;

pub fn share_prop<P: Prop + 'static>(prop: P) -> SharedProp {
    Arc::new(RwLock::new(prop))
}

/// Plain box-shaped prop that submits one draw call per sub-primitive.
///
/// Covers placeholder content, tools, and headless runs. The draw call
/// carries a translation to the prop's location as its world matrix.
#[derive(Clone, Debug)]
pub struct BasicProp {
    id: PropId,
    bounds: Option<Aabb>,
    priority: i32,
    capabilities: CapabilitySet,
    parts: Vec<SubPrimitive>,
}

impl BasicProp {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            id: PropId::new(),
            bounds: Some(bounds),
            priority: 0,
            capabilities: CapabilitySet::DRAWABLE,
            parts: Vec::new(),
        }
    }

    /// Prop with no bounds; never gathered
    pub fn empty() -> Self {
        Self {
            bounds: None,
            ..Self::new(Aabb::EMPTY)
        }
    }

    /// Square of half-size `half` centered at `center`, flat on Z
    pub fn square(center: Vec3, half: f32) -> Self {
        let extent = Vec3::new(half, half, 0.0);
        Self::new(Aabb::new(center - extent, center + extent))
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_capabilities(mut self, capabilities: CapabilitySet) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Split into explicit sub-primitives
    pub fn with_parts(mut self, parts: Vec<SubPrimitive>) -> Self {
        self.parts = parts;
        self
    }

    pub fn set_bounds(&mut self, bounds: Option<Aabb>) {
        self.bounds = bounds;
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }
}

impl Prop for BasicProp {
    fn id(&self) -> PropId {
        self.id
    }

    fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn world_bounds(&self) -> Option<Aabb> {
        self.bounds.filter(|b| !b.is_empty())
    }

    fn sub_primitives(&self, out: &mut Vec<SubPrimitive>) {
        if self.parts.is_empty() {
            if let Some(bounds) = self.world_bounds() {
                out.push(SubPrimitive {
                    id: WHOLE_PROP,
                    bounds,
                    location: bounds.center(),
                });
            }
        } else {
            out.extend_from_slice(&self.parts);
        }
    }

    fn draw(&self, sub_prim: u32, reload: bool, ctx: &mut DrawContext<'_>) {
        let location = self
            .parts
            .iter()
            .find(|p| p.id == sub_prim)
            .map_or_else(|| self.world_location(), |p| p.location);

        ctx.gfx.submit_draw(DrawCall {
            prop: self.id,
            sub_prim,
            reload_state: reload,
            world: Mat4::from_translation(location),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = PropId::new();
        let b = PropId::new();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn test_default_sub_primitive_is_whole_prop() {
        let prop = BasicProp::square(Vec3::new(10.0, 20.0, 0.0), 5.0);
        let mut out = Vec::new();
        prop.sub_primitives(&mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, WHOLE_PROP);
        assert_eq!(out[0].location, Vec3::new(10.0, 20.0, 0.0));
    }

    #[test]
    fn test_empty_prop_has_no_sub_primitives() {
        let prop = BasicProp::empty();
        let mut out = Vec::new();
        prop.sub_primitives(&mut out);
        assert!(out.is_empty());
        assert!(prop.world_bounds().is_none());
    }

    #[test]
    fn test_explicit_parts() {
        let part = |id: u32, x: f32| SubPrimitive {
            id,
            bounds: Aabb::new(Vec3::new(x, 0.0, 0.0), Vec3::new(x + 1.0, 1.0, 0.0)),
            location: Vec3::new(x, 0.0, 0.0),
        };
        let prop = BasicProp::square(Vec3::ZERO, 10.0).with_parts(vec![part(0, 0.0), part(1, 5.0)]);

        let mut out = Vec::new();
        prop.sub_primitives(&mut out);
        assert_eq!(out.iter().map(|p| p.id).collect::<Vec<_>>(), vec![0, 1]);
    }
}
