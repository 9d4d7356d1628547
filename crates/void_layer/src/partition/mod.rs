//! Spatial partition of props
//!
//! Props are indexed by the bounds of their sub-primitives in a BVH. The
//! index is rebuilt lazily: any insertion, removal or `mark_dirty` flags it
//! stale and the next query rebuilds it from the props' current bounds.
//!
//! Queries append to a `PartitionResultBuffer`. Within one query, results
//! come out in insertion order (and sub-primitive order within a prop), so
//! `SortMode::None` is deterministic.

pub mod bvh;
mod result;

pub use bvh::Bvh;
pub use result::{PartitionResult, PartitionResultBuffer, PartitionResultPool, SortMode, SortScale};

use glam::Vec3;
use void_math::{Frustum, Rect};

use crate::capability::CapabilitySet;
use crate::debug_lines::{DebugLineKind, DebugLines};
use crate::prop::{Prop, PropId, SharedProp, SubPrimitive};

/// Region a gather keeps results from
#[derive(Clone, Debug)]
pub enum CullVolume {
    /// XY overlap only
    Rect(Rect),
    Frustum(Frustum),
}

struct Entry {
    id: PropId,
    prop: SharedProp,
}

#[derive(Clone, Copy, Debug)]
struct Leaf {
    slot: usize,
    sub_prim: u32,
    location: Vec3,
}

/// Spatial index of props
#[derive(Default)]
pub struct Partition {
    entries: Vec<Entry>,
    leaves: Vec<Leaf>,
    bvh: Bvh,
    dirty: bool,
}

impl Partition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the prop is already present
    pub fn insert_prop(&mut self, prop: SharedProp) -> bool {
        let id = prop.read().id();
        if self.contains(id) {
            return false;
        }

        log::debug!("Partition: inserted prop {:?}", id);
        self.entries.push(Entry { id, prop });
        self.dirty = true;
        true
    }

    pub fn remove_prop(&mut self, id: PropId) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };

        log::debug!("Partition: removed prop {:?}", id);
        self.entries.remove(slot);
        self.dirty = true;
        true
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("Partition: cleared {} props", self.entries.len());
        }
        self.entries.clear();
        self.leaves.clear();
        self.bvh.build(&[]);
        self.dirty = false;
    }

    pub fn contains(&self, id: PropId) -> bool {
        self.slot(id).is_some()
    }

    pub fn get(&self, id: PropId) -> Option<SharedProp> {
        self.slot(id).map(|slot| self.entries[slot].prop.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Props in insertion order
    pub fn props(&self) -> impl Iterator<Item = &SharedProp> {
        self.entries.iter().map(|e| &e.prop)
    }

    /// Bounds of some prop changed; reindex on the next query
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Same as `mark_dirty`, for a prop known to be present
    pub fn update_prop(&mut self, id: PropId) -> bool {
        let present = self.contains(id);
        if present {
            self.dirty = true;
        }
        present
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn slot(&self, id: PropId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn refresh(&mut self) {
        if !self.dirty {
            return;
        }

        self.leaves.clear();
        let mut bounds = Vec::new();
        let mut parts: Vec<SubPrimitive> = Vec::new();

        for (slot, entry) in self.entries.iter().enumerate() {
            parts.clear();
            entry.prop.read().sub_primitives(&mut parts);

            for part in parts.iter().filter(|p| !p.bounds.is_empty()) {
                self.leaves.push(Leaf {
                    slot,
                    sub_prim: part.id,
                    location: part.location,
                });
                bounds.push(part.bounds);
            }
        }

        self.bvh.build(&bounds);
        self.dirty = false;
        log::trace!(
            "Partition: rebuilt index ({} props, {} leaves)",
            self.entries.len(),
            self.leaves.len()
        );
    }

    /// Append results overlapping `volume` whose prop shares a capability
    /// with `mask`, skipping the prop `ignore`. Returns the number appended.
    pub fn gather_props(
        &mut self,
        buffer: &mut PartitionResultBuffer,
        ignore: Option<PropId>,
        volume: &CullVolume,
        mask: CapabilitySet,
    ) -> usize {
        self.refresh();

        let mut hits = Vec::new();
        match volume {
            CullVolume::Rect(rect) => self.bvh.query_rect(rect, &mut hits),
            CullVolume::Frustum(frustum) => self.bvh.query_frustum(frustum, &mut hits),
        }
        hits.sort_unstable();

        self.push_results(buffer, hits.into_iter(), ignore, mask)
    }

    /// Results whose bounds contain `point`
    pub fn gather_props_at_point(
        &mut self,
        buffer: &mut PartitionResultBuffer,
        ignore: Option<PropId>,
        point: Vec3,
        mask: CapabilitySet,
    ) -> usize {
        self.refresh();

        let mut hits = Vec::new();
        self.bvh.query_point(point, &mut hits);
        hits.sort_unstable();

        self.push_results(buffer, hits.into_iter(), ignore, mask)
    }

    /// Results hit by the ray, nearest first
    pub fn gather_props_on_ray(
        &mut self,
        buffer: &mut PartitionResultBuffer,
        ignore: Option<PropId>,
        origin: Vec3,
        direction: Vec3,
        mask: CapabilitySet,
    ) -> usize {
        self.refresh();

        let mut hits = Vec::new();
        self.bvh.query_ray(origin, direction, &mut hits);

        self.push_results(buffer, hits.into_iter().map(|(leaf, _)| leaf), ignore, mask)
    }

    fn push_results(
        &self,
        buffer: &mut PartitionResultBuffer,
        hits: impl Iterator<Item = usize>,
        ignore: Option<PropId>,
        mask: CapabilitySet,
    ) -> usize {
        let mut count = 0;
        for leaf in hits.map(|i| self.leaves[i]) {
            let entry = &self.entries[leaf.slot];
            if Some(entry.id) == ignore {
                continue;
            }

            let priority = {
                let prop = entry.prop.read();
                if !prop.capabilities().intersects(&mask) {
                    continue;
                }
                prop.priority()
            };

            buffer.push(PartitionResult {
                prop: entry.prop.clone(),
                prop_id: entry.id,
                sub_prim_id: leaf.sub_prim,
                priority,
                location: leaf.location,
                key: 0.0,
            });
            count += 1;
        }
        count
    }

    /// Outline the index structure
    pub fn draw_debug(&mut self, lines: &mut DebugLines) {
        if !lines.is_visible(DebugLineKind::PartitionCells) {
            return;
        }
        self.refresh();
        for bounds in self.bvh.node_bounds() {
            lines.push_aabb(DebugLineKind::PartitionCells, bounds);
        }
    }
}
