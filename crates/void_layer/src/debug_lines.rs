//! Debug line overlay
//!
//! Props and physics hooks queue line segments while a layer draws; the
//! layer emits the queue once all props are dispatched. Every line belongs
//! to a `DebugLineKind` whose style decides whether it is drawn at all,
//! and in which color and width.
//!
//! # Example
//!
//! ```ignore
//! use void_layer::debug_lines::{DebugLines, DebugLineKind, DebugLineStyle};
//!
//! let mut lines = DebugLines::new();
//! lines.set_style(DebugLineKind::PropWorldBounds, DebugLineStyle::new([1.0, 0.0, 0.0, 1.0], 2.0));
//! ```

use std::collections::BTreeMap;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use void_math::{Aabb, Rect};

use crate::gfx::GfxDevice;

/// Line vertex as uploaded to the GPU
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct DebugVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// What a debug line visualizes
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugLineKind {
    /// Prop bounds in its own space
    PropModelBounds,
    /// Prop bounds in world space
    PropWorldBounds,
    /// Partition structure
    PartitionCells,
    /// Physics shapes from attached physics debug hooks
    PhysicsShapes,
}

impl DebugLineKind {
    pub const ALL: [DebugLineKind; 4] = [
        Self::PropModelBounds,
        Self::PropWorldBounds,
        Self::PartitionCells,
        Self::PhysicsShapes,
    ];
}

/// Color, width and visibility for one kind of line
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DebugLineStyle {
    pub color: [f32; 4],
    pub width: f32,
    pub visible: bool,
}

impl DebugLineStyle {
    /// Visible style
    pub fn new(color: [f32; 4], width: f32) -> Self {
        Self { color, width, visible: true }
    }

    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Default::default()
        }
    }
}

impl Default for DebugLineStyle {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            width: 1.0,
            visible: false,
        }
    }
}

/// Queued debug lines plus per-kind styles
#[derive(Clone, Debug, Default)]
pub struct DebugLines {
    styles: BTreeMap<DebugLineKind, DebugLineStyle>,
    pending: Vec<(DebugLineKind, Vec3, Vec3)>,
}

impl DebugLines {
    /// Every kind starts hidden
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_styles(styles: BTreeMap<DebugLineKind, DebugLineStyle>) -> Self {
        Self {
            styles,
            pending: Vec::new(),
        }
    }

    pub fn styles(&self) -> &BTreeMap<DebugLineKind, DebugLineStyle> {
        &self.styles
    }

    pub fn set_style(&mut self, kind: DebugLineKind, style: DebugLineStyle) {
        self.styles.insert(kind, style);
    }

    pub fn style(&self, kind: DebugLineKind) -> DebugLineStyle {
        self.styles.get(&kind).copied().unwrap_or_default()
    }

    /// Toggle visibility, keeping color and width
    pub fn show(&mut self, kind: DebugLineKind, visible: bool) {
        self.styles.entry(kind).or_default().visible = visible;
    }

    #[inline]
    pub fn is_visible(&self, kind: DebugLineKind) -> bool {
        self.styles.get(&kind).map_or(false, |s| s.visible)
    }

    /// Queue a segment; hidden kinds are dropped here
    pub fn push_line(&mut self, kind: DebugLineKind, from: Vec3, to: Vec3) {
        if self.is_visible(kind) {
            self.pending.push((kind, from, to));
        }
    }

    pub fn push_rect(&mut self, kind: DebugLineKind, rect: &Rect, z: f32) {
        if !self.is_visible(kind) {
            return;
        }
        let a = Vec3::new(rect.x_min, rect.y_min, z);
        let b = Vec3::new(rect.x_max, rect.y_min, z);
        let c = Vec3::new(rect.x_max, rect.y_max, z);
        let d = Vec3::new(rect.x_min, rect.y_max, z);
        for (from, to) in [(a, b), (b, c), (c, d), (d, a)] {
            self.pending.push((kind, from, to));
        }
    }

    /// Twelve edges of the box; flat boxes collapse to a rect
    pub fn push_aabb(&mut self, kind: DebugLineKind, aabb: &Aabb) {
        if !self.is_visible(kind) || aabb.is_empty() {
            return;
        }
        if aabb.min.z == aabb.max.z {
            self.push_rect(kind, &aabb.rect_xy(), aabb.min.z);
            return;
        }

        let c = aabb.corners();
        const EDGES: [(usize, usize); 12] = [
            (0, 1), (1, 3), (3, 2), (2, 0),
            (4, 5), (5, 7), (7, 6), (6, 4),
            (0, 4), (1, 5), (2, 6), (3, 7),
        ];
        for (i, j) in EDGES {
            self.pending.push((kind, c[i], c[j]));
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Drop lines queued after the first `len`
    pub fn truncate(&mut self, len: usize) {
        self.pending.truncate(len);
    }

    /// Emit queued lines, one batch per kind, and empty the queue
    pub fn draw(&mut self, gfx: &mut dyn GfxDevice) {
        if self.pending.is_empty() {
            return;
        }

        let mut vertices = Vec::with_capacity(self.pending.len() * 2);
        for kind in DebugLineKind::ALL {
            let style = self.style(kind);
            if !style.visible {
                continue;
            }

            vertices.clear();
            for (_, from, to) in self.pending.iter().filter(|(k, _, _)| *k == kind) {
                vertices.push(DebugVertex { position: from.to_array(), color: style.color });
                vertices.push(DebugVertex { position: to.to_array(), color: style.color });
            }
            gfx.draw_lines(&vertices, style.width);
        }

        log::trace!("Drew {} debug lines", self.pending.len());
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{GfxCommand, RecordingDevice};

    #[test]
    fn test_hidden_kinds_are_not_queued() {
        let mut lines = DebugLines::new();
        lines.push_line(DebugLineKind::PropWorldBounds, Vec3::ZERO, Vec3::X);
        assert_eq!(lines.pending_count(), 0);

        lines.show(DebugLineKind::PropWorldBounds, true);
        lines.push_line(DebugLineKind::PropWorldBounds, Vec3::ZERO, Vec3::X);
        assert_eq!(lines.pending_count(), 1);
    }

    #[test]
    fn test_aabb_edges() {
        let mut lines = DebugLines::new();
        lines.show(DebugLineKind::PartitionCells, true);

        lines.push_aabb(DebugLineKind::PartitionCells, &Aabb::new(Vec3::ZERO, Vec3::ONE));
        assert_eq!(lines.pending_count(), 12);

        lines.clear();
        let flat = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));
        lines.push_aabb(DebugLineKind::PartitionCells, &flat);
        assert_eq!(lines.pending_count(), 4);
    }

    #[test]
    fn test_draw_batches_per_kind_and_drains() {
        let mut lines = DebugLines::new();
        lines.set_style(DebugLineKind::PropWorldBounds, DebugLineStyle::new([1.0, 0.0, 0.0, 1.0], 2.0));
        lines.set_style(DebugLineKind::PhysicsShapes, DebugLineStyle::new([0.0, 1.0, 0.0, 1.0], 1.0));

        lines.push_line(DebugLineKind::PhysicsShapes, Vec3::ZERO, Vec3::Y);
        lines.push_line(DebugLineKind::PropWorldBounds, Vec3::ZERO, Vec3::X);
        lines.push_line(DebugLineKind::PropWorldBounds, Vec3::X, Vec3::ONE);

        let mut device = RecordingDevice::new();
        lines.draw(&mut device);

        assert_eq!(device.commands().len(), 2);
        match &device.commands()[0] {
            GfxCommand::Lines { vertices, width } => {
                assert_eq!(vertices.len(), 4);
                assert_eq!(*width, 2.0);
                assert_eq!(vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(lines.pending_count(), 0);
    }

    #[test]
    fn test_vertices_are_pod() {
        let v = DebugVertex { position: [1.0, 2.0, 3.0], color: [0.0; 4] };
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 28);
    }
}
