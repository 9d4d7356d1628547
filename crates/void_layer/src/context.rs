//! Per-draw context

use crate::debug_lines::DebugLines;
use crate::gfx::GfxDevice;
use crate::partition::PartitionResultPool;

/// Everything a layer and its props need while drawing.
///
/// Owned by the caller for the duration of a frame; nested layers reuse it.
pub struct DrawContext<'a> {
    pub gfx: &'a mut dyn GfxDevice,
    pub results: &'a mut PartitionResultPool,
    pub debug_lines: &'a mut DebugLines,
}

impl<'a> DrawContext<'a> {
    pub fn new(
        gfx: &'a mut dyn GfxDevice,
        results: &'a mut PartitionResultPool,
        debug_lines: &'a mut DebugLines,
    ) -> Self {
        Self {
            gfx,
            results,
            debug_lines,
        }
    }
}
