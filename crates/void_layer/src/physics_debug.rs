//! Physics debug hooks
//!
//! A layer holds at most one debug drawer per physics backend and runs them
//! before its props when debug lines are on. Having none is the normal case.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::debug_lines::DebugLines;
use crate::gfx::GfxDevice;

/// Physics backends a layer can host debug drawing for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicsBackend {
    Chipmunk,
    Box2D,
}

impl PhysicsBackend {
    /// Draw order within a layer
    pub const ALL: [PhysicsBackend; 2] = [Self::Chipmunk, Self::Box2D];

    pub(crate) fn slot(self) -> usize {
        match self {
            Self::Chipmunk => 0,
            Self::Box2D => 1,
        }
    }
}

impl fmt::Display for PhysicsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chipmunk => f.write_str("chipmunk"),
            Self::Box2D => f.write_str("box2d"),
        }
    }
}

/// Physics world that can outline its shapes.
///
/// Implementations either submit geometry to `gfx` directly or queue lines
/// (typically under `DebugLineKind::PhysicsShapes`). The layer emits the
/// queued lines and flushes the device after each drawer.
pub trait PhysicsDebugDraw: Send + Sync {
    fn draw_debug(&self, gfx: &mut dyn GfxDevice, lines: &mut DebugLines);
}
