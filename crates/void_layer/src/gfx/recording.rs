//! Headless graphics device that records every call

use glam::Mat4;
use void_math::{Frustum, Rect};

use super::{DrawCall, GfxDevice, TransformState, VertexTransform};
use crate::debug_lines::DebugVertex;
use crate::frame_buffer::FrameBuffer;

/// A recorded device call
#[derive(Clone, Debug, PartialEq)]
pub enum GfxCommand {
    ResetState,
    /// Label of the bound frame buffer, `None` for the main screen
    SetFrameBuffer(Option<String>),
    SetViewport(Rect),
    SetVertexTransform(VertexTransform, Mat4),
    UpdateViewVolume,
    Draw(DrawCall),
    Lines { vertices: Vec<DebugVertex>, width: f32 },
    Flush,
}

/// Device for tests, tools and headless runs
#[derive(Debug, Default)]
pub struct RecordingDevice {
    commands: Vec<GfxCommand>,
    transforms: TransformState,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[GfxCommand] {
        &self.commands
    }

    /// Drain recorded commands, keeping transform state
    pub fn take_commands(&mut self) -> Vec<GfxCommand> {
        core::mem::take(&mut self.commands)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn draw_calls(&self) -> impl Iterator<Item = &DrawCall> {
        self.commands.iter().filter_map(|c| match c {
            GfxCommand::Draw(call) => Some(call),
            _ => None,
        })
    }

    pub fn flush_count(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, GfxCommand::Flush)).count()
    }

    /// Total line vertices across all line batches
    pub fn line_vertex_count(&self) -> usize {
        self.commands
            .iter()
            .map(|c| match c {
                GfxCommand::Lines { vertices, .. } => vertices.len(),
                _ => 0,
            })
            .sum()
    }

    pub fn transforms(&self) -> &TransformState {
        &self.transforms
    }
}

impl GfxDevice for RecordingDevice {
    fn reset_state(&mut self) {
        self.transforms.reset();
        self.commands.push(GfxCommand::ResetState);
    }

    fn set_frame_buffer(&mut self, frame_buffer: Option<&FrameBuffer>) {
        self.commands
            .push(GfxCommand::SetFrameBuffer(frame_buffer.map(|fb| fb.label().to_string())));
    }

    fn set_viewport(&mut self, rect: Rect) {
        self.commands.push(GfxCommand::SetViewport(rect));
    }

    fn set_vertex_transform(&mut self, slot: VertexTransform, matrix: Mat4) {
        self.transforms.set(slot, matrix);
        self.commands.push(GfxCommand::SetVertexTransform(slot, matrix));
    }

    fn update_view_volume(&mut self) {
        self.transforms.update_view_volume();
        self.commands.push(GfxCommand::UpdateViewVolume);
    }

    fn view_volume(&self) -> &Frustum {
        self.transforms.view_volume()
    }

    fn submit_draw(&mut self, call: DrawCall) {
        self.commands.push(GfxCommand::Draw(call));
    }

    fn draw_lines(&mut self, vertices: &[DebugVertex], width: f32) {
        if vertices.is_empty() {
            return;
        }
        self.commands.push(GfxCommand::Lines {
            vertices: vertices.to_vec(),
            width,
        });
    }

    fn flush(&mut self) {
        self.commands.push(GfxCommand::Flush);
    }
}
