//! Offscreen render targets

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Render target a layer can draw into instead of the main screen.
///
/// The description exists before the backend allocates anything; the
/// backend handle is assigned by `realize`. Only a realized frame buffer
/// takes a layer offscreen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameBuffer {
    label: String,
    width: u32,
    height: u32,
    clear_color: Option<[f32; 4]>,
    #[serde(skip)]
    handle: Option<NonZeroU32>,
}

impl FrameBuffer {
    pub fn new(label: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            label: label.into(),
            width,
            height,
            clear_color: None,
            handle: None,
        }
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = Some(color);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn clear_color(&self) -> Option<[f32; 4]> {
        self.clear_color
    }

    /// Attach the backend object
    pub fn realize(&mut self, handle: NonZeroU32) {
        log::debug!("Frame buffer '{}' realized as {}", self.label, handle);
        self.handle = Some(handle);
    }

    /// Detach the backend object, returning it
    pub fn release(&mut self) -> Option<NonZeroU32> {
        self.handle.take()
    }

    pub fn handle(&self) -> Option<NonZeroU32> {
        self.handle
    }

    #[inline]
    pub fn is_realized(&self) -> bool {
        self.handle.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realize_and_release() {
        let mut fb = FrameBuffer::new("minimap", 256, 256).with_clear_color([0.0, 0.0, 0.0, 1.0]);
        assert!(!fb.is_realized());

        let handle = NonZeroU32::new(7).unwrap();
        fb.realize(handle);
        assert!(fb.is_realized());
        assert_eq!(fb.handle(), Some(handle));

        assert_eq!(fb.release(), Some(handle));
        assert!(!fb.is_realized());
    }

    #[test]
    fn test_handle_is_not_serialized() {
        let mut fb = FrameBuffer::new("shadow", 64, 32);
        fb.realize(NonZeroU32::new(3).unwrap());

        let json = serde_json::to_string(&fb).unwrap();
        let back: FrameBuffer = serde_json::from_str(&json).unwrap();
        assert_eq!(back.size(), (64, 32));
        assert!(!back.is_realized());
    }
}
