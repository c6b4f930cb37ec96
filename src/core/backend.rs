//! Platform seam: windowing, rendering, cursors and text input.

use glam::{UVec2, Vec2};

use super::cursor_stack::CursorDevice;

/// What the frame stepper needs from the windowing/graphics layer.
///
/// Implementations clear, draw and present one picture per frame. Any error
/// they return is treated as fatal by the caller.
pub trait Backend: CursorDevice {
    type Picture;
    /// Backend-owned resources reused across frames (textures etc).
    type RenderCache: Default;

    fn render(&mut self, cache: &mut Self::RenderCache, picture: &Self::Picture) -> anyhow::Result<()>;

    fn window_size(&self) -> UVec2;

    fn cursor_position(&self) -> Vec2;

    /// True once the window asked to close.
    fn close_requested(&self) -> bool;

    /// Monotonic clock in seconds.
    fn now(&self) -> f64;

    /// Enable or disable platform text input (IME).
    fn set_text_editing(&mut self, enabled: bool);
}
