//! Cursor shape tied to a screen region.

use glam::Vec2;

use crate::core::action::CursorType;
use crate::core::effect::Effect;
use crate::core::event::Event;
use crate::picture::Rect;
use crate::signal::Signal;

/// Pushes `cursor` when the pointer enters `rect` and pops it on leave.
///
/// Outputs whether the pointer is inside. Every push is matched by exactly
/// one pop, so the cursor stack stays balanced.
#[derive(Debug, Clone)]
pub struct HoverCursor {
    rect: Rect,
    cursor: CursorType,
    inside: bool,
}

pub fn hover_cursor(rect: Rect, cursor: CursorType) -> HoverCursor {
    HoverCursor {
        rect,
        cursor,
        inside: false,
    }
}

impl HoverCursor {
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }
}

impl Signal for HoverCursor {
    type Output = bool;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> bool {
        let pos: Vec2 = match event {
            Event::MouseMotion { pos, .. } | Event::MouseButton { pos, .. } => *pos,
            _ => fx.mouse_position(),
        };

        let inside = self.rect.contains(pos);
        if inside != self.inside {
            if inside {
                fx.push_cursor(self.cursor);
            } else {
                fx.pop_cursor(self.cursor);
            }
            self.inside = inside;
        }
        inside
    }
}
