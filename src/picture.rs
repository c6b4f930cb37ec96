//! Immutable per-frame display list handed to the renderer.

use std::sync::Arc;

use glam::Vec2;

use crate::core::effect::Font;
use crate::core::event::DecodedImage;
use crate::core::uid::Uid;

/// Axis-aligned rectangle in window points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Inclusive of the min edge, exclusive of the max edge.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.y >= self.min.y && p.x < self.max.x && p.y < self.max.y
    }

    pub fn shrink(&self, by: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(by),
            max: self.max - Vec2::splat(by),
        }
    }

    /// Largest rect with `aspect` (w/h) centered inside self.
    pub fn fit_aspect(&self, aspect: f32) -> Self {
        let size = self.size();
        if aspect <= 0.0 || size.x <= 0.0 || size.y <= 0.0 {
            return *self;
        }
        let fitted = if size.x / size.y > aspect {
            Vec2::new(size.y * aspect, size.y)
        } else {
            Vec2::new(size.x, size.x / aspect)
        };
        let min = self.min + (size - fitted) * 0.5;
        Self::from_pos_size(min, fitted)
    }
}

/// Unpremultiplied RGBA8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0, 255]);
    pub const GRAY: Color = Color([128, 128, 128, 255]);
    pub const RED: Color = Color([220, 50, 50, 255]);
    pub const TRANSPARENT: Color = Color([0, 0, 0, 0]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color([r, g, b, 255])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        rect: Rect,
        fill: Color,
        stroke: Option<(f32, Color)>,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Text {
        pos: Vec2,
        text: String,
        font: Font,
        color: Color,
    },
    /// Image from a completed load; the backend caches its texture by `uid`.
    Image {
        uid: Uid,
        image: Arc<DecodedImage>,
        rect: Rect,
    },
}

/// Ordered list of primitives, painted back to front.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Picture {
    pub prims: Vec<Primitive>,
}

impl Picture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rect(mut self, rect: Rect, fill: Color) -> Self {
        self.prims.push(Primitive::Rect {
            rect,
            fill,
            stroke: None,
        });
        self
    }

    pub fn outlined(mut self, rect: Rect, fill: Color, width: f32, stroke: Color) -> Self {
        self.prims.push(Primitive::Rect {
            rect,
            fill,
            stroke: Some((width, stroke)),
        });
        self
    }

    pub fn line(mut self, from: Vec2, to: Vec2, width: f32, color: Color) -> Self {
        self.prims.push(Primitive::Line {
            from,
            to,
            width,
            color,
        });
        self
    }

    pub fn text(mut self, pos: Vec2, text: impl Into<String>, font: Font, color: Color) -> Self {
        self.prims.push(Primitive::Text {
            pos,
            text: text.into(),
            font,
            color,
        });
        self
    }

    pub fn image(mut self, uid: Uid, image: Arc<DecodedImage>, rect: Rect) -> Self {
        self.prims.push(Primitive::Image { uid, image, rect });
        self
    }

    /// Paint `other` on top of self.
    pub fn over(mut self, other: Picture) -> Self {
        self.prims.extend(other.prims);
        self
    }

    pub fn len(&self) -> usize {
        self.prims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prims.is_empty()
    }
}
