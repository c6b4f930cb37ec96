//! `Backend` on top of eframe/egui.
//!
//! Pictures are painted into the background layer of the current egui frame,
//! so `render` must be called from inside `eframe::App::update`. Decoded
//! images become egui textures cached by load uid and dropped as soon as a
//! frame stops showing them.

use std::collections::{HashMap, HashSet};

use eframe::egui;
use glam::{UVec2, Vec2};
use log::{debug, trace, warn};

use crate::core::action::CursorType;
use crate::core::backend::Backend;
use crate::core::cursor_stack::CursorDevice;
use crate::core::effect::FontFamily;
use crate::core::event::DecodedImage;
use crate::core::uid::Uid;
use crate::picture::{Color, Picture, Primitive, Rect};

// ====== Conversions ======

fn pos2(v: Vec2) -> egui::Pos2 {
    egui::pos2(v.x, v.y)
}

fn rect(r: Rect) -> egui::Rect {
    egui::Rect::from_min_max(pos2(r.min), pos2(r.max))
}

fn color(c: Color) -> egui::Color32 {
    let [r, g, b, a] = c.0;
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn family(f: FontFamily) -> egui::FontFamily {
    match f {
        FontFamily::Proportional => egui::FontFamily::Proportional,
        FontFamily::Monospace => egui::FontFamily::Monospace,
    }
}

pub fn cursor_icon(cursor: CursorType) -> egui::CursorIcon {
    use egui::CursorIcon as C;
    match cursor {
        CursorType::Arrow => C::Default,
        CursorType::IBeam => C::Text,
        CursorType::Wait => C::Wait,
        CursorType::Crosshair => C::Crosshair,
        CursorType::WaitArrow => C::Progress,
        CursorType::SizeNWSE => C::ResizeNwSe,
        CursorType::SizeNESW => C::ResizeNeSw,
        CursorType::SizeWE => C::ResizeHorizontal,
        CursorType::SizeNS => C::ResizeVertical,
        CursorType::SizeAll => C::Move,
        CursorType::No => C::NotAllowed,
        CursorType::Hand => C::PointingHand,
    }
}

// ====== Texture upload ======

/// Largest size with the same aspect whose sides fit in `max_side`.
pub fn texture_size(width: u32, height: u32, max_side: usize) -> (u32, u32) {
    let max = u32::try_from(max_side).unwrap_or(u32::MAX).max(1);
    if width <= max && height <= max {
        return (width, height);
    }
    let scale = max as f64 / width.max(height) as f64;
    let fit = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max);
    (fit(width), fit(height))
}

/// Pixels for upload, downscaled when the GPU cannot hold the full image.
fn color_image(image: &DecodedImage, max_side: usize) -> egui::ColorImage {
    let (w, h) = texture_size(image.width, image.height, max_side);
    let expected = image.width as usize * image.height as usize * 4;
    if image.pixels.len() != expected {
        warn!(
            "Image {}x{} has {} bytes instead of {}, showing nothing",
            image.width,
            image.height,
            image.pixels.len(),
            expected
        );
        return egui::ColorImage::from_rgba_unmultiplied([1, 1], &[0, 0, 0, 0]);
    }
    if (w, h) == (image.width, image.height) {
        return egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &image.pixels);
    }

    debug!(
        "Downscaling {}x{} to {}x{} (max texture side {})",
        image.width, image.height, w, h, max_side
    );
    let full = image::ImageBuffer::<image::Rgba<u8>, &[u8]>::from_raw(image.width, image.height, &image.pixels[..]);
    match full {
        Some(full) => {
            let small = image::imageops::resize(&full, w, h, image::imageops::FilterType::Triangle);
            egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], small.as_raw())
        }
        None => egui::ColorImage::from_rgba_unmultiplied([1, 1], &[0, 0, 0, 0]),
    }
}

// ====== Texture cache ======

/// GPU textures for the images of recent pictures, keyed by load uid.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<Uid, egui::TextureHandle>,
}

impl TextureCache {
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Drop every texture whose uid is not in `keep`.
    fn retain(&mut self, keep: &HashSet<Uid>) {
        let before = self.textures.len();
        self.textures.retain(|uid, _| keep.contains(uid));
        let evicted = before - self.textures.len();
        if evicted > 0 {
            debug!("Evicted {} texture(s)", evicted);
        }
    }
}

// ====== Backend ======

pub struct EguiBackend {
    ctx: egui::Context,
    window_size: UVec2,
    pointer: Vec2,
    close_requested: bool,
    time: f64,
    /// Cursor egui should show; reapplied every frame since egui resets it.
    cursor: Option<egui::CursorIcon>,
    ime_allowed: bool,
}

impl EguiBackend {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            window_size: UVec2::ZERO,
            pointer: Vec2::ZERO,
            close_requested: false,
            time: 0.0,
            cursor: None,
            ime_allowed: false,
        }
    }

    /// Snapshot window and pointer state from this frame's input.
    pub fn sync(&mut self, input: &egui::InputState) {
        let size = input.viewport_rect().size();
        self.window_size = UVec2::new(size.x.max(0.0) as u32, size.y.max(0.0) as u32);
        if let Some(p) = input.pointer.latest_pos() {
            self.pointer = Vec2::new(p.x, p.y);
        }
        self.close_requested |= input.viewport().close_requested();
        self.time = input.time;
    }

    fn texture(&self, cache: &mut TextureCache, uid: Uid, image: &DecodedImage) -> egui::TextureId {
        cache
            .textures
            .entry(uid)
            .or_insert_with(|| {
                let max_side = self.ctx.input(|i| i.max_texture_side);
                trace!("Uploading texture for load {} ({}x{})", uid, image.width, image.height);
                self.ctx.load_texture(
                    format!("load-{}", uid.0),
                    color_image(image, max_side),
                    egui::TextureOptions::LINEAR,
                )
            })
            .id()
    }
}

impl CursorDevice for EguiBackend {
    type Cursor = egui::CursorIcon;

    fn create_cursor(&mut self, cursor: CursorType) -> egui::CursorIcon {
        cursor_icon(cursor)
    }

    fn show_cursor(&mut self, cursor: &egui::CursorIcon) {
        self.cursor = Some(*cursor);
        self.ctx.set_cursor_icon(*cursor);
    }

    // egui cursor icons are plain values, nothing to free
    fn destroy_cursor(&mut self, _cursor: egui::CursorIcon) {}

    fn show_default_cursor(&mut self) {
        self.cursor = None;
        self.ctx.set_cursor_icon(egui::CursorIcon::Default);
    }
}

impl Backend for EguiBackend {
    type Picture = Picture;
    type RenderCache = TextureCache;

    fn render(&mut self, cache: &mut TextureCache, picture: &Picture) -> anyhow::Result<()> {
        let painter = self.ctx.layer_painter(egui::LayerId::background());
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        let mut shown = HashSet::new();

        for prim in &picture.prims {
            match prim {
                Primitive::Rect { rect: r, fill, stroke } => {
                    painter.rect_filled(rect(*r), 0.0, color(*fill));
                    if let Some((width, c)) = stroke {
                        painter.rect_stroke(
                            rect(*r),
                            0.0,
                            egui::Stroke::new(*width, color(*c)),
                            egui::StrokeKind::Inside,
                        );
                    }
                }
                Primitive::Line { from, to, width, color: c } => {
                    painter.line_segment([pos2(*from), pos2(*to)], egui::Stroke::new(*width, color(*c)));
                }
                Primitive::Text { pos, text, font, color: c } => {
                    painter.text(
                        pos2(*pos),
                        egui::Align2::LEFT_TOP,
                        text,
                        egui::FontId::new(font.size, family(font.family)),
                        color(*c),
                    );
                }
                Primitive::Image { uid, image, rect: r } => {
                    let id = self.texture(cache, *uid, image);
                    painter.image(id, rect(*r), uv, egui::Color32::WHITE);
                    shown.insert(*uid);
                }
            }
        }

        cache.retain(&shown);
        if let Some(icon) = self.cursor {
            self.ctx.set_cursor_icon(icon);
        }
        Ok(())
    }

    fn window_size(&self) -> UVec2 {
        self.window_size
    }

    fn cursor_position(&self) -> Vec2 {
        self.pointer
    }

    fn close_requested(&self) -> bool {
        self.close_requested
    }

    fn now(&self) -> f64 {
        self.time
    }

    fn set_text_editing(&mut self, enabled: bool) {
        if self.ime_allowed != enabled {
            debug!("Text input {}", if enabled { "on" } else { "off" });
            self.ime_allowed = enabled;
            self.ctx.send_viewport_cmd(egui::ViewportCommand::IMEAllowed(enabled));
        }
    }
}
