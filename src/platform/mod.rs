//! eframe/egui adapter: input translation and picture rendering.

pub mod egui_backend;
pub mod egui_input;

pub use egui_backend::{EguiBackend, TextureCache};
pub use egui_input::InputTranslator;
