//! Translate egui raw input into [`Event`]s.

use eframe::egui;
use glam::Vec2;

use crate::core::event::{Event, InputState, Key, Modifiers, MouseButton};

fn vec2(p: egui::Pos2) -> Vec2 {
    Vec2::new(p.x, p.y)
}

pub fn map_key(key: egui::Key) -> Key {
    match key {
        egui::Key::Enter => Key::Enter,
        egui::Key::Escape => Key::Escape,
        egui::Key::Backspace => Key::Backspace,
        egui::Key::Delete => Key::Delete,
        egui::Key::Tab => Key::Tab,
        egui::Key::Space => Key::Space,
        egui::Key::ArrowLeft => Key::Left,
        egui::Key::ArrowRight => Key::Right,
        egui::Key::ArrowUp => Key::Up,
        egui::Key::ArrowDown => Key::Down,
        egui::Key::Home => Key::Home,
        egui::Key::End => Key::End,
        other => Key::Named(other.name().to_string()),
    }
}

pub fn map_modifiers(m: egui::Modifiers) -> Modifiers {
    Modifiers {
        shift: m.shift,
        ctrl: m.ctrl,
        alt: m.alt,
        logo: m.mac_cmd,
    }
}

pub fn map_button(button: egui::PointerButton) -> MouseButton {
    match button {
        egui::PointerButton::Primary => MouseButton::Left,
        egui::PointerButton::Secondary => MouseButton::Right,
        egui::PointerButton::Middle => MouseButton::Middle,
        egui::PointerButton::Extra1 => MouseButton::Other(4),
        egui::PointerButton::Extra2 => MouseButton::Other(5),
    }
}

/// Stateful translator; remembers the pointer to compute relative motion.
#[derive(Debug, Default)]
pub struct InputTranslator {
    last_pointer: Option<Vec2>,
    quit_sent: bool,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events for one egui frame.
    ///
    /// egui keeps dropped files apart from its event list with no relative
    /// timestamp, so they come first, followed by the frame's other input
    /// in the order egui recorded it. A close request adds one `Quit` at the
    /// end, only the first time it is seen.
    pub fn translate(&mut self, input: &egui::InputState) -> Vec<Event> {
        let mut out = Vec::with_capacity(input.events.len());

        for file in &input.raw.dropped_files {
            if let Some(path) = &file.path {
                out.push(Event::FileDrop(path.clone()));
            }
        }

        for ev in &input.events {
            if let Some(event) = self.translate_one(ev) {
                out.push(event);
            }
        }

        if input.viewport().close_requested() && !self.quit_sent {
            self.quit_sent = true;
            out.push(Event::Quit);
        }
        out
    }

    fn translate_one(&mut self, ev: &egui::Event) -> Option<Event> {
        let event = match ev {
            egui::Event::Key {
                key,
                pressed,
                repeat,
                modifiers,
                ..
            } => Event::Key {
                key: map_key(*key),
                state: InputState::from_pressed(*pressed),
                repeat: *repeat,
                modifiers: map_modifiers(*modifiers),
            },
            egui::Event::Text(text) => Event::TextInput(text.clone()),
            egui::Event::Ime(egui::ImeEvent::Commit(text)) => Event::TextInput(text.clone()),
            egui::Event::PointerMoved(p) => {
                let pos = vec2(*p);
                let rel = self.last_pointer.map(|last| pos - last).unwrap_or(Vec2::ZERO);
                self.last_pointer = Some(pos);
                Event::MouseMotion { pos, rel }
            }
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => Event::MouseButton {
                button: map_button(*button),
                state: InputState::from_pressed(*pressed),
                pos: vec2(*pos),
                clicks: 1,
            },
            egui::Event::MouseWheel { delta, .. } => Event::MouseWheel {
                delta: Vec2::new(delta.x, delta.y),
            },
            // Pointer leaves are frequent and carry nothing the core models
            egui::Event::PointerGone => {
                self.last_pointer = None;
                return None;
            }
            other => Event::Other(format!("{:?}", other)),
        };
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key(egui::Key::Enter), Key::Enter);
        assert_eq!(map_key(egui::Key::ArrowLeft), Key::Left);
        assert_eq!(map_key(egui::Key::A), Key::Named("A".into()));
    }

    #[test]
    fn test_pointer_motion_is_relative() {
        let mut tr = InputTranslator::new();
        let first = tr.translate_one(&egui::Event::PointerMoved(egui::pos2(10.0, 10.0)));
        let second = tr.translate_one(&egui::Event::PointerMoved(egui::pos2(13.0, 6.0)));
        assert_eq!(
            first,
            Some(Event::MouseMotion {
                pos: Vec2::new(10.0, 10.0),
                rel: Vec2::ZERO
            })
        );
        assert_eq!(
            second,
            Some(Event::MouseMotion {
                pos: Vec2::new(13.0, 6.0),
                rel: Vec2::new(3.0, -4.0)
            })
        );
    }

    /// Run one headless egui frame over `raw` and translate its input.
    fn frame(ctx: &egui::Context, tr: &mut InputTranslator, raw: egui::RawInput) -> Vec<Event> {
        let mut out = Vec::new();
        let _ = ctx.run(raw, |ctx| {
            out = ctx.input(|i| tr.translate(i));
        });
        out
    }

    fn close_request() -> egui::RawInput {
        let mut raw = egui::RawInput::default();
        raw.viewports.insert(
            egui::ViewportId::ROOT,
            egui::ViewportInfo {
                events: vec![egui::ViewportEvent::Close],
                ..Default::default()
            },
        );
        raw
    }

    #[test]
    fn test_dropped_files_become_file_drops() {
        let ctx = egui::Context::default();
        let mut tr = InputTranslator::new();
        let raw = egui::RawInput {
            dropped_files: vec![
                egui::DroppedFile {
                    path: Some(PathBuf::from("/tmp/a.png")),
                    ..Default::default()
                },
                // Web-style drops carry bytes only and are skipped
                egui::DroppedFile {
                    name: "b.png".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let events = frame(&ctx, &mut tr, raw);
        assert_eq!(events, vec![Event::FileDrop(PathBuf::from("/tmp/a.png"))]);
    }

    #[test]
    fn test_close_request_quits_once() {
        let ctx = egui::Context::default();
        let mut tr = InputTranslator::new();

        let first = frame(&ctx, &mut tr, close_request());
        assert_eq!(first.iter().filter(|e| e.is_quit()).count(), 1);
        assert_eq!(first.last(), Some(&Event::Quit));

        let second = frame(&ctx, &mut tr, close_request());
        assert!(!second.iter().any(Event::is_quit));
    }

    #[test]
    fn test_frame_order_drops_then_input_then_quit() {
        let ctx = egui::Context::default();
        let mut tr = InputTranslator::new();
        let mut raw = close_request();
        raw.dropped_files.push(egui::DroppedFile {
            path: Some(PathBuf::from("/tmp/c.png")),
            ..Default::default()
        });
        raw.events = vec![
            egui::Event::Text("x".into()),
            egui::Event::Key {
                key: egui::Key::Enter,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::default(),
            },
        ];

        let events = frame(&ctx, &mut tr, raw);
        assert_eq!(
            events,
            vec![
                Event::FileDrop(PathBuf::from("/tmp/c.png")),
                Event::TextInput("x".into()),
                Event::Key {
                    key: Key::Enter,
                    state: InputState::Pressed,
                    repeat: false,
                    modifiers: Modifiers::default(),
                },
                Event::Quit,
            ]
        );
    }

    #[test]
    fn test_unknown_events_pass_through_as_other() {
        let mut tr = InputTranslator::new();
        let ev = tr.translate_one(&egui::Event::WindowFocused(true));
        assert!(matches!(ev, Some(Event::Other(_))));
        assert_eq!(tr.translate_one(&egui::Event::PointerGone), None);
    }
}
