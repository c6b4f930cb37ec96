//! Image viewer network driven by the frame stepper.
//!
//! Architecture:
//! - a path [`TextField`] at the top; committing it requests a load
//! - dropping files on the window requests a load per file
//! - while any load is outstanding the wait cursor is pushed and a pulsing
//!   label is drawn
//! - a completed load replaces the view with the image, or with the error
//!   text; failures are reported once and never retried

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use glam::Vec2;

use crate::core::action::{CursorType, ImageSource};
use crate::core::effect::{Effect, Font};
use crate::core::event::{DecodedImage, Event, LoadResult};
use crate::core::uid::Uid;
use crate::picture::{Color, Picture, Rect};
use crate::signal::signal::ease_in_out_quad;
use crate::signal::{repeat, tween, tween_to, BoxSignal, Signal, Spline};
use crate::widgets::{hover_cursor, HoverCursor, TextField, TextFieldConfig};

const MARGIN: f32 = 12.0;
const FIELD_HEIGHT: f32 = 32.0;
const FIELD_WIDTH: f32 = 480.0;
const BACKGROUND: Color = Color::rgb(18, 18, 20);
const HINT: &str = "Drop an image here or type a path and press Enter";

/// What the view area currently shows.
#[derive(Debug, Clone)]
enum View {
    Hint,
    Image {
        uid: Uid,
        image: Arc<DecodedImage>,
        label: String,
    },
    Failed {
        label: String,
        message: String,
    },
}

/// One fade out and back in of the loading label.
fn pulse_cycle() -> impl Spline<Output = f32, Result = f32> {
    tween_to(tween(1.0, 0.3, 0.6, ease_in_out_quad))
        .then(|low| tween_to(tween(low, 1.0, 0.6, ease_in_out_quad)))
}

pub struct DemoApp {
    font: Font,
    initial: Vec<PathBuf>,
    started: bool,
    field: TextField,
    hover: HoverCursor,
    /// Outstanding loads and the label they were requested with.
    pending: HashMap<Uid, String>,
    view: View,
    pulse: BoxSignal<'static, (f32, Option<f32>)>,
}

impl DemoApp {
    pub fn new(initial: Vec<PathBuf>, font: Font) -> Self {
        let field_rect = Rect::from_pos_size(Vec2::splat(MARGIN), Vec2::new(FIELD_WIDTH, FIELD_HEIGHT));
        let config = TextFieldConfig {
            rect: field_rect,
            font: font.clone(),
            placeholder: "Image path".into(),
        };
        Self {
            font,
            initial,
            started: false,
            field: TextField::new(config, ""),
            hover: hover_cursor(field_rect, CursorType::IBeam),
            pending: HashMap::new(),
            view: View::Hint,
            pulse: repeat(pulse_cycle).boxed(),
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn request(&mut self, fx: &mut Effect<'_>, label: String, source: ImageSource) {
        let uid = fx.load_image(source);
        if self.pending.is_empty() {
            fx.push_cursor(CursorType::WaitArrow);
        }
        self.pending.insert(uid, label);
    }

    fn finish(&mut self, fx: &mut Effect<'_>, uid: Uid, result: &LoadResult) {
        let Some(label) = self.pending.remove(&uid) else {
            return;
        };
        if self.pending.is_empty() {
            fx.pop_cursor(CursorType::WaitArrow);
        }

        self.view = match result {
            Ok(image) => {
                fx.info(format!("Loaded {} ({}x{})", label, image.width, image.height));
                View::Image {
                    uid,
                    image: Arc::clone(image),
                    label,
                }
            }
            Err(message) => {
                fx.info(format!("Failed to load {}: {}", label, message));
                View::Failed {
                    label,
                    message: message.clone(),
                }
            }
        };
    }

    fn draw(&self, fx: &Effect<'_>, field: Picture, pulse: f32) -> Picture {
        let window = fx.window_size().as_vec2();
        let top = MARGIN * 2.0 + FIELD_HEIGHT;
        let area = Rect::new(Vec2::new(MARGIN, top), window - Vec2::splat(MARGIN));
        let caption = Vec2::new(MARGIN, window.y - MARGIN - self.font.size * 1.5);

        let mut pic = Picture::new().rect(Rect::new(Vec2::ZERO, window), BACKGROUND);

        pic = match &self.view {
            View::Hint => pic.text(area.min, HINT, self.font.clone(), Color::GRAY),
            View::Image { uid, image, label } => {
                let aspect = image.width as f32 / image.height.max(1) as f32;
                pic.image(*uid, Arc::clone(image), area.fit_aspect(aspect))
                    .text(caption, label.clone(), self.font.clone(), Color::GRAY)
            }
            View::Failed { label, message } => pic.text(
                area.min,
                format!("{}: {}", label, message),
                self.font.clone(),
                Color::RED,
            ),
        };

        if !self.pending.is_empty() {
            let alpha = (pulse.clamp(0.0, 1.0) * 255.0) as u8;
            let pos = Vec2::new(MARGIN * 2.0 + FIELD_WIDTH, MARGIN + 6.0);
            pic = pic.text(
                pos,
                format!("Loading\u{2026} ({})", self.pending.len()),
                self.font.clone(),
                Color([230, 230, 230, alpha]),
            );
        }

        pic.over(field)
    }
}

impl Signal for DemoApp {
    type Output = Picture;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> Picture {
        if !self.started {
            self.started = true;
            fx.info(format!("Viewer started, {} file(s) on the command line", self.initial.len()));
            for path in std::mem::take(&mut self.initial) {
                self.request(fx, path.display().to_string(), ImageSource::Path(path));
            }
        }

        match event {
            Event::FileDrop(path) => {
                self.request(fx, path.display().to_string(), ImageSource::Path(path.clone()))
            }
            Event::LoadImage { uid, result } => self.finish(fx, *uid, result),
            _ => {}
        }

        self.hover.step(fx, event);
        let (field, end) = self.field.step(fx, event);
        if let Some(end) = end {
            let path = end.text.trim();
            if end.committed && !path.is_empty() {
                self.request(fx, path.to_string(), ImageSource::Path(PathBuf::from(path)));
            }
        }

        let (pulse, _) = self.pulse.step(fx, event);
        self.draw(fx, field, pulse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, CursorCmd};
    use crate::core::effect::{run_effect, FontFamily, ReadData};
    use crate::core::event::{InputState, Key, Modifiers, MouseButton};
    use crate::picture::Primitive;

    fn app(files: &[&str]) -> DemoApp {
        DemoApp::new(
            files.iter().map(PathBuf::from).collect(),
            Font::new(FontFamily::Proportional, 16.0),
        )
    }

    fn step(app: &mut DemoApp, uid: Uid, events: &[Event]) -> (Vec<Picture>, Vec<Action>, Uid) {
        let env = ReadData::default();
        run_effect(&env, uid, |fx| events.iter().map(|ev| app.step(fx, ev)).collect())
    }

    fn loads(actions: &[Action]) -> Vec<Uid> {
        actions.iter().filter_map(Action::load_uid).collect()
    }

    fn image(w: u32, h: u32) -> Arc<DecodedImage> {
        Arc::new(DecodedImage {
            width: w,
            height: h,
            pixels: vec![255u8; (w * h * 4) as usize].into(),
        })
    }

    #[test]
    fn test_first_step_requests_cli_files() {
        let mut app = app(&["a.png", "b.png"]);
        let (_, actions, next) = step(&mut app, Uid(0), &[Event::Idle]);

        assert!(matches!(actions[0], Action::Log(_)));
        assert_eq!(loads(&actions), vec![Uid(0), Uid(1)]);
        let pushes = actions
            .iter()
            .filter(|a| **a == Action::SetCursor(CursorCmd::Push(CursorType::WaitArrow)))
            .count();
        assert_eq!(pushes, 1);
        assert_eq!(next, Uid(2));
        assert_eq!(app.pending(), 2);

        // Later frames do not request again
        let (_, actions, _) = step(&mut app, next, &[Event::Idle]);
        assert!(loads(&actions).is_empty());
    }

    #[test]
    fn test_failed_load_shows_error_without_retry() {
        let mut app = app(&[]);
        let (_, _, next) = step(&mut app, Uid(5), &[Event::FileDrop(PathBuf::from("bad.png"))]);
        assert_eq!(next, Uid(6));

        let done = Event::LoadImage {
            uid: Uid(5),
            result: Err("decode error".into()),
        };
        let (pics, actions, _) = step(&mut app, next, &[done, Event::Idle]);

        assert!(loads(&actions).is_empty());
        assert!(actions.contains(&Action::SetCursor(CursorCmd::Pop(CursorType::WaitArrow))));
        assert_eq!(app.pending(), 0);
        let red = pics[1].prims.iter().any(|p| match p {
            Primitive::Text { text, color, .. } => *color == Color::RED && text.contains("decode error"),
            _ => false,
        });
        assert!(red);
    }

    #[test]
    fn test_loaded_image_is_drawn() {
        let mut app = app(&["pic.png"]);
        let (_, _, next) = step(&mut app, Uid(0), &[Event::Idle]);
        let done = Event::LoadImage {
            uid: Uid(0),
            result: Ok(image(4, 2)),
        };
        let (pics, actions, _) = step(&mut app, next, &[done]);

        assert!(pics[0].prims.iter().any(|p| matches!(p, Primitive::Image { uid: Uid(0), .. })));
        assert!(actions.iter().any(|a| matches!(a, Action::Log(m) if m.contains("4x2"))));
    }

    #[test]
    fn test_unknown_completion_is_ignored() {
        let mut app = app(&[]);
        step(&mut app, Uid(0), &[Event::Idle]);
        let stray = Event::LoadImage {
            uid: Uid(42),
            result: Ok(image(1, 1)),
        };
        let (pics, actions, _) = step(&mut app, Uid(0), &[stray]);
        assert!(actions.is_empty());
        assert!(!pics[0].prims.iter().any(|p| matches!(p, Primitive::Image { .. })));
    }

    #[test]
    fn test_committed_path_requests_load() {
        let mut app = app(&[]);
        let click = Event::MouseButton {
            button: MouseButton::Left,
            state: InputState::Pressed,
            pos: Vec2::new(20.0, 20.0),
            clicks: 1,
        };
        let enter = Event::Key {
            key: Key::Enter,
            state: InputState::Pressed,
            repeat: false,
            modifiers: Modifiers::default(),
        };
        let (_, actions, _) = step(
            &mut app,
            Uid(0),
            &[click, Event::TextInput(" /tmp/x.png ".into()), enter],
        );

        assert_eq!(loads(&actions), vec![Uid(0)]);
        assert!(actions.contains(&Action::LoadImage {
            uid: Uid(0),
            source: ImageSource::Path(PathBuf::from("/tmp/x.png")),
        }));
        assert!(actions.contains(&Action::SetTextEditing(false)));
    }
}
