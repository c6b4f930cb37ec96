//! Single-line text field built from splines.
//!
//! Phases:
//! - idle: draws the text, waits for a click inside the field or Tab
//! - editing: feeds input to a [`TextBuffer`] until Enter (commit), Escape
//!   (cancel) or a click outside the field (commit)
//!
//! Entering editing requests platform text input; leaving releases it.

use glam::Vec2;

use crate::core::effect::{Effect, Font};
use crate::core::event::{Event, Key};
use crate::picture::{Color, Picture, Rect};
use crate::signal::{wait_for, BoxSpline, Signal, Spline, Step};

use super::text_edit::TextBuffer;

const PADDING: f32 = 6.0;
const CARET: char = '|';

#[derive(Debug, Clone, PartialEq)]
pub struct TextFieldConfig {
    pub rect: Rect,
    pub font: Font,
    pub placeholder: String,
}

/// How an editing session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEnd {
    pub text: String,
    pub committed: bool,
}

fn draw(config: &TextFieldConfig, display: &str, active: bool) -> Picture {
    let border = if active { Color::WHITE } else { Color::GRAY };
    let pos = config.rect.min + Vec2::splat(PADDING);
    let pic = Picture::new().outlined(config.rect, Color::rgb(28, 28, 32), 1.0, border);

    if display.is_empty() && !active {
        pic.text(pos, config.placeholder.clone(), config.font.clone(), Color::GRAY)
    } else {
        pic.text(pos, display, config.font.clone(), Color::WHITE)
    }
}

/// Completes when the field gains focus, requesting text input as it does.
pub fn focus(rect: Rect) -> impl Spline<Output = (), Result = ()> {
    let clicked = wait_for(move |fx: &mut Effect<'_>, ev: &Event| {
        let inside = ev.left_press().is_some_and(|p| rect.contains(p));
        inside.then(|| fx.start_text_editing())
    });
    let tabbed = wait_for(|fx: &mut Effect<'_>, ev: &Event| {
        ev.is_key_press(&Key::Tab).then(|| fx.start_text_editing())
    });

    clicked.race(tabbed).map_output(|_| ()).map_result(|_| ())
}

/// Active editing phase.
pub struct Editing {
    config: TextFieldConfig,
    original: String,
    buf: TextBuffer,
}

impl Editing {
    pub fn new(config: TextFieldConfig, text: String) -> Self {
        Self {
            config,
            buf: TextBuffer::new(text.clone()),
            original: text,
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buf
    }
}

impl Spline for Editing {
    type Output = Picture;
    type Result = FieldEnd;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> Step<Picture, FieldEnd> {
        let clicked_outside = event.left_press().is_some_and(|p| !self.config.rect.contains(p));

        let end = if event.is_key_press(&Key::Enter) || clicked_outside {
            Some(FieldEnd {
                text: self.buf.text().to_string(),
                committed: true,
            })
        } else if event.is_key_press(&Key::Escape) {
            Some(FieldEnd {
                text: self.original.clone(),
                committed: false,
            })
        } else {
            self.buf.handle(event);
            None
        };

        match end {
            Some(end) => {
                fx.stop_text_editing();
                Step::done(draw(&self.config, &end.text, false), end)
            }
            None => Step::pending(draw(&self.config, &self.buf.with_caret(CARET), true)),
        }
    }
}

/// One idle -> editing session, completing when editing ends.
pub fn text_field(
    config: TextFieldConfig,
    text: String,
) -> impl Spline<Output = Picture, Result = FieldEnd> {
    let idle = draw(&config, &text, false);
    focus(config.rect)
        .map_output(move |_| idle.clone())
        .then(move |_| Editing::new(config, text))
}

/// Text field that starts a new session after each one ends, keeping the
/// last committed text.
pub struct TextField {
    config: TextFieldConfig,
    text: String,
    session: BoxSpline<'static, Picture, FieldEnd>,
}

impl TextField {
    pub fn new(config: TextFieldConfig, text: impl Into<String>) -> Self {
        let text = text.into();
        let session = text_field(config.clone(), text.clone()).boxed();
        Self {
            config,
            text,
            session,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rect(&self) -> Rect {
        self.config.rect
    }
}

impl Signal for TextField {
    type Output = (Picture, Option<FieldEnd>);

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> Self::Output {
        let step = self.session.step(fx, event);
        if let Some(end) = &step.done {
            self.text = end.text.clone();
            self.session = text_field(self.config.clone(), self.text.clone()).boxed();
        }
        (step.output, step.done)
    }
}
