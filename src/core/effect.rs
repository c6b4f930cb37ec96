//! Effect context threaded through every step of the signal network.
//!
//! An [`Effect`] bundles three things:
//! - a read-only [`ReadData`] snapshot (window size, pointer, fonts, frame clock)
//! - an ordered action log, appended to by the request helpers
//! - the next fresh [`Uid`], borrowed mutably from the owning `AppData`
//!
//! Nothing here performs I/O. Requests are described as [`Action`]s and
//! executed by the frame stepper once the frame has been rendered.
//!
//! # Example
//! ```ignore
//! let (uid, actions, next) = run_effect(&env, Uid(0), |fx| {
//!     fx.info("loading splash");
//!     fx.load_image(PathBuf::from("splash.png"))
//! });
//! ```

use std::collections::HashMap;

use glam::{UVec2, Vec2};

use super::action::{Action, CursorCmd, CursorType, ImageSource};
use super::uid::Uid;

pub const LEGIBLE_FONT: &str = "legible";
pub const MONO_FONT: &str = "mono";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Proportional,
    Monospace,
}

/// Font descriptor handed to logic. Glyph data lives in the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: FontFamily,
    pub size: f32,
}

impl Font {
    pub fn new(family: FontFamily, size: f32) -> Self {
        Self { family, size }
    }
}

/// Fonts available to logic, keyed by role name.
#[derive(Debug, Clone, PartialEq)]
pub struct Fonts {
    entries: HashMap<String, Font>,
}

impl Default for Fonts {
    fn default() -> Self {
        Self::with_sizes(16.0, 14.0)
    }
}

impl Fonts {
    /// Legible + mono fonts at the given sizes.
    pub fn with_sizes(legible: f32, mono: f32) -> Self {
        let mut entries = HashMap::new();
        entries.insert(LEGIBLE_FONT.to_string(), Font::new(FontFamily::Proportional, legible));
        entries.insert(MONO_FONT.to_string(), Font::new(FontFamily::Monospace, mono));
        Self { entries }
    }

    pub fn insert(&mut self, name: impl Into<String>, font: Font) {
        self.entries.insert(name.into(), font);
    }

    pub fn get(&self, name: &str) -> Option<&Font> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-frame read-only snapshot. Rebuilt by the stepper, never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReadData {
    pub window_size: UVec2,
    pub cursor_pos: Vec2,
    pub fonts: Fonts,
    /// Index of the frame being stepped.
    pub frame: u64,
    /// Seconds elapsed since the previous frame.
    pub delta: f32,
}

/// Read/write/state context for one logic run.
pub struct Effect<'a> {
    env: &'a ReadData,
    next_uid: &'a mut Uid,
    actions: Vec<Action>,
}

impl<'a> Effect<'a> {
    pub fn new(env: &'a ReadData, next_uid: &'a mut Uid) -> Self {
        Self {
            env,
            next_uid,
            actions: Vec::new(),
        }
    }

    // ========== State ==========

    /// Hands out the next identifier. Never returns the same value twice.
    pub fn fresh(&mut self) -> Uid {
        self.next_uid.bump()
    }

    // ========== Reads ==========

    pub fn env(&self) -> &ReadData {
        self.env
    }

    pub fn window_size(&self) -> UVec2 {
        self.env.window_size
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.env.cursor_pos
    }

    pub fn font(&self, name: &str) -> Option<&Font> {
        self.env.fonts.get(name)
    }

    pub fn legible_font(&self) -> Option<&Font> {
        self.font(LEGIBLE_FONT)
    }

    pub fn mono_font(&self) -> Option<&Font> {
        self.font(MONO_FONT)
    }

    pub fn frame(&self) -> u64 {
        self.env.frame
    }

    pub fn delta(&self) -> f32 {
        self.env.delta
    }

    // ========== Writes ==========

    /// Appends a raw action.
    pub fn tell(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn info(&mut self, msg: impl Into<String>) {
        self.tell(Action::Log(msg.into()));
    }

    /// Requests an async decode and returns the uid its completion event will carry.
    pub fn load_image(&mut self, source: impl Into<ImageSource>) -> Uid {
        let uid = self.fresh();
        self.tell(Action::LoadImage {
            uid,
            source: source.into(),
        });
        uid
    }

    pub fn push_cursor(&mut self, cursor: CursorType) {
        self.tell(Action::SetCursor(CursorCmd::Push(cursor)));
    }

    pub fn pop_cursor(&mut self, cursor: CursorType) {
        self.tell(Action::SetCursor(CursorCmd::Pop(cursor)));
    }

    pub fn start_text_editing(&mut self) {
        self.tell(Action::SetTextEditing(true));
    }

    pub fn stop_text_editing(&mut self) {
        self.tell(Action::SetTextEditing(false));
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Ends the run, yielding the accumulated log.
    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }
}

/// Runs `f` against `env`, starting the counter at `next_uid`.
///
/// Returns the result, the action log in call order, and the advanced counter.
pub fn run_effect<T>(
    env: &ReadData,
    next_uid: Uid,
    f: impl FnOnce(&mut Effect<'_>) -> T,
) -> (T, Vec<Action>, Uid) {
    let mut uid = next_uid;
    let mut fx = Effect::new(env, &mut uid);
    let out = f(&mut fx);
    let actions = fx.into_actions();
    (out, actions, uid)
}
