//! Closed input/system event model consumed by the signal network.
//!
//! Platform layers translate whatever their windowing library delivers into
//! [`Event`] before it enters the queue. Anything without a dedicated variant
//! travels as [`Event::Other`] so new platform event kinds never get rejected.

use std::path::PathBuf;
use std::sync::Arc;

use glam::{IVec2, Vec2};

use super::uid::Uid;

/// Pressed / released state shared by keys and buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputState {
    Pressed,
    Released,
}

impl InputState {
    pub fn from_pressed(pressed: bool) -> Self {
        if pressed { Self::Pressed } else { Self::Released }
    }

    pub fn is_pressed(self) -> bool {
        self == Self::Pressed
    }
}

/// Keyboard modifier snapshot at the time of the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub logo: bool,
}

/// Logical keys the widgets care about. Everything else is carried by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Space,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Named(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u8),
}

/// Joystick hat direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HatPosition {
    Centered,
    Up,
    Right,
    Down,
    Left,
    RightUp,
    RightDown,
    LeftUp,
    LeftDown,
}

/// Decoded RGBA8 bitmap delivered by an async image load.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major, unpremultiplied RGBA8, `width * height * 4` bytes.
    pub pixels: Arc<[u8]>,
}

impl DecodedImage {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Result payload of an image load: the bitmap, or the decoder's error message.
pub type LoadResult = Result<Arc<DecodedImage>, String>;

/// Input and system occurrences, in the order the platform produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Host timer tick carrying elapsed seconds.
    Time(f32),
    /// Host frame tick.
    Frame,
    Key {
        key: Key,
        state: InputState,
        repeat: bool,
        modifiers: Modifiers,
    },
    TextInput(String),
    FileDrop(PathBuf),
    MouseMotion {
        pos: Vec2,
        rel: Vec2,
    },
    MouseButton {
        button: MouseButton,
        state: InputState,
        pos: Vec2,
        clicks: u8,
    },
    MouseWheel {
        delta: Vec2,
    },
    JoyAxis {
        joystick: u32,
        axis: u8,
        value: i16,
    },
    JoyBall {
        joystick: u32,
        ball: u8,
        rel: IVec2,
    },
    JoyHat {
        joystick: u32,
        hat: u8,
        position: HatPosition,
    },
    JoyButton {
        joystick: u32,
        button: u8,
        state: InputState,
    },
    /// Completion of an async load requested under `uid`.
    LoadImage {
        uid: Uid,
        result: LoadResult,
    },
    Quit,
    /// Neutral event fed when a frame collected no input.
    Idle,
    /// Platform event without a dedicated variant.
    Other(String),
}

impl Event {
    /// Left button press at `pos`, if this is one.
    pub fn left_press(&self) -> Option<Vec2> {
        match self {
            Event::MouseButton {
                button: MouseButton::Left,
                state: InputState::Pressed,
                pos,
                ..
            } => Some(*pos),
            _ => None,
        }
    }

    /// True for a press (or auto-repeat) of `key`.
    pub fn is_key_press(&self, key: &Key) -> bool {
        matches!(self, Event::Key { key: k, state: InputState::Pressed, .. } if k == key)
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, Event::Quit)
    }
}
