//! Core engine: events, effects, frame stepping and async loading.
//!
//! These modules are independent of any windowing library; the platform
//! layer plugs in through [`Backend`].

pub mod action;
pub mod app_data;
pub mod async_loads;
pub mod backend;
pub mod cursor_stack;
pub mod effect;
pub mod event;
pub mod event_queue;
pub mod stepper;
pub mod uid;
pub mod workers;

// Re-exports for convenience
pub use action::{Action, CursorCmd, CursorType, ImageSource};
pub use app_data::AppData;
pub use async_loads::{AsyncLoads, LoadError};
pub use backend::Backend;
pub use cursor_stack::{CursorDevice, CursorStack};
pub use effect::{run_effect, Effect, Font, FontFamily, Fonts, ReadData};
pub use event::{DecodedImage, Event, InputState, Key, LoadResult, Modifiers, MouseButton};
pub use event_queue::{EventQueue, EventSender};
pub use stepper::{FrameStepper, StepOutcome};
pub use uid::Uid;
pub use workers::Workers;
