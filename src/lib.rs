//! SPROCKET - reactive frame-stepping application core
//!
//! Re-exports all modules for use by binary targets.

// Core engine (events, effects, stepper, async loads)
pub mod core;
pub mod signal;

// Presentation
pub mod picture;
pub mod platform;
pub mod widgets;

// App modules
pub mod cli;
pub mod demo;
pub mod paths;
pub mod settings;
pub mod shell;

// Re-export commonly used types
pub use crate::core::{Action, Backend, Effect, Event, FrameStepper, StepOutcome, Uid};
pub use crate::picture::Picture;
pub use crate::signal::{Signal, Spline};
