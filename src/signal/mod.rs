//! Reactive layer: signals (always-defined values) and splines (phase machines).

pub mod signal;
pub mod spline;

pub use signal::{
    constant, elapsed, fold, from_fn, hold, pointer, tween, BoxSignal, Easing, Elapsed, Lerp,
    Signal, Tween,
};
pub use spline::{
    delay, pure, repeat, tween_to, wait_for, BoxSpline, Either, Repeat, Spline, SplineSignal, Step,
};
