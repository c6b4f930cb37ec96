//! Continuous reactive values.
//!
//! A [`Signal`] always has a current value. The network steps it once per
//! delivered event and it answers with its value after seeing that event.
//! Time-driven signals read the frame clock from the effect context and
//! advance once per frame, however many events the frame carried.

use glam::Vec2;

use crate::core::effect::Effect;
use crate::core::event::Event;

use super::spline::Until;

pub trait Signal {
    type Output;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> Self::Output;

    fn map<B, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Output) -> B,
    {
        Map { signal: self, f }
    }

    /// Step both signals on every event, pairing their outputs.
    fn zip<S>(self, other: S) -> Zip<Self, S>
    where
        Self: Sized,
        S: Signal,
    {
        Zip { a: self, b: other }
    }

    /// Turn into a spline that completes once `f` yields a result.
    fn until<R, F>(self, f: F) -> Until<Self, F>
    where
        Self: Sized,
        F: FnMut(&mut Effect<'_>, &Event, &Self::Output) -> Option<R>,
    {
        Until::new(self, f)
    }

    fn boxed<'a>(self) -> BoxSignal<'a, Self::Output>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

pub type BoxSignal<'a, T> = Box<dyn Signal<Output = T> + 'a>;

impl<S: Signal + ?Sized> Signal for Box<S> {
    type Output = S::Output;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> S::Output {
        (**self).step(fx, event)
    }
}

// ============================================================================
// Sources
// ============================================================================

#[derive(Debug, Clone)]
pub struct Constant<T>(T);

pub fn constant<T: Clone>(value: T) -> Constant<T> {
    Constant(value)
}

impl<T: Clone> Signal for Constant<T> {
    type Output = T;

    fn step(&mut self, _fx: &mut Effect<'_>, _event: &Event) -> T {
        self.0.clone()
    }
}

pub struct FromFn<F>(F);

/// Signal computed from each event by `f`.
pub fn from_fn<T, F>(f: F) -> FromFn<F>
where
    F: FnMut(&mut Effect<'_>, &Event) -> T,
{
    FromFn(f)
}

impl<T, F> Signal for FromFn<F>
where
    F: FnMut(&mut Effect<'_>, &Event) -> T,
{
    type Output = T;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> T {
        (self.0)(fx, event)
    }
}

/// Accumulator over the event history.
pub struct Fold<T, F> {
    state: T,
    f: F,
}

pub fn fold<T, F>(init: T, f: F) -> Fold<T, F>
where
    T: Clone,
    F: FnMut(&mut T, &mut Effect<'_>, &Event),
{
    Fold { state: init, f }
}

impl<T, F> Signal for Fold<T, F>
where
    T: Clone,
    F: FnMut(&mut T, &mut Effect<'_>, &Event),
{
    type Output = T;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> T {
        (self.f)(&mut self.state, fx, event);
        self.state.clone()
    }
}

/// Latest value picked out of the event stream, `init` until the first one.
pub struct Hold<T, F> {
    value: T,
    pick: F,
}

pub fn hold<T, F>(init: T, pick: F) -> Hold<T, F>
where
    T: Clone,
    F: FnMut(&Event) -> Option<T>,
{
    Hold { value: init, pick }
}

impl<T, F> Signal for Hold<T, F>
where
    T: Clone,
    F: FnMut(&Event) -> Option<T>,
{
    type Output = T;

    fn step(&mut self, _fx: &mut Effect<'_>, event: &Event) -> T {
        if let Some(v) = (self.pick)(event) {
            self.value = v;
        }
        self.value.clone()
    }
}

/// Pointer position, tracked from motion and button events.
pub fn pointer(init: Vec2) -> impl Signal<Output = Vec2> {
    hold(init, |ev| match ev {
        Event::MouseMotion { pos, .. } | Event::MouseButton { pos, .. } => Some(*pos),
        _ => None,
    })
}

/// Seconds since the signal first ran.
///
/// The first frame observed only anchors the clock; later frames add their
/// delta exactly once.
#[derive(Debug, Clone, Default)]
pub struct Elapsed {
    total: f32,
    last_frame: Option<u64>,
}

pub fn elapsed() -> Elapsed {
    Elapsed::default()
}

impl Elapsed {
    fn advance(&mut self, fx: &Effect<'_>) -> f32 {
        let frame = fx.frame();
        if self.last_frame.is_some_and(|last| last != frame) {
            self.total += fx.delta();
        }
        self.last_frame = Some(frame);
        self.total
    }
}

impl Signal for Elapsed {
    type Output = f32;

    fn step(&mut self, fx: &mut Effect<'_>, _event: &Event) -> f32 {
        self.advance(fx)
    }
}

// ============================================================================
// Interpolation
// ============================================================================

pub trait Lerp: Clone {
    fn lerp(&self, to: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, to: &f32, t: f32) -> f32 {
        self + (to - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(&self, to: &Vec2, t: f32) -> Vec2 {
        Vec2::lerp(*self, *to, t)
    }
}

pub type Easing = fn(f32) -> f32;

pub fn linear(t: f32) -> f32 {
    t
}

pub fn ease_in_quad(t: f32) -> f32 {
    t * t
}

pub fn ease_out_quad(t: f32) -> f32 {
    t * (2.0 - t)
}

pub fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Eased interpolation from `from` to `to` over `duration` seconds.
pub struct Tween<T> {
    from: T,
    to: T,
    duration: f32,
    easing: Easing,
    clock: Elapsed,
    progress: f32,
}

pub fn tween<T: Lerp>(from: T, to: T, duration: f32, easing: Easing) -> Tween<T> {
    Tween {
        from,
        to,
        duration,
        easing,
        clock: Elapsed::default(),
        progress: 0.0,
    }
}

impl<T: Lerp> Tween<T> {
    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    pub fn target(&self) -> &T {
        &self.to
    }
}

impl<T: Lerp> Signal for Tween<T> {
    type Output = T;

    fn step(&mut self, fx: &mut Effect<'_>, _event: &Event) -> T {
        let t = self.clock.advance(fx);
        self.progress = if self.duration <= 0.0 {
            1.0
        } else {
            (t / self.duration).clamp(0.0, 1.0)
        };
        self.from.lerp(&self.to, (self.easing)(self.progress))
    }
}

// ============================================================================
// Adapters
// ============================================================================

pub struct Map<S, F> {
    signal: S,
    f: F,
}

impl<S, F, B> Signal for Map<S, F>
where
    S: Signal,
    F: FnMut(S::Output) -> B,
{
    type Output = B;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> B {
        (self.f)(self.signal.step(fx, event))
    }
}

pub struct Zip<A, B> {
    a: A,
    b: B,
}

impl<A: Signal, B: Signal> Signal for Zip<A, B> {
    type Output = (A::Output, B::Output);

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> Self::Output {
        let a = self.a.step(fx, event);
        let b = self.b.step(fx, event);
        (a, b)
    }
}
