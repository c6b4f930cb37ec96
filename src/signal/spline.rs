//! Discrete phase machines.
//!
//! A [`Spline`] produces an output for every event like a signal, and at some
//! event also completes with a result. Phases suspend between events: nothing
//! runs until the next event is delivered, and no phase may block.
//!
//! Composition:
//! - [`Spline::then`] sequences phases. The next phase is built from the
//!   previous result and first runs on the event after completion.
//! - [`Spline::race`] runs two phases side by side. The first to complete
//!   wins; on a tie the left one does.
//! - [`Spline::into_signal`] and [`repeat`] turn phase machines back into
//!   signals.
//!
//! # Example
//! ```ignore
//! // Wait for a click, then count text input until Enter.
//! let clicked = wait_for(|_fx, ev| ev.left_press());
//! let typing = |_| fold(0, |n, _fx, ev| if let Event::TextInput(_) = ev { *n += 1 })
//!     .until(|_fx, ev, n| ev.is_key_press(&Key::Enter).then_some(*n));
//! let machine = clicked.map_output(|_| 0).then(typing);
//! ```

use crate::core::effect::Effect;
use crate::core::event::Event;

use super::signal::{Elapsed, Lerp, Signal, Tween};

/// Output of one spline step, with the result when the phase completed.
#[derive(Debug, Clone, PartialEq)]
pub struct Step<O, R> {
    pub output: O,
    pub done: Option<R>,
}

impl<O, R> Step<O, R> {
    pub fn pending(output: O) -> Self {
        Self { output, done: None }
    }

    pub fn done(output: O, result: R) -> Self {
        Self {
            output,
            done: Some(result),
        }
    }

    pub fn is_done(&self) -> bool {
        self.done.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

pub trait Spline {
    type Output;
    type Result;

    /// Advance on `event`. Must not be called again after completion.
    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> Step<Self::Output, Self::Result>;

    fn then<B, F>(self, next: F) -> Then<Self, F, B>
    where
        Self: Sized,
        F: FnOnce(Self::Result) -> B,
        B: Spline<Output = Self::Output>,
    {
        Then {
            state: ThenState::First(self, Some(next)),
        }
    }

    fn race<B>(self, other: B) -> Race<Self, B>
    where
        Self: Sized,
        B: Spline,
    {
        Race { a: self, b: other }
    }

    fn map_output<B, F>(self, f: F) -> MapOutput<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Output) -> B,
    {
        MapOutput { spline: self, f }
    }

    fn map_result<B, F>(self, f: F) -> MapResult<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Result) -> B,
    {
        MapResult { spline: self, f }
    }

    /// Signal that follows this spline, then holds its last output.
    fn into_signal(self) -> SplineSignal<Self>
    where
        Self: Sized,
        Self::Output: Clone,
    {
        SplineSignal {
            spline: self,
            last: None,
        }
    }

    fn boxed<'a>(self) -> BoxSpline<'a, Self::Output, Self::Result>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

pub type BoxSpline<'a, O, R> = Box<dyn Spline<Output = O, Result = R> + 'a>;

impl<S: Spline + ?Sized> Spline for Box<S> {
    type Output = S::Output;
    type Result = S::Result;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> Step<S::Output, S::Result> {
        (**self).step(fx, event)
    }
}

// ============================================================================
// Leaves
// ============================================================================

/// Completes on its first step.
#[derive(Debug, Clone)]
pub struct Pure<O, R> {
    output: O,
    result: R,
}

pub fn pure<O: Clone, R: Clone>(output: O, result: R) -> Pure<O, R> {
    Pure { output, result }
}

impl<O: Clone, R: Clone> Spline for Pure<O, R> {
    type Output = O;
    type Result = R;

    fn step(&mut self, _fx: &mut Effect<'_>, _event: &Event) -> Step<O, R> {
        Step::done(self.output.clone(), self.result.clone())
    }
}

/// Signal that runs until a predicate over (event, output) yields a result.
pub struct Until<S, F> {
    signal: S,
    f: F,
}

impl<S, F> Until<S, F> {
    pub(crate) fn new(signal: S, f: F) -> Self {
        Self { signal, f }
    }
}

impl<S, F, R> Spline for Until<S, F>
where
    S: Signal,
    F: FnMut(&mut Effect<'_>, &Event, &S::Output) -> Option<R>,
{
    type Output = S::Output;
    type Result = R;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> Step<S::Output, R> {
        let output = self.signal.step(fx, event);
        let done = (self.f)(fx, event, &output);
        Step { output, done }
    }
}

/// Unit-output phase waiting for `f` to pick a result out of an event.
pub struct WaitFor<F>(F);

pub fn wait_for<R, F>(f: F) -> WaitFor<F>
where
    F: FnMut(&mut Effect<'_>, &Event) -> Option<R>,
{
    WaitFor(f)
}

impl<R, F> Spline for WaitFor<F>
where
    F: FnMut(&mut Effect<'_>, &Event) -> Option<R>,
{
    type Output = ();
    type Result = R;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> Step<(), R> {
        Step {
            output: (),
            done: (self.0)(fx, event),
        }
    }
}

/// Phase that completes once `seconds` of frame time have passed.
pub struct Delay {
    seconds: f32,
    clock: Elapsed,
}

pub fn delay(seconds: f32) -> Delay {
    Delay {
        seconds,
        clock: Elapsed::default(),
    }
}

impl Spline for Delay {
    type Output = f32;
    type Result = ();

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> Step<f32, ()> {
        let t = self.clock.step(fx, event);
        if t >= self.seconds {
            Step::done(t, ())
        } else {
            Step::pending(t)
        }
    }
}

/// A tween as a phase, completing with its target value.
pub struct TweenTo<T>(Tween<T>);

pub fn tween_to<T: Lerp>(tween: Tween<T>) -> TweenTo<T> {
    TweenTo(tween)
}

impl<T: Lerp> Spline for TweenTo<T> {
    type Output = T;
    type Result = T;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> Step<T, T> {
        let value = self.0.step(fx, event);
        if self.0.is_finished() {
            Step::done(value, self.0.target().clone())
        } else {
            Step::pending(value)
        }
    }
}

// ============================================================================
// Combinators
// ============================================================================

enum ThenState<A, F, B> {
    First(A, Option<F>),
    Second(B),
}

/// Sequencing: run `A`, feed its result to `F`, run the phase it returns.
pub struct Then<A, F, B> {
    state: ThenState<A, F, B>,
}

impl<A, F, B> Spline for Then<A, F, B>
where
    A: Spline,
    F: FnOnce(A::Result) -> B,
    B: Spline<Output = A::Output>,
{
    type Output = A::Output;
    type Result = B::Result;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> Step<A::Output, B::Result> {
        let (output, next) = match &mut self.state {
            ThenState::Second(b) => return b.step(fx, event),
            ThenState::First(a, next) => {
                let step = a.step(fx, event);
                let next = match (step.done, next.take()) {
                    (Some(result), Some(f)) => Some(f(result)),
                    _ => None,
                };
                (step.output, next)
            }
        };

        if let Some(b) = next {
            self.state = ThenState::Second(b);
        }
        Step::pending(output)
    }
}

/// Alternation: step both phases, first to complete wins.
pub struct Race<A, B> {
    a: A,
    b: B,
}

impl<A: Spline, B: Spline> Spline for Race<A, B> {
    type Output = (A::Output, B::Output);
    type Result = Either<A::Result, B::Result>;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> Step<Self::Output, Self::Result> {
        let a = self.a.step(fx, event);
        let b = self.b.step(fx, event);
        let done = match (a.done, b.done) {
            (Some(ra), _) => Some(Either::Left(ra)),
            (None, Some(rb)) => Some(Either::Right(rb)),
            (None, None) => None,
        };
        Step {
            output: (a.output, b.output),
            done,
        }
    }
}

pub struct MapOutput<S, F> {
    spline: S,
    f: F,
}

impl<S, F, B> Spline for MapOutput<S, F>
where
    S: Spline,
    F: FnMut(S::Output) -> B,
{
    type Output = B;
    type Result = S::Result;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> Step<B, S::Result> {
        let step = self.spline.step(fx, event);
        Step {
            output: (self.f)(step.output),
            done: step.done,
        }
    }
}

pub struct MapResult<S, F> {
    spline: S,
    f: F,
}

impl<S, F, B> Spline for MapResult<S, F>
where
    S: Spline,
    F: FnMut(S::Result) -> B,
{
    type Output = S::Output;
    type Result = B;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> Step<S::Output, B> {
        let step = self.spline.step(fx, event);
        Step {
            output: step.output,
            done: step.done.map(&mut self.f),
        }
    }
}

// ============================================================================
// Back to signals
// ============================================================================

pub struct SplineSignal<S: Spline> {
    spline: S,
    last: Option<S::Output>,
}

impl<S> Signal for SplineSignal<S>
where
    S: Spline,
    S::Output: Clone,
{
    type Output = S::Output;

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> S::Output {
        if let Some(last) = &self.last {
            return last.clone();
        }
        let step = self.spline.step(fx, event);
        if step.is_done() {
            self.last = Some(step.output.clone());
        }
        step.output
    }
}

/// Run a fresh phase machine from `factory` forever.
///
/// Outputs the current phase's output, paired with the result on the event
/// where a run completed. The next run starts on the following event.
pub struct Repeat<F, S> {
    factory: F,
    current: S,
}

pub fn repeat<F, S>(mut factory: F) -> Repeat<F, S>
where
    F: FnMut() -> S,
    S: Spline,
{
    let current = factory();
    Repeat { factory, current }
}

impl<F, S> Signal for Repeat<F, S>
where
    F: FnMut() -> S,
    S: Spline,
{
    type Output = (S::Output, Option<S::Result>);

    fn step(&mut self, fx: &mut Effect<'_>, event: &Event) -> Self::Output {
        let step = self.current.step(fx, event);
        if step.done.is_some() {
            self.current = (self.factory)();
        }
        (step.output, step.done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::effect::ReadData;
    use crate::core::event::{InputState, Key, Modifiers};
    use crate::signal::signal::tests::{env_at, step_sig};
    use crate::signal::signal::{constant, fold, linear, tween};
    use crate::core::uid::Uid;

    fn step_spl<S: Spline>(s: &mut S, env: &ReadData, event: &Event) -> Step<S::Output, S::Result> {
        let mut uid = Uid(0);
        let mut fx = Effect::new(env, &mut uid);
        s.step(&mut fx, event)
    }

    fn key(k: Key) -> Event {
        Event::Key {
            key: k,
            state: InputState::Pressed,
            repeat: false,
            modifiers: Modifiers::default(),
        }
    }

    fn text(s: &str) -> Event {
        Event::TextInput(s.to_string())
    }

    #[test]
    fn test_until_completes_on_predicate() {
        let env = ReadData::default();
        let mut typed = fold(String::new(), |buf, _fx, ev| {
            if let Event::TextInput(t) = ev {
                buf.push_str(t);
            }
        })
        .until(|_fx, ev, buf: &String| ev.is_key_press(&Key::Enter).then(|| buf.clone()));

        assert_eq!(step_spl(&mut typed, &env, &text("h")), Step::pending("h".to_string()));
        assert_eq!(step_spl(&mut typed, &env, &text("i")), Step::pending("hi".to_string()));
        assert_eq!(
            step_spl(&mut typed, &env, &key(Key::Enter)),
            Step::done("hi".to_string(), "hi".to_string())
        );
    }

    #[test]
    fn test_then_starts_next_phase_on_following_event() {
        let env = ReadData::default();
        let first = wait_for(|_fx, ev| ev.is_key_press(&Key::Tab).then_some(3)).map_output(|_| 0);
        let mut seq = first.then(|n: i32| {
            fold(n, |acc, _fx, ev| {
                if matches!(ev, Event::TextInput(_)) {
                    *acc += 1;
                }
            })
            .until(|_fx, _ev, acc: &i32| (*acc >= 5).then_some(*acc))
        });

        // Phase one ignores text and completes on Tab
        assert_eq!(step_spl(&mut seq, &env, &text("x")), Step::pending(0));
        assert_eq!(step_spl(&mut seq, &env, &key(Key::Tab)), Step::pending(0));
        // Phase two was seeded with 3 and sees only later events
        assert_eq!(step_spl(&mut seq, &env, &text("a")), Step::pending(4));
        assert_eq!(step_spl(&mut seq, &env, &text("b")), Step::done(5, 5));
    }

    #[test]
    fn test_race_first_to_complete_wins() {
        let env = ReadData::default();
        let mut r = wait_for(|_fx, ev| ev.is_key_press(&Key::Enter).then_some("enter"))
            .race(wait_for(|_fx, ev| ev.is_key_press(&Key::Escape).then_some(27)));

        assert!(!step_spl(&mut r, &env, &text("q")).is_done());
        assert_eq!(step_spl(&mut r, &env, &key(Key::Escape)).done, Some(Either::Right(27)));

        let mut tie = pure(1, 'l').race(pure(2, 'r'));
        let step = step_spl(&mut tie, &env, &Event::Idle);
        assert_eq!(step.output, (1, 2));
        assert_eq!(step.done, Some(Either::Left('l')));
    }

    #[test]
    fn test_phases_hold_without_events() {
        let env = ReadData::default();
        let mut w = wait_for(|_fx, ev| ev.left_press());
        for _ in 0..10 {
            assert!(!step_spl(&mut w, &env, &Event::Idle).is_done());
        }
    }

    #[test]
    fn test_into_signal_holds_last_output() {
        let env = ReadData::default();
        let mut s = constant(1)
            .until(|_fx, ev, _| ev.is_quit().then_some(()))
            .then(|_| constant(2).until(|_fx, _ev, _| Some(())))
            .into_signal();

        assert_eq!(step_sig(&mut s, &env, &Event::Idle), 1);
        assert_eq!(step_sig(&mut s, &env, &Event::Quit), 1);
        assert_eq!(step_sig(&mut s, &env, &Event::Idle), 2);
        assert_eq!(step_sig(&mut s, &env, &Event::Idle), 2);
    }

    #[test]
    fn test_repeat_restarts_and_surfaces_results() {
        let env = ReadData::default();
        let mut runs = 0;
        let mut r = repeat(move || {
            runs += 1;
            let id = runs;
            wait_for(move |_fx, ev| ev.is_key_press(&Key::Enter).then_some(id))
        });

        assert_eq!(step_sig(&mut r, &env, &Event::Idle), ((), None));
        assert_eq!(step_sig(&mut r, &env, &key(Key::Enter)), ((), Some(1)));
        assert_eq!(step_sig(&mut r, &env, &key(Key::Enter)), ((), Some(2)));
    }

    #[test]
    fn test_delay_and_tween_to() {
        let mut d = delay(1.0);
        assert!(!step_spl(&mut d, &env_at(0, 0.0), &Event::Idle).is_done());
        assert!(!step_spl(&mut d, &env_at(1, 0.6), &Event::Idle).is_done());
        assert!(step_spl(&mut d, &env_at(2, 0.6), &Event::Idle).is_done());

        let mut t = tween_to(tween(0.0f32, 1.0, 0.5, linear));
        assert!(!step_spl(&mut t, &env_at(0, 0.0), &Event::Idle).is_done());
        assert_eq!(step_spl(&mut t, &env_at(1, 0.5), &Event::Idle), Step::done(1.0, 1.0));
    }

    #[test]
    fn test_map_result_and_boxed() {
        let env = ReadData::default();
        let mut s: BoxSpline<'_, (), String> =
            pure((), 7).map_result(|n: i32| format!("n={}", n)).boxed();
        assert_eq!(step_spl(&mut s, &env, &Event::Idle).done, Some("n=7".to_string()));
    }
}
