//! Frame stepper: one signal network advance per rendered frame.
//!
//! Per frame:
//! 1. Read the backend clock and update the frame index and delta
//! 2. Drain the event queue; completed loads are checked off in [`AsyncLoads`]
//! 3. Step the network once per event in arrival order, or once with
//!    [`Event::Idle`] when nothing arrived. Only the last output is rendered;
//!    actions from every step are kept
//! 4. Render, then refresh window size and pointer position for the next frame
//! 5. Execute the frame's actions in order
//!
//! A quit event or a close request makes [`FrameStepper::step_frame`] return
//! [`StepOutcome::Quit`]; the host is expected to end the process.

use log::{debug, info, trace};

use super::action::Action;
use super::app_data::AppData;
use super::async_loads::AsyncLoads;
use super::backend::Backend;
use super::effect::{Effect, Fonts};
use super::event::Event;
use super::event_queue::{EventQueue, EventSender};
use super::workers::Workers;
use crate::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Quit,
}

pub struct FrameStepper<N, B: Backend> {
    data: AppData<N, B>,
    queue: EventQueue,
    last_actions: Vec<Action>,
}

impl<N, B> FrameStepper<N, B>
where
    B: Backend,
    N: Signal<Output = B::Picture>,
{
    /// Build a stepper around `network`, with `workers` decode threads.
    pub fn new(network: N, fonts: Fonts, workers: usize) -> std::io::Result<Self> {
        let queue = EventQueue::new();
        let loads = AsyncLoads::new(Workers::new(workers)?, queue.sender());
        Ok(Self {
            data: AppData::new(network, fonts, loads),
            queue,
            last_actions: Vec::new(),
        })
    }

    /// Producer handle for input callbacks.
    pub fn sender(&self) -> EventSender {
        self.queue.sender()
    }

    pub fn data(&self) -> &AppData<N, B> {
        &self.data
    }

    /// Actions executed by the most recent frame, in order.
    pub fn last_actions(&self) -> &[Action] {
        &self.last_actions
    }

    pub fn step_frame(&mut self, backend: &mut B) -> anyhow::Result<StepOutcome> {
        let AppData {
            next_uid,
            loads,
            network,
            cache,
            last_time,
            frame,
            read,
            cursors,
        } = &mut self.data;

        let now = backend.now();
        read.frame = *frame;
        read.delta = last_time.map(|t| (now - t).max(0.0) as f32).unwrap_or(0.0);
        *last_time = Some(now);

        let mut batch = self.queue.drain();
        for event in &batch {
            if let Event::LoadImage { uid, result } = event {
                loads.complete(*uid, result);
            }
        }
        let quit = batch.iter().any(Event::is_quit);
        if batch.is_empty() {
            batch.push(Event::Idle);
        }

        let mut actions = Vec::new();
        let mut picture = None;
        for event in &batch {
            let mut fx = Effect::new(read, next_uid);
            picture = Some(network.step(&mut fx, event));
            actions.extend(fx.into_actions());
        }

        if let Some(picture) = &picture {
            backend.render(cache, picture)?;
        }

        read.window_size = backend.window_size();
        read.cursor_pos = backend.cursor_position();

        for action in &actions {
            match action {
                Action::None => {}
                Action::Log(msg) => info!(target: "sprocket::app", "{}", msg),
                Action::SetCursor(cmd) => {
                    cursors.apply(*cmd, backend);
                }
                Action::SetTextEditing(enabled) => backend.set_text_editing(*enabled),
                Action::LoadImage { uid, source } => loads.request(*uid, source.clone()),
            }
        }

        trace!(
            "Frame {}: {} events, {} actions, {} loads in flight",
            frame,
            batch.len(),
            actions.len(),
            loads.in_flight()
        );
        *frame += 1;
        self.last_actions = actions;

        if quit || backend.close_requested() {
            debug!("Quit after frame {}", *frame - 1);
            return Ok(StepOutcome::Quit);
        }
        Ok(StepOutcome::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{CursorCmd, CursorType, ImageSource};
    use crate::core::cursor_stack::CursorDevice;
    use crate::core::uid::Uid;
    use crate::signal::from_fn;
    use glam::{UVec2, Vec2};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct FakeBackend {
        time: f64,
        rendered: Vec<usize>,
        shown: Vec<Option<CursorType>>,
        text_editing: Vec<bool>,
        close: bool,
    }

    impl CursorDevice for FakeBackend {
        type Cursor = CursorType;

        fn create_cursor(&mut self, cursor: CursorType) -> CursorType {
            cursor
        }
        fn show_cursor(&mut self, cursor: &CursorType) {
            self.shown.push(Some(*cursor));
        }
        fn destroy_cursor(&mut self, _cursor: CursorType) {}
        fn show_default_cursor(&mut self) {
            self.shown.push(None);
        }
    }

    impl Backend for FakeBackend {
        type Picture = usize;
        type RenderCache = ();

        fn render(&mut self, _cache: &mut (), picture: &usize) -> anyhow::Result<()> {
            self.rendered.push(*picture);
            Ok(())
        }
        fn window_size(&self) -> UVec2 {
            UVec2::new(640, 480)
        }
        fn cursor_position(&self) -> Vec2 {
            Vec2::new(1.0, 2.0)
        }
        fn close_requested(&self) -> bool {
            self.close
        }
        fn now(&self) -> f64 {
            self.time
        }
        fn set_text_editing(&mut self, enabled: bool) {
            self.text_editing.push(enabled);
        }
    }

    type Seen = Rc<RefCell<Vec<Event>>>;

    /// Network that records events and outputs how many it has seen.
    fn recorder(seen: Seen) -> impl Signal<Output = usize> {
        from_fn(move |fx: &mut Effect<'_>, ev: &Event| {
            match ev {
                Event::Key { .. } => fx.push_cursor(CursorType::Hand),
                Event::Frame => fx.pop_cursor(CursorType::Hand),
                Event::TextInput(s) if s == "edit" => fx.start_text_editing(),
                Event::FileDrop(path) => {
                    fx.load_image(path.clone());
                }
                _ => {}
            }
            seen.borrow_mut().push(ev.clone());
            seen.borrow().len()
        })
    }

    fn stepper(seen: &Seen) -> FrameStepper<impl Signal<Output = usize>, FakeBackend> {
        FrameStepper::new(recorder(Rc::clone(seen)), Fonts::default(), 1).unwrap()
    }

    fn key_event() -> Event {
        Event::Key {
            key: crate::core::event::Key::Space,
            state: crate::core::event::InputState::Pressed,
            repeat: false,
            modifiers: Default::default(),
        }
    }

    #[test]
    fn test_empty_batch_steps_once_with_idle() {
        let seen = Seen::default();
        let mut st = stepper(&seen);
        let mut be = FakeBackend::default();

        assert_eq!(st.step_frame(&mut be).unwrap(), StepOutcome::Continue);
        assert_eq!(*seen.borrow(), vec![Event::Idle]);
        assert_eq!(be.rendered, vec![1]);
    }

    #[test]
    fn test_batch_renders_only_last_output() {
        let seen = Seen::default();
        let mut st = stepper(&seen);
        let mut be = FakeBackend::default();

        let tx = st.sender();
        tx.send(key_event());
        tx.send(key_event());
        tx.send(Event::Frame);

        st.step_frame(&mut be).unwrap();
        assert_eq!(seen.borrow().len(), 3);
        assert_eq!(be.rendered, vec![3]);

        // Actions from every event in the batch are applied, in order
        assert_eq!(
            st.last_actions(),
            &[
                Action::SetCursor(CursorCmd::Push(CursorType::Hand)),
                Action::SetCursor(CursorCmd::Push(CursorType::Hand)),
                Action::SetCursor(CursorCmd::Pop(CursorType::Hand)),
            ]
        );
        assert_eq!(st.data().cursors.count(CursorType::Hand), 1);
        assert_eq!(be.shown, vec![Some(CursorType::Hand)]);
    }

    #[test]
    fn test_env_snapshot_refreshed_after_render() {
        let seen = Seen::default();
        let mut st = stepper(&seen);
        let mut be = FakeBackend::default();

        st.step_frame(&mut be).unwrap();
        be.time = 0.25;
        st.step_frame(&mut be).unwrap();

        let read = &st.data().read;
        assert_eq!(read.window_size, UVec2::new(640, 480));
        assert_eq!(read.cursor_pos, Vec2::new(1.0, 2.0));
        assert_eq!(read.frame, 1);
        assert_eq!(read.delta, 0.25);
        assert_eq!(st.data().frame, 2);
    }

    #[test]
    fn test_text_editing_forwarded() {
        let seen = Seen::default();
        let mut st = stepper(&seen);
        let mut be = FakeBackend::default();

        st.sender().send(Event::TextInput("edit".into()));
        st.step_frame(&mut be).unwrap();
        assert_eq!(be.text_editing, vec![true]);
    }

    #[test]
    fn test_quit_and_close() {
        let seen = Seen::default();
        let mut st = stepper(&seen);
        let mut be = FakeBackend::default();

        st.sender().send(Event::Quit);
        assert_eq!(st.step_frame(&mut be).unwrap(), StepOutcome::Quit);
        // The quit event still reached the network
        assert_eq!(*seen.borrow(), vec![Event::Quit]);

        be.close = true;
        assert_eq!(st.step_frame(&mut be).unwrap(), StepOutcome::Quit);
    }

    #[test]
    fn test_load_roundtrip_clears_in_flight() {
        let seen = Seen::default();
        let mut st = stepper(&seen);
        let mut be = FakeBackend::default();

        st.sender().send(Event::FileDrop("/no/such/image.png".into()));
        st.step_frame(&mut be).unwrap();
        assert_eq!(
            st.last_actions(),
            &[Action::LoadImage {
                uid: Uid(0),
                source: ImageSource::Path("/no/such/image.png".into()),
            }]
        );
        assert!(st.data().loads.is_in_flight(Uid(0)));

        let deadline = Instant::now() + Duration::from_secs(10);
        while st.data().loads.in_flight() > 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(2));
            st.step_frame(&mut be).unwrap();
        }

        assert_eq!(st.data().loads.in_flight(), 0);
        let completion = seen
            .borrow()
            .iter()
            .find_map(|ev| match ev {
                Event::LoadImage { uid, result } => Some((*uid, result.is_err())),
                _ => None,
            });
        assert_eq!(completion, Some((Uid(0), true)));
    }

    #[test]
    fn test_failed_load_is_not_retried() {
        let seen = Seen::default();
        let mut st = stepper(&seen);
        let mut be = FakeBackend::default();

        st.sender().send(Event::LoadImage {
            uid: Uid(5),
            result: Err("decode error".into()),
        });
        st.step_frame(&mut be).unwrap();

        assert_eq!(
            seen.borrow()[0],
            Event::LoadImage {
                uid: Uid(5),
                result: Err("decode error".into()),
            }
        );
        assert!(st.last_actions().iter().all(|a| a.load_uid().is_none()));
        assert_eq!(st.data().loads.in_flight(), 0);
    }
}
