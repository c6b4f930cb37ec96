//! State owned by one running application instance.

use super::async_loads::AsyncLoads;
use super::backend::Backend;
use super::cursor_stack::CursorStack;
use super::effect::{Fonts, ReadData};
use super::uid::Uid;

/// Everything the frame stepper mutates between frames.
///
/// Nothing else touches it: input arrives through the event queue and decode
/// results come back as events.
pub struct AppData<N, B: Backend> {
    pub next_uid: Uid,
    pub loads: AsyncLoads,
    /// Current value of the signal network.
    pub network: N,
    pub cache: B::RenderCache,
    /// Backend clock reading at the start of the previous frame.
    pub last_time: Option<f64>,
    /// Index of the next frame to step.
    pub frame: u64,
    /// Snapshot handed to logic; holds the fonts.
    pub read: ReadData,
    pub cursors: CursorStack<B::Cursor>,
}

impl<N, B: Backend> AppData<N, B> {
    pub fn new(network: N, fonts: Fonts, loads: AsyncLoads) -> Self {
        Self {
            next_uid: Uid::default(),
            loads,
            network,
            cache: B::RenderCache::default(),
            last_time: None,
            frame: 0,
            read: ReadData {
                fonts,
                ..ReadData::default()
            },
            cursors: CursorStack::new(),
        }
    }
}
