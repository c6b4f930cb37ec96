//! Outstanding async image decodes, keyed by [`Uid`].
//!
//! Lifecycle of one request:
//! 1. Logic calls `load_image`, getting a uid and emitting `Action::LoadImage`
//! 2. The stepper hands the action to [`AsyncLoads::request`], which queues a
//!    decode job on the worker pool and records the uid as in flight
//! 3. The job pushes `Event::LoadImage { uid, result }` into the event queue
//! 4. When the stepper drains that event it calls [`AsyncLoads::complete`]
//!
//! Failures are delivered as `Err(message)` and never retried here. A caller
//! wanting a retry issues a new request under a new uid.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, warn};

use super::action::ImageSource;
use super::event::{DecodedImage, Event, LoadResult};
use super::event_queue::EventSender;
use super::uid::Uid;
use super::workers::{panic_message, Workers};

/// Image decoding errors
#[derive(Debug)]
pub enum LoadError {
    Io(String),
    Decode(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "IO error: {}", e),
            LoadError::Decode(e) => write!(f, "Decode error: {}", e),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<image::ImageError> for LoadError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => LoadError::Io(io.to_string()),
            other => LoadError::Decode(other.to_string()),
        }
    }
}

/// Decode `source` into an RGBA8 bitmap.
pub fn decode(source: &ImageSource) -> Result<DecodedImage, LoadError> {
    let img = match source {
        ImageSource::Path(path) => image::open(path)?,
        ImageSource::Bytes(bytes) => image::load_from_memory(bytes)?,
    };
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        width,
        height,
        pixels: rgba.into_raw().into(),
    })
}

/// Run a decode, turning errors and panics alike into the event's `Err`.
///
/// The completion event is sent whatever happens inside the codec, so no
/// request can stay in flight forever.
fn guarded<F>(decode: F) -> LoadResult
where
    F: FnOnce() -> Result<DecodedImage, LoadError>,
{
    match catch_unwind(AssertUnwindSafe(decode)) {
        Ok(result) => result.map(Arc::new).map_err(|e| e.to_string()),
        Err(payload) => Err(format!("decoder panicked: {}", panic_message(&*payload))),
    }
}

/// Book-keeping for one in-flight decode.
#[derive(Debug, Clone)]
pub struct LoadTask {
    pub source: ImageSource,
    pub started: Instant,
}

/// In-flight decode tasks plus the pool that runs them.
pub struct AsyncLoads {
    workers: Workers,
    events: EventSender,
    in_flight: HashMap<Uid, LoadTask>,
}

impl AsyncLoads {
    pub fn new(workers: Workers, events: EventSender) -> Self {
        Self {
            workers,
            events,
            in_flight: HashMap::new(),
        }
    }

    /// Spawn the decode for `uid`. Its result re-enters as `Event::LoadImage`.
    pub fn request(&mut self, uid: Uid, source: ImageSource) {
        if self.in_flight.contains_key(&uid) {
            warn!("Load {} already in flight, ignoring duplicate request", uid);
            return;
        }
        debug!("Load {} requested: {:?}", uid, source);

        self.in_flight.insert(
            uid,
            LoadTask {
                source: source.clone(),
                started: Instant::now(),
            },
        );

        let events = self.events.clone();
        self.workers.execute(move || {
            let result = guarded(|| decode(&source));
            events.send(Event::LoadImage { uid, result });
        });
    }

    /// Mark `uid` as delivered. Returns the finished task, if it was tracked.
    pub fn complete(&mut self, uid: Uid, result: &LoadResult) -> Option<LoadTask> {
        let task = self.in_flight.remove(&uid)?;
        match result {
            Ok(img) => debug!(
                "Load {} finished in {:.1}ms ({}x{})",
                uid,
                task.started.elapsed().as_secs_f64() * 1000.0,
                img.width,
                img.height
            ),
            Err(e) => warn!("Load {} failed: {}", uid, e),
        }
        Some(task)
    }

    pub fn is_in_flight(&self, uid: Uid) -> bool {
        self.in_flight.contains_key(&uid)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}
