//! Shared input queue between platform callbacks and the frame stepper.
//!
//! Architecture:
//! - Producers (input callbacks, decode workers) push through cloned [`EventSender`]s
//! - The stepper is the single consumer: [`EventQueue::drain`] takes the whole
//!   batch and leaves the queue empty, under one lock
//!
//! Arrival order is preserved. Events are never dropped: an async load whose
//! completion got evicted would leave its entry outstanding forever.

use std::sync::{Arc, Mutex};

use log::trace;

use super::event::Event;

type Shared = Arc<Mutex<Vec<Event>>>;

/// Mutex-protected FIFO of pending [`Event`]s.
#[derive(Clone, Default)]
pub struct EventQueue {
    queue: Shared,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event.
    pub fn push(&self, event: Event) {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).push(event);
    }

    /// Append several events, keeping their order.
    pub fn extend(&self, events: impl IntoIterator<Item = Event>) {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(events);
    }

    /// Take every queued event and clear the queue atomically.
    ///
    /// Use once per frame:
    /// ```ignore
    /// for event in queue.drain() {
    ///     // step the network...
    /// }
    /// ```
    pub fn drain(&self) -> Vec<Event> {
        let batch = std::mem::take(&mut *self.queue.lock().unwrap_or_else(|e| e.into_inner()));
        if !batch.is_empty() {
            trace!("EventQueue drained {} events", batch.len());
        }
        batch
    }

    /// Get a sender handle for callbacks and worker threads.
    pub fn sender(&self) -> EventSender {
        EventSender {
            queue: Arc::clone(&self.queue),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("len", &self.queue.lock().map(|q| q.len()).unwrap_or(0))
            .finish()
    }
}

/// Cloneable producer handle. Safe to move into other threads.
#[derive(Clone)]
pub struct EventSender {
    queue: Shared,
}

impl EventSender {
    pub fn send(&self, event: Event) {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).push(event);
    }
}

impl std::fmt::Debug for EventSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSender")
            .field("queue_len", &self.queue.lock().map(|q| q.len()).unwrap_or(0))
            .finish()
    }
}
