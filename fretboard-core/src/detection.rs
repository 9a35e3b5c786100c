//! # Detection Channel Module
//!
//! Carries detection events from the external pitch estimator (producer,
//! any thread) to the note-presence tracker (consumer, the render loop).
//!
//! The channel holds a single event. When the consumer has not yet taken
//! the previous one, the stale event is evicted and the new one takes its
//! place: only the latest detection matters, and a backlog would only
//! delay the display.

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, info};

use crate::presence::{DetectedNoteEvent, NotePresenceTracker};

/// Capacity of the detection channel.
pub const DETECTION_CHANNEL_CAPACITY: usize = 1;

/// Outcome of offering an event to the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Delivered,
    /// The consumer was busy; a stale pending event was discarded in favour
    /// of this one.
    Replaced,
    /// The consumer has gone away.
    Closed,
}

/// State shared by both halves.
#[derive(Debug, Default)]
struct Shared {
    replaced: AtomicU64,
    consumer_gone: AtomicBool,
}

/// Producer half, cheap to clone.
#[derive(Debug, Clone)]
pub struct DetectionSender {
    tx: Sender<DetectedNoteEvent>,
    /// Used only to evict a stale pending event.
    evict: Receiver<DetectedNoteEvent>,
    shared: Arc<Shared>,
}

/// Consumer half, owned by whoever drives the tracker.
#[derive(Debug)]
pub struct DetectionReceiver {
    rx: Receiver<DetectedNoteEvent>,
    shared: Arc<Shared>,
    closed: bool,
}

/// Creates a connected sender/receiver pair.
pub fn channel() -> (DetectionSender, DetectionReceiver) {
    let (tx, rx) = crossbeam_channel::bounded(DETECTION_CHANNEL_CAPACITY);
    let shared = Arc::new(Shared::default());
    (
        DetectionSender {
            tx,
            evict: rx.clone(),
            shared: Arc::clone(&shared),
        },
        DetectionReceiver {
            rx,
            shared,
            closed: false,
        },
    )
}

impl DetectionSender {
    /// Offers an event without blocking. The latest offer always wins.
    pub fn offer(&self, event: DetectedNoteEvent) -> Offer {
        if self.shared.consumer_gone.load(Ordering::Acquire) {
            return Offer::Closed;
        }
        let mut pending = event;
        let mut replaced = false;
        loop {
            match self.tx.try_send(pending) {
                Ok(()) => break,
                Err(TrySendError::Full(back)) => {
                    // Either we evict the stale event or the consumer took
                    // it first; both leave room for another attempt.
                    if self.evict.try_recv().is_ok() {
                        replaced = true;
                    }
                    pending = back;
                }
                Err(TrySendError::Disconnected(_)) => return Offer::Closed,
            }
        }
        if replaced {
            let total = self.shared.replaced.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(total, "consumer busy, stale detection replaced");
            Offer::Replaced
        } else {
            Offer::Delivered
        }
    }

    /// Stale events discarded so far because the consumer was busy.
    pub fn replaced(&self) -> u64 {
        self.shared.replaced.load(Ordering::Relaxed)
    }
}

impl DetectionReceiver {
    /// Applies every pending event to `tracker`.
    ///
    /// # Returns
    /// * Number of events applied
    pub fn drain_into(&mut self, tracker: &mut NotePresenceTracker) -> usize {
        let mut applied = 0;
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    tracker.observe(event);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.closed {
                        info!("detection producer disconnected");
                    }
                    self.closed = true;
                    break;
                }
            }
        }
        applied
    }

    /// True once every sender is gone and the channel is drained.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn replaced(&self) -> u64 {
        self.shared.replaced.load(Ordering::Relaxed)
    }
}

impl Drop for DetectionReceiver {
    fn drop(&mut self) {
        self.shared.consumer_gone.store(true, Ordering::Release);
    }
}
