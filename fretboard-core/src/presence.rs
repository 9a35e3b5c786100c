//! # Note Presence Module
//!
//! Keeps a short, decaying memory of recently detected notes so they can
//! be drawn as a fading trail.
//!
//! ## Lifecycle of a note
//! - **Silent**: not tracked.
//! - **Active**: the note is the current detection. Drawn at full opacity.
//! - **Fading**: no longer detected but inside the lingering window.
//!   Opacity falls linearly from 1 to 0 over the window.
//!
//! A detection with no note, or a sweep that finds no detection arrived
//! since the previous sweep, ends the current detection and starts its
//! decay. Sweeps also prune entries whose age has reached the window.
//!
//! Notes are keyed by exact identity: C3 and C4 fade independently.

use std::collections::HashMap;
use tracing::debug;

use crate::note::Note;
use crate::{Result, TheoryError};

/// Default lingering window in milliseconds.
pub const DEFAULT_LINGERING_WINDOW_MS: u64 = 2000;
pub const MIN_LINGERING_WINDOW_MS: u64 = 500;
pub const MAX_LINGERING_WINDOW_MS: u64 = 3000;

/// Cadence of the pruning sweep in milliseconds.
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 50;

/// One output of the external pitch estimator, already resolved to a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedNoteEvent {
    /// `None` when the estimator heard nothing usable.
    pub note: Option<Note>,
    /// Arrival time in milliseconds on the caller's clock.
    pub timestamp_ms: u64,
}

impl DetectedNoteEvent {
    pub fn heard(note: Note, timestamp_ms: u64) -> Self {
        Self {
            note: Some(note),
            timestamp_ms,
        }
    }

    pub fn silence(timestamp_ms: u64) -> Self {
        Self {
            note: None,
            timestamp_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceState {
    Silent,
    Active,
    Fading,
}

/// Render data for one tracked note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotePresence {
    pub note: Note,
    pub state: PresenceState,
    /// 1.0 while active, decaying to 0.0 while fading.
    pub opacity: f32,
}

/// Time-bounded set of recently heard notes.
#[derive(Debug, Clone)]
pub struct NotePresenceTracker {
    lingering_window_ms: u64,
    /// Last time each note was heard.
    last_heard: HashMap<Note, u64>,
    current: Option<Note>,
    detected_since_sweep: bool,
}

fn check_window(window_ms: u64) -> Result<u64> {
    if (MIN_LINGERING_WINDOW_MS..=MAX_LINGERING_WINDOW_MS).contains(&window_ms) {
        Ok(window_ms)
    } else {
        Err(TheoryError::range(
            "lingering window (ms)",
            window_ms as i64,
            MIN_LINGERING_WINDOW_MS as i64,
            MAX_LINGERING_WINDOW_MS as i64,
        ))
    }
}

impl Default for NotePresenceTracker {
    fn default() -> Self {
        Self {
            lingering_window_ms: DEFAULT_LINGERING_WINDOW_MS,
            last_heard: HashMap::new(),
            current: None,
            detected_since_sweep: false,
        }
    }
}

impl NotePresenceTracker {
    /// # Returns
    /// * `Err(TheoryError::Range)` - Window outside 500..=3000 ms
    pub fn new(lingering_window_ms: u64) -> Result<Self> {
        Ok(Self {
            lingering_window_ms: check_window(lingering_window_ms)?,
            ..Self::default()
        })
    }

    pub fn lingering_window_ms(&self) -> u64 {
        self.lingering_window_ms
    }

    pub fn set_lingering_window(&mut self, window_ms: u64) -> Result<()> {
        self.lingering_window_ms = check_window(window_ms)?;
        Ok(())
    }

    /// The note currently being detected, if any.
    pub fn current(&self) -> Option<Note> {
        self.current
    }

    /// Applies one detection event.
    ///
    /// A note becomes (or stays) active and its timestamp is refreshed.
    /// An empty event ends the current detection.
    pub fn observe(&mut self, event: DetectedNoteEvent) {
        match event.note {
            Some(note) => {
                let heard = self.last_heard.entry(note).or_insert(event.timestamp_ms);
                *heard = (*heard).max(event.timestamp_ms);
                if self.current != Some(note) {
                    debug!(%note, at = event.timestamp_ms, "note active");
                }
                self.current = Some(note);
                self.detected_since_sweep = true;
            }
            None => {
                if let Some(note) = self.current.take() {
                    debug!(%note, at = event.timestamp_ms, "note fading");
                }
            }
        }
    }

    /// Periodic sweep.
    ///
    /// Ends the current detection if nothing was heard since the previous
    /// sweep, then prunes every entry whose age has reached the window.
    /// Ages are measured with saturation, so an event stamped after `now_ms`
    /// (it arrived after this tick began) is never pruned before it is drawn.
    ///
    /// # Returns
    /// * Number of entries pruned
    pub fn sweep(&mut self, now_ms: u64) -> usize {
        if !self.detected_since_sweep {
            self.current = None;
        }
        self.detected_since_sweep = false;

        let window = self.lingering_window_ms;
        let before = self.last_heard.len();
        self.last_heard
            .retain(|_, &mut heard| now_ms.saturating_sub(heard) < window);
        if let Some(note) = self.current {
            if !self.last_heard.contains_key(&note) {
                self.current = None;
            }
        }
        before - self.last_heard.len()
    }

    /// Presence of one exact note at `now_ms`.
    pub fn presence_of(&self, note: Note, now_ms: u64) -> NotePresence {
        if self.current == Some(note) {
            return NotePresence {
                note,
                state: PresenceState::Active,
                opacity: 1.0,
            };
        }
        match self.last_heard.get(&note) {
            Some(&heard) => {
                let age = now_ms.saturating_sub(heard);
                if age >= self.lingering_window_ms {
                    return silent(note);
                }
                let opacity = (1.0 - age as f64 / self.lingering_window_ms as f64).max(0.0);
                NotePresence {
                    note,
                    state: PresenceState::Fading,
                    opacity: opacity as f32,
                }
            }
            None => silent(note),
        }
    }

    /// All active and fading notes at `now_ms`, lowest pitch first.
    pub fn presences(&self, now_ms: u64) -> Vec<NotePresence> {
        let mut notes: Vec<Note> = self.last_heard.keys().copied().collect();
        notes.sort();
        notes
            .into_iter()
            .map(|note| self.presence_of(note, now_ms))
            .filter(|p| p.state != PresenceState::Silent)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.last_heard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_heard.is_empty()
    }

    pub fn clear(&mut self) {
        self.last_heard.clear();
        self.current = None;
        self.detected_since_sweep = false;
    }
}

fn silent(note: Note) -> NotePresence {
    NotePresence {
        note,
        state: PresenceState::Silent,
        opacity: 0.0,
    }
}
