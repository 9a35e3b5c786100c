//! # Practice Session Module
//!
//! An explicit state object for one practice session: the settings, the
//! chord sequence, the cursor into it and the presence tracker. The owner
//! of the render loop holds it and passes it where it is needed.
//!
//! The session does no scheduling. An external transport reports which
//! chord is playing through [`PracticeSession::set_current_step`].

use tracing::{debug, info};

use crate::chord::{Chord, ChordQuality};
use crate::config::{ConfigError, PracticeConfig};
use crate::detection::DetectionReceiver;
use crate::fretboard::{FretCount, Fretboard};
use crate::note::{Note, PitchClass};
use crate::overlay::{self, PositionMarker};
use crate::pitch::{DetectionGate, PitchEstimate, PitchReading};
use crate::presence::{DetectedNoteEvent, NotePresence, NotePresenceTracker};
use crate::progression::ProgressionTemplate;
use crate::sequence::Sequence;
use crate::Result;

#[derive(Debug, Clone)]
pub struct PracticeSession {
    config: PracticeConfig,
    fretboard: Fretboard,
    gate: DetectionGate,
    sequence: Sequence,
    current_step: Option<usize>,
    tracker: NotePresenceTracker,
    last_reading: Option<PitchReading>,
}

impl PracticeSession {
    pub fn new(config: PracticeConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let tracker = NotePresenceTracker::new(config.lingering_window_ms)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(Self {
            fretboard: config.fretboard(),
            gate: config.detection_gate(),
            config,
            sequence: Sequence::new(),
            current_step: None,
            tracker,
            last_reading: None,
        })
    }

    pub fn config(&self) -> &PracticeConfig {
        &self.config
    }

    pub fn fretboard(&self) -> &Fretboard {
        &self.fretboard
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn tracker(&self) -> &NotePresenceTracker {
        &self.tracker
    }

    // --- Sequence editing ---

    /// Appends a chord and returns its index.
    pub fn add_chord(&mut self, root: PitchClass, quality: ChordQuality) -> usize {
        let chord = Chord::new(root, quality);
        let index = self.sequence.len();
        debug!(chord = %chord, index, "adding chord");
        self.sequence.push(chord);
        index
    }

    /// Removes a chord. The cursor follows the chord it pointed at, or is
    /// cleared if that chord was removed.
    pub fn remove_chord(&mut self, index: usize) -> Result<Chord> {
        let removed = self.sequence.remove(index)?;
        self.current_step = match self.current_step {
            Some(step) if step == index => None,
            Some(step) if step > index => Some(step - 1),
            other => other,
        };
        Ok(removed)
    }

    pub fn clear_sequence(&mut self) {
        self.sequence.clear();
        self.current_step = None;
    }

    /// Replaces the sequence with a generated progression.
    ///
    /// Clear then append, not an atomic swap.
    pub fn load_progression(&mut self, key: PitchClass, template: ProgressionTemplate) -> usize {
        self.current_step = None;
        self.sequence.replace_with(template.generate(key));
        info!(%key, %template, chords = self.sequence.len(), "loaded progression");
        self.sequence.len()
    }

    // --- Transport cursor ---

    /// Records the chord the external transport is now playing.
    pub fn set_current_step(&mut self, step: usize) -> Result<()> {
        if step >= self.sequence.len() {
            return Err(self.sequence.index_error(step));
        }
        self.current_step = Some(step);
        Ok(())
    }

    pub fn stop(&mut self) {
        self.current_step = None;
    }

    pub fn current_step(&self) -> Option<usize> {
        self.current_step
    }

    pub fn current_chord(&self) -> Option<&Chord> {
        self.current_step.and_then(|step| self.sequence.get(step))
    }

    // --- Detection ---

    /// Gates a raw estimate (or its absence) and feeds the tracker.
    ///
    /// # Returns
    /// * The detected note, or `None` when nothing passed the gate
    pub fn handle_estimate(
        &mut self,
        estimate: Option<PitchEstimate>,
        now_ms: u64,
    ) -> Option<Note> {
        self.last_reading = estimate.and_then(|e| self.gate.read(e));
        let note = self.last_reading.map(|r| r.note);
        self.tracker.observe(DetectedNoteEvent {
            note,
            timestamp_ms: now_ms,
        });
        note
    }

    /// Applies events waiting in a detection channel.
    pub fn drain_detections(&mut self, receiver: &mut DetectionReceiver) -> usize {
        receiver.drain_into(&mut self.tracker)
    }

    /// The periodic sweep; returns the number of pruned notes.
    pub fn tick(&mut self, now_ms: u64) -> usize {
        self.tracker.sweep(now_ms)
    }

    pub fn last_reading(&self) -> Option<PitchReading> {
        self.last_reading
    }

    pub fn presences(&self, now_ms: u64) -> Vec<NotePresence> {
        self.tracker.presences(now_ms)
    }

    /// Markers for the current frame.
    pub fn overlay(&self, now_ms: u64) -> Vec<PositionMarker> {
        overlay::markers(
            &self.fretboard,
            self.current_chord(),
            &self.presences(now_ms),
            self.config.overlay_options(),
        )
    }

    // --- Settings ---

    pub fn set_lingering_window(&mut self, window_ms: u64) -> Result<()> {
        self.tracker.set_lingering_window(window_ms)?;
        self.config.lingering_window_ms = window_ms;
        Ok(())
    }

    pub fn set_fret_count(&mut self, fret_count: FretCount) {
        self.fretboard.set_fret_count(fret_count);
        self.config.fret_count = fret_count;
    }

    pub fn set_show_safe_notes(&mut self, show: bool) {
        self.config.show_safe_notes = show;
    }
}
