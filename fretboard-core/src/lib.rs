// fretboard-core/src/lib.rs

//! The core logic for the fretboard practice aid.
//! This crate is responsible for note naming, fretboard mapping, chord
//! theory, progression generation and tracking of recently heard notes.
//! It is completely headless: pitch estimation, audio capture, playback
//! and rendering are left to the caller.

pub mod chord;
pub mod config;
pub mod detection;
pub mod fretboard;
pub mod interval;
pub mod note;
pub mod overlay;
pub mod pitch;
pub mod presence;
pub mod progression;
pub mod sequence;
pub mod session;
pub mod tuning;

use thiserror::Error;

pub use chord::{Chord, ChordDuration, ChordQuality, chord_tones};
pub use fretboard::{FretCount, Fretboard, Position, note_at};
pub use interval::{IntervalLabel, interval_label};
pub use note::{Note, PitchClass};
pub use pitch::{DetectionGate, PitchEstimate, PitchReading, frequency_to_note};
pub use presence::{DetectedNoteEvent, NotePresence, NotePresenceTracker, PresenceState};
pub use progression::{
    DiatonicChord, ProgressionTemplate, diatonic_chords, ii_v_i, twelve_bar_blues,
};
pub use sequence::Sequence;
pub use tuning::Tuning;

/// Errors raised by the theory engine.
///
/// Every operation is total apart from these guard conditions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TheoryError {
    /// Mathematically invalid input, e.g. a non-positive frequency.
    #[error("frequency {frequency} Hz has no pitch (must be finite and positive)")]
    Domain { frequency: f64 },

    /// An index or fret outside its configured bounds.
    #[error("{what} {value} is out of range ({min}..={max})")]
    Range {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// An index into a collection that holds nothing.
    #[error("{what} is empty")]
    Empty { what: &'static str },

    /// A chord quality symbol that is not part of the closed vocabulary.
    #[error("unknown chord quality '{0}'")]
    UnknownQuality(String),

    /// A tuning with the wrong number of strings.
    #[error("a tuning needs exactly {expected} strings, got {found}")]
    InvalidTuning { expected: usize, found: usize },

    /// Text that does not name a pitch class or note.
    #[error("'{0}' is not a valid note name")]
    InvalidName(String),
}

/// Result type for theory operations
pub type Result<T> = std::result::Result<T, TheoryError>;

impl TheoryError {
    pub(crate) fn range(what: &'static str, value: impl Into<i64>, min: i64, max: i64) -> Self {
        TheoryError::Range {
            what,
            value: value.into(),
            min,
            max,
        }
    }
}
