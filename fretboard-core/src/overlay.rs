//! # Fretboard Overlay Module
//!
//! Decides what to draw at each fretboard position: chord tones ("safe"
//! notes), the chord root, detected and fading notes, and their labels.
//! The result is plain data for a renderer; nothing here draws.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::chord::Chord;
use crate::fretboard::{Fretboard, Position};
use crate::interval::{IntervalLabel, interval_label};
use crate::presence::NotePresence;
use crate::{Result, TheoryError};

/// What text a marker carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteLabelMode {
    /// Interval relative to the chord root, e.g. "b3".
    Interval,
    /// Pitch class name, e.g. "D#".
    Note,
    /// Both, e.g. "D#/b3".
    #[default]
    Combined,
}

impl FromStr for NoteLabelMode {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interval" => Ok(NoteLabelMode::Interval),
            "note" => Ok(NoteLabelMode::Note),
            "combined" => Ok(NoteLabelMode::Combined),
            _ => Err(TheoryError::InvalidName(s.to_string())),
        }
    }
}

impl fmt::Display for NoteLabelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NoteLabelMode::Interval => "interval",
            NoteLabelMode::Note => "note",
            NoteLabelMode::Combined => "combined",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayOptions {
    pub show_safe_notes: bool,
    pub label_mode: NoteLabelMode,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            show_safe_notes: true,
            label_mode: NoteLabelMode::default(),
        }
    }
}

/// Everything a renderer needs for one marked position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionMarker {
    pub position: Position,
    /// Pitch class belongs to the current chord.
    pub is_safe: bool,
    pub is_root: bool,
    /// Detection status of this exact note, if it is active or fading.
    pub presence: Option<NotePresence>,
    /// Interval to the chord root, when a chord is playing.
    pub interval: Option<IntervalLabel>,
    pub label: String,
}

impl PositionMarker {
    pub fn opacity(&self) -> f32 {
        self.presence.map_or(1.0, |p| p.opacity)
    }
}

/// Computes markers for every position worth drawing.
///
/// A position is drawn if it is a safe note (only while `show_safe_notes`
/// is on and a chord is playing) or if its exact note is active or fading.
/// Safe-note matching is by pitch class; detection matching is by exact
/// note, so a detected C4 lights up C4 positions but not C3 ones.
///
/// # Arguments
/// * `fretboard` - Board to enumerate
/// * `chord` - Currently playing chord, if any
/// * `presences` - Output of the presence tracker for this frame
/// * `options` - Safe-note toggle and label mode
pub fn markers(
    fretboard: &Fretboard,
    chord: Option<&Chord>,
    presences: &[NotePresence],
    options: OverlayOptions,
) -> Vec<PositionMarker> {
    fretboard
        .positions()
        .filter_map(|position| {
            let pitch_class = position.note.pitch_class;
            let (is_safe, is_root) = match chord {
                Some(chord) if options.show_safe_notes => {
                    (chord.contains(pitch_class), chord.root() == pitch_class)
                }
                _ => (false, false),
            };
            let presence = presences.iter().find(|p| p.note == position.note).copied();

            if !is_safe && presence.is_none() {
                return None;
            }

            let interval = chord.map(|c| interval_label(c.root(), pitch_class));
            let label = match (options.label_mode, interval) {
                (NoteLabelMode::Note, _) | (_, None) => pitch_class.to_string(),
                (NoteLabelMode::Interval, Some(iv)) => iv.to_string(),
                (NoteLabelMode::Combined, Some(iv)) => format!("{}/{}", pitch_class, iv),
            };

            Some(PositionMarker {
                position,
                is_safe,
                is_root,
                presence,
                interval,
                label,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::ChordQuality;
    use crate::fretboard::FretCount;
    use crate::note::{Note, PitchClass};
    use crate::presence::PresenceState;
    use crate::tuning::Tuning;

    fn board() -> Fretboard {
        Fretboard::new(Tuning::standard(), FretCount::Twelve)
    }

    #[test]
    fn test_safe_notes_cover_all_chord_tones() {
        let chord = Chord::new(PitchClass::A, ChordQuality::MinorSeventh);
        let marks = markers(&board(), Some(&chord), &[], OverlayOptions::default());
        assert!(!marks.is_empty());
        assert!(marks.iter().all(|m| m.is_safe && chord.contains(m.position.note.pitch_class)));
        // Open A string is the root.
        let open_a = marks
            .iter()
            .find(|m| m.position.string_index == 1 && m.position.fret == 0)
            .unwrap();
        assert!(open_a.is_root);
        assert_eq!(open_a.label, "A/R");
    }

    #[test]
    fn test_hidden_safe_notes_show_only_detections() {
        let chord = Chord::new(PitchClass::C, ChordQuality::MajorSeventh);
        let options = OverlayOptions {
            show_safe_notes: false,
            label_mode: NoteLabelMode::Interval,
        };
        let presence = NotePresence {
            note: Note::new(PitchClass::E, 4),
            state: PresenceState::Active,
            opacity: 1.0,
        };
        let marks = markers(&board(), Some(&chord), &[presence], options);
        assert_eq!(marks.len(), 3);
        assert!(marks.iter().all(|m| !m.is_safe && m.label == "3"));
    }

    #[test]
    fn test_detection_matches_exact_octave() {
        let presence = NotePresence {
            note: Note::new(PitchClass::E, 2),
            state: PresenceState::Fading,
            opacity: 0.25,
        };
        let marks = markers(&board(), None, &[presence], OverlayOptions::default());
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].position.string_index, 0);
        assert_eq!(marks[0].label, "E");
        assert!((marks[0].opacity() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_no_chord_and_no_detection_draws_nothing() {
        assert!(markers(&board(), None, &[], OverlayOptions::default()).is_empty());
    }

    #[test]
    fn test_label_mode_parsing() {
        assert_eq!("Note".parse::<NoteLabelMode>(), Ok(NoteLabelMode::Note));
        assert!("both".parse::<NoteLabelMode>().is_err());
    }
}
