//! # Fretboard Module
//!
//! Maps (string, fret) positions to the note they sound.
//!
//! ## Features
//! - Pitch of any position for a given tuning
//! - Configurable fret range (12, 17 or 24 frets)
//! - Enumeration of every position, and reverse lookup of where a note lies

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::note::Note;
use crate::tuning::{STRING_COUNT, Tuning};
use crate::{Result, TheoryError};

/// Computes the note sounding at a string and fret.
///
/// Raising the fret by one always raises the pitch by exactly one
/// semitone. The fret count of a [`Fretboard`] only limits which positions
/// are enumerated; here the fret is bounded only by the semitone index of
/// the result fitting in an `i32`.
///
/// # Arguments
/// * `tuning` - Open-string notes
/// * `string_index` - String number, 0 = lowest string
/// * `fret` - Fret number, 0 = open string
///
/// # Returns
/// * `Err(TheoryError::Range)` - Negative or unrepresentable fret, or string
///   index out of bounds
pub fn note_at(tuning: &Tuning, string_index: usize, fret: i32) -> Result<Note> {
    let open = tuning.open_note(string_index)?;
    let open_index = open.semitone_index();
    let max_fret = i64::from(i32::MAX) - i64::from(open_index);
    if fret < 0 {
        return Err(TheoryError::range("fret", fret, 0, max_fret));
    }

    // Same as advancing the pitch class and carrying into the octave.
    let total = open_index
        .checked_add(fret)
        .ok_or_else(|| TheoryError::range("fret", fret, 0, max_fret))?;
    Ok(Note::from_semitone_index(total))
}

/// Supported fretboard lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FretCount {
    Twelve,
    #[default]
    Seventeen,
    TwentyFour,
}

impl FretCount {
    pub fn frets(self) -> u8 {
        match self {
            FretCount::Twelve => 12,
            FretCount::Seventeen => 17,
            FretCount::TwentyFour => 24,
        }
    }
}

impl TryFrom<u8> for FretCount {
    type Error = TheoryError;

    fn try_from(frets: u8) -> Result<Self> {
        match frets {
            12 => Ok(FretCount::Twelve),
            17 => Ok(FretCount::Seventeen),
            24 => Ok(FretCount::TwentyFour),
            other => Err(TheoryError::range("fret count", other, 12, 24)),
        }
    }
}

impl From<FretCount> for u8 {
    fn from(count: FretCount) -> Self {
        count.frets()
    }
}

/// A single playable spot on the fretboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub string_index: usize,
    pub fret: u8,
    pub note: Note,
}

/// A tuned fretboard with a fixed number of frets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fretboard {
    tuning: Tuning,
    fret_count: FretCount,
}

impl Fretboard {
    pub fn new(tuning: Tuning, fret_count: FretCount) -> Self {
        Self { tuning, fret_count }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn fret_count(&self) -> FretCount {
        self.fret_count
    }

    pub fn set_fret_count(&mut self, fret_count: FretCount) {
        self.fret_count = fret_count;
    }

    /// Note at a position, limited to `0..=fret_count`.
    pub fn note_at(&self, string_index: usize, fret: i32) -> Result<Note> {
        let max = i32::from(self.fret_count.frets());
        if fret > max {
            return Err(TheoryError::range("fret", fret, 0, i64::from(max)));
        }
        note_at(&self.tuning, string_index, fret)
    }

    /// Every position on the board, string by string from the lowest,
    /// frets ascending.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let frets = self.fret_count.frets();
        (0..STRING_COUNT).flat_map(move |string_index| {
            let open = self.tuning.strings()[string_index];
            (0..=frets).map(move |fret| Position {
                string_index,
                fret,
                note: open.transpose(i32::from(fret)),
            })
        })
    }

    /// All positions that sound exactly `note` (pitch class and octave).
    pub fn positions_of(&self, note: Note) -> Vec<Position> {
        let matches: Vec<Position> = self.positions().filter(|p| p.note == note).collect();
        if matches.is_empty() {
            let lowest = self.tuning.strings()[0];
            let highest = self.tuning.strings()[STRING_COUNT - 1]
                .transpose(i32::from(self.fret_count.frets()));
            warn!(%note, %lowest, %highest, "note is not on the fretboard");
        } else {
            debug!(%note, count = matches.len(), "note located on fretboard");
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::PitchClass;

    #[test]
    fn test_open_and_fretted_notes() {
        let tuning = Tuning::standard();
        assert_eq!(note_at(&tuning, 0, 0).unwrap().to_string(), "E2");
        assert_eq!(note_at(&tuning, 0, 5).unwrap().to_string(), "A2");
        assert_eq!(note_at(&tuning, 5, 12).unwrap().to_string(), "E5");
        // B3 string, 1st fret crosses into octave 4.
        assert_eq!(note_at(&tuning, 4, 1).unwrap().to_string(), "C4");
    }

    #[test]
    fn test_matches_transpose_of_open_note() {
        let board = Fretboard::new(Tuning::standard(), FretCount::TwentyFour);
        for position in board.positions() {
            let direct = board.note_at(position.string_index, i32::from(position.fret)).unwrap();
            assert_eq!(direct, position.note);
        }
    }

    #[test]
    fn test_range_errors() {
        let tuning = Tuning::standard();
        assert!(matches!(note_at(&tuning, 0, -1), Err(TheoryError::Range { .. })));
        assert!(matches!(note_at(&tuning, 6, 0), Err(TheoryError::Range { .. })));
        let board = Fretboard::new(tuning, FretCount::Twelve);
        assert!(board.note_at(0, 12).is_ok());
        assert!(matches!(board.note_at(0, 13), Err(TheoryError::Range { .. })));
    }

    #[test]
    fn test_huge_fret_is_range_error() {
        let tuning = Tuning::standard();
        assert!(matches!(note_at(&tuning, 0, i32::MAX), Err(TheoryError::Range { .. })));
        assert!(matches!(note_at(&tuning, 5, i32::MAX), Err(TheoryError::Range { .. })));

        // The largest representable fret still resolves.
        let e2 = tuning.open_note(0).unwrap();
        let max_fret = i32::MAX - e2.semitone_index();
        let top = note_at(&tuning, 0, max_fret).unwrap();
        assert_eq!(top.semitone_index(), i32::MAX);
        assert_eq!(top.pitch_class, PitchClass::from_index(i32::MAX));
    }

    #[test]
    fn test_positions_count() {
        let board = Fretboard::new(Tuning::standard(), FretCount::Seventeen);
        assert_eq!(board.positions().count(), 6 * 18);
    }

    #[test]
    fn test_positions_of_exact_note() {
        let board = Fretboard::new(Tuning::standard(), FretCount::Twelve);
        let e4 = Note::new(PitchClass::E, 4);
        let found: Vec<(usize, u8)> = board
            .positions_of(e4)
            .iter()
            .map(|p| (p.string_index, p.fret))
            .collect();
        assert_eq!(found, vec![(3, 9), (4, 5), (5, 0)]);
        assert!(board.positions_of(Note::new(PitchClass::C, 7)).is_empty());
    }

    #[test]
    fn test_fret_count_conversion() {
        assert_eq!(FretCount::try_from(24), Ok(FretCount::TwentyFour));
        assert!(FretCount::try_from(20).is_err());
        assert_eq!(u8::from(FretCount::default()), 17);
    }
}
