//! # Guitar Tuning Module
//!
//! Open-string pitches for a six-string guitar.
//!
//! Strings are indexed from the lowest-pitched string upwards: index 0 is
//! the low E of standard tuning and index 5 the high E. Display code that
//! draws the high string on top has to reverse the order itself.

use serde::{Deserialize, Serialize};

use crate::note::{MAX_OCTAVE, MIN_OCTAVE, Note, PitchClass};
use crate::{Result, TheoryError};

/// Number of strings on a standard guitar.
pub const STRING_COUNT: usize = 6;

/// An ordered set of open-string notes, lowest string first.
///
/// A tuning with the wrong number of strings cannot be constructed, so
/// per-fret lookups never see a malformed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Note>", into = "Vec<Note>")]
pub struct Tuning {
    strings: [Note; STRING_COUNT],
}

impl Tuning {
    /// Builds a tuning from open-string notes, lowest string first.
    ///
    /// # Returns
    /// * `Err(TheoryError::InvalidTuning)` - Not exactly six notes
    /// * `Err(TheoryError::Range)` - An octave outside `MIN_OCTAVE..=MAX_OCTAVE`
    pub fn new(strings: Vec<Note>) -> Result<Self> {
        if let Some(note) = strings
            .iter()
            .find(|n| !(MIN_OCTAVE..=MAX_OCTAVE).contains(&n.octave))
        {
            return Err(TheoryError::range(
                "open string octave",
                note.octave,
                i64::from(MIN_OCTAVE),
                i64::from(MAX_OCTAVE),
            ));
        }
        let found = strings.len();
        let strings: [Note; STRING_COUNT] = strings
            .try_into()
            .map_err(|_| TheoryError::InvalidTuning {
                expected: STRING_COUNT,
                found,
            })?;
        Ok(Self { strings })
    }

    /// Standard tuning: E2 A2 D3 G3 B3 E4.
    pub fn standard() -> Self {
        Self {
            strings: [
                Note::new(PitchClass::E, 2),
                Note::new(PitchClass::A, 2),
                Note::new(PitchClass::D, 3),
                Note::new(PitchClass::G, 3),
                Note::new(PitchClass::B, 3),
                Note::new(PitchClass::E, 4),
            ],
        }
    }

    /// Drop D: the low string lowered a whole step to D2.
    pub fn drop_d() -> Self {
        let mut tuning = Self::standard();
        tuning.strings[0] = Note::new(PitchClass::D, 2);
        tuning
    }

    /// Open note of a string.
    ///
    /// # Returns
    /// * `Err(TheoryError::Range)` - `string_index` is not in 0..6
    pub fn open_note(&self, string_index: usize) -> Result<Note> {
        self.strings.get(string_index).copied().ok_or_else(|| {
            TheoryError::range("string index", string_index as i64, 0, STRING_COUNT as i64 - 1)
        })
    }

    pub fn strings(&self) -> &[Note; STRING_COUNT] {
        &self.strings
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<Note>> for Tuning {
    type Error = TheoryError;

    fn try_from(strings: Vec<Note>) -> Result<Self> {
        Self::new(strings)
    }
}

impl From<Tuning> for Vec<Note> {
    fn from(tuning: Tuning) -> Self {
        tuning.strings.to_vec()
    }
}
