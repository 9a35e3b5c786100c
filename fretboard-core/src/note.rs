//! # Note Module
//!
//! Pitch classes and octave-resolved notes in scientific pitch notation.
//!
//! ## Features
//! - Closed 12-value `PitchClass` with modulo-12 arithmetic
//! - `Note` ordered by its semitone index (`pitch_class + 12 * octave`)
//! - Parsing of sharp and flat spellings (`C#4`, `Db4`, `Bb-1`)
//! - Equal temperament frequency of any note (A4 = 440 Hz)

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::{Result, TheoryError};

/// Number of semitones in an octave.
pub const SEMITONES_PER_OCTAVE: i32 = 12;

/// Reference pitch for A4 in Hz.
pub const A4_FREQUENCY: f64 = 440.0;

/// Octave range accepted when parsing notes and building tunings.
pub const MIN_OCTAVE: i32 = -1;
pub const MAX_OCTAVE: i32 = 9;

/// Semitone index of A4 (`9 + 12 * 4`).
const A4_SEMITONE_INDEX: i32 = 57;

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// One of the 12 chromatic pitch classes, octave-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

/// Name to pitch class lookups, sharps and flats.
///
/// Spellings that cross an octave boundary (`Cb`, `B#`) are not accepted
/// because they would make the octave number of a parsed note ambiguous.
static NAME_MAP: Lazy<BTreeMap<&'static str, PitchClass>> = Lazy::new(|| {
    let mut map: BTreeMap<&'static str, PitchClass> = SHARP_NAMES
        .iter()
        .zip(PitchClass::ALL)
        .map(|(&name, pc)| (name, pc))
        .collect();
    map.insert("Db", PitchClass::CSharp);
    map.insert("Eb", PitchClass::DSharp);
    map.insert("Gb", PitchClass::FSharp);
    map.insert("Ab", PitchClass::GSharp);
    map.insert("Bb", PitchClass::ASharp);
    map
});

impl PitchClass {
    /// All pitch classes in ascending order from C.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Semitone index within the octave (C=0, B=11).
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Pitch class for any integer, reduced modulo 12.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(SEMITONES_PER_OCTAVE) as usize]
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self::from_index(self.index() as i32 + semitones)
    }

    /// Distance in semitones going up from `root` to `self`, in 0..12.
    pub fn semitones_above(self, root: PitchClass) -> u8 {
        (self.index() as i32 - root.index() as i32).rem_euclid(SEMITONES_PER_OCTAVE) as u8
    }

    /// Sharp spelling of the pitch class (e.g. "F#").
    pub fn name(self) -> &'static str {
        SHARP_NAMES[self.index() as usize]
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let normalized = match chars.next() {
            Some(letter) => format!("{}{}", letter.to_ascii_uppercase(), chars.as_str()),
            None => return Err(TheoryError::InvalidName(s.to_string())),
        };
        NAME_MAP
            .get(normalized.as_str())
            .copied()
            .ok_or_else(|| TheoryError::InvalidName(s.to_string()))
    }
}

impl TryFrom<String> for PitchClass {
    type Error = TheoryError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PitchClass> for String {
    fn from(pc: PitchClass) -> Self {
        pc.name().to_string()
    }
}

/// A pitch class paired with a scientific pitch notation octave.
///
/// Two notes are equal only if both the pitch class and the octave match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Note {
    pub pitch_class: PitchClass,
    pub octave: i32,
}

impl Note {
    pub const fn new(pitch_class: PitchClass, octave: i32) -> Self {
        Self {
            pitch_class,
            octave,
        }
    }

    /// Semitones since C0: `pitch_class + 12 * octave`.
    pub fn semitone_index(self) -> i32 {
        self.pitch_class.index() as i32 + SEMITONES_PER_OCTAVE * self.octave
    }

    pub fn from_semitone_index(index: i32) -> Self {
        Self::new(
            PitchClass::from_index(index),
            index.div_euclid(SEMITONES_PER_OCTAVE),
        )
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self::from_semitone_index(self.semitone_index() + semitones)
    }

    /// Equal temperament frequency in Hz, referenced to A4 = 440 Hz.
    pub fn frequency(self) -> f64 {
        let offset = (self.semitone_index() - A4_SEMITONE_INDEX) as f64;
        A4_FREQUENCY * 2.0_f64.powf(offset / SEMITONES_PER_OCTAVE as f64)
    }
}

impl Ord for Note {
    fn cmp(&self, other: &Self) -> Ordering {
        self.semitone_index().cmp(&other.semitone_index())
    }
}

impl PartialOrd for Note {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class, self.octave)
    }
}

impl FromStr for Note {
    type Err = TheoryError;

    /// Parses names like "E2", "C#4", "Bb3" or "A-1". The octave must lie
    /// in `MIN_OCTAVE..=MAX_OCTAVE`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let split = trimmed
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_ascii_digit() || *c == '-')
            .map(|(i, _)| i)
            .ok_or_else(|| TheoryError::InvalidName(s.to_string()))?;

        let (name, octave) = trimmed.split_at(split);
        let pitch_class = name
            .parse::<PitchClass>()
            .map_err(|_| TheoryError::InvalidName(s.to_string()))?;
        let octave = octave
            .parse::<i32>()
            .ok()
            .filter(|o| (MIN_OCTAVE..=MAX_OCTAVE).contains(o))
            .ok_or_else(|| TheoryError::InvalidName(s.to_string()))?;

        Ok(Note::new(pitch_class, octave))
    }
}

impl TryFrom<String> for Note {
    type Error = TheoryError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Note> for String {
    fn from(note: Note) -> Self {
        note.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class_arithmetic_wraps() {
        assert_eq!(PitchClass::B.transpose(1), PitchClass::C);
        assert_eq!(PitchClass::C.transpose(-1), PitchClass::B);
        assert_eq!(PitchClass::from_index(25), PitchClass::CSharp);
        assert_eq!(PitchClass::C.semitones_above(PitchClass::A), 3);
    }

    #[test]
    fn test_parse_sharps_and_flats() {
        assert_eq!("C#".parse::<PitchClass>(), Ok(PitchClass::CSharp));
        assert_eq!("Db".parse::<PitchClass>(), Ok(PitchClass::CSharp));
        assert_eq!("bb".parse::<PitchClass>(), Ok(PitchClass::ASharp));
        assert!("H".parse::<PitchClass>().is_err());
        assert!("Cb".parse::<PitchClass>().is_err());
    }

    #[test]
    fn test_parse_note() {
        assert_eq!("E2".parse::<Note>(), Ok(Note::new(PitchClass::E, 2)));
        assert_eq!("F#3".parse::<Note>(), Ok(Note::new(PitchClass::FSharp, 3)));
        assert_eq!("Bb4".parse::<Note>(), Ok(Note::new(PitchClass::ASharp, 4)));
        assert_eq!("A-1".parse::<Note>(), Ok(Note::new(PitchClass::A, -1)));
        assert!("E".parse::<Note>().is_err());
        assert!("X4".parse::<Note>().is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range_octave() {
        assert_eq!("C9".parse::<Note>(), Ok(Note::new(PitchClass::C, 9)));
        assert!(matches!("C10".parse::<Note>(), Err(TheoryError::InvalidName(_))));
        assert!(matches!("A-2".parse::<Note>(), Err(TheoryError::InvalidName(_))));
        assert!(matches!("E2147483647".parse::<Note>(), Err(TheoryError::InvalidName(_))));
    }

    #[test]
    fn test_display_uses_sharps() {
        assert_eq!(Note::new(PitchClass::GSharp, 3).to_string(), "G#3");
    }

    #[test]
    fn test_ordering_follows_semitone_index() {
        let b3 = Note::new(PitchClass::B, 3);
        let c4 = Note::new(PitchClass::C, 4);
        assert!(b3 < c4);
        assert_eq!(b3.transpose(1), c4);
        assert_eq!(Note::from_semitone_index(c4.semitone_index()), c4);
    }

    #[test]
    fn test_a4_frequency() {
        let freq = Note::new(PitchClass::A, 4).frequency();
        assert!((freq - 440.0).abs() < 1e-9);
        let e2 = Note::new(PitchClass::E, 2).frequency();
        assert!((e2 - 82.4069).abs() < 0.001);
    }

    #[test]
    fn test_serde_as_string() {
        let note = Note::new(PitchClass::DSharp, 3);
        let json = serde_json::to_string(&note).unwrap();
        assert_eq!(json, "\"D#3\"");
        let back: Note = serde_json::from_str("\"Eb3\"").unwrap();
        assert_eq!(back, note);
    }
}
