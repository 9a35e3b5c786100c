//! # Progression Module
//!
//! Generates chord progressions in a major key from fixed templates.
//!
//! ## Templates
//! - Diatonic: the seven seventh chords of the major scale
//! - 12-bar blues: I7 I7 I7 I7 IV7 IV7 I7 I7 V7 IV7 I7 V7
//! - ii-V-I: ii7 V7 Imaj7 Imaj7
//!
//! Only the major scale is harmonised; modes are not supported.

use std::fmt;
use std::str::FromStr;

use crate::chord::{Chord, ChordQuality};
use crate::note::PitchClass;
use crate::{Result, TheoryError};

/// Scale degree offset, quality and roman numeral for each degree of the
/// major scale.
const MAJOR_SCALE_HARMONY: [(i32, ChordQuality, &str); 7] = [
    (0, ChordQuality::MajorSeventh, "I"),
    (2, ChordQuality::MinorSeventh, "ii"),
    (4, ChordQuality::MinorSeventh, "iii"),
    (5, ChordQuality::MajorSeventh, "IV"),
    (7, ChordQuality::DominantSeventh, "V"),
    (9, ChordQuality::MinorSeventh, "vi"),
    (11, ChordQuality::MinorSevenFlatFive, "vii°"),
];

const TONIC: i32 = 0;
const SUPERTONIC: i32 = 2;
const SUBDOMINANT: i32 = 5;
const DOMINANT: i32 = 7;

/// Semitone offset of each bar's root in a 12-bar blues.
#[rustfmt::skip]
const TWELVE_BAR_ROOTS: [i32; 12] = [
    TONIC, TONIC, TONIC, TONIC,
    SUBDOMINANT, SUBDOMINANT, TONIC, TONIC,
    DOMINANT, SUBDOMINANT, TONIC, DOMINANT,
];

/// A diatonic chord together with its roman-numeral degree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiatonicChord {
    pub degree: &'static str,
    pub chord: Chord,
}

/// The seven diatonic seventh chords of `key` major, I to vii°.
pub fn diatonic_chords(key: PitchClass) -> Vec<DiatonicChord> {
    MAJOR_SCALE_HARMONY
        .iter()
        .map(|&(offset, quality, degree)| DiatonicChord {
            degree,
            chord: Chord::new(key.transpose(offset), quality),
        })
        .collect()
}

/// Twelve dominant seventh chords on I, IV and V of `key`.
pub fn twelve_bar_blues(key: PitchClass) -> Vec<Chord> {
    TWELVE_BAR_ROOTS
        .iter()
        .map(|&offset| Chord::new(key.transpose(offset), ChordQuality::DominantSeventh))
        .collect()
}

/// ii7 - V7 - Imaj7 - Imaj7 in `key`.
pub fn ii_v_i(key: PitchClass) -> Vec<Chord> {
    vec![
        Chord::new(key.transpose(SUPERTONIC), ChordQuality::MinorSeventh),
        Chord::new(key.transpose(DOMINANT), ChordQuality::DominantSeventh),
        Chord::new(key.transpose(TONIC), ChordQuality::MajorSeventh),
        Chord::new(key.transpose(TONIC), ChordQuality::MajorSeventh),
    ]
}

/// Selector for the bulk-load progressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressionTemplate {
    Diatonic,
    TwelveBarBlues,
    TwoFiveOne,
}

impl ProgressionTemplate {
    pub fn generate(self, key: PitchClass) -> Vec<Chord> {
        match self {
            ProgressionTemplate::Diatonic => {
                diatonic_chords(key).into_iter().map(|d| d.chord).collect()
            }
            ProgressionTemplate::TwelveBarBlues => twelve_bar_blues(key),
            ProgressionTemplate::TwoFiveOne => ii_v_i(key),
        }
    }
}

impl fmt::Display for ProgressionTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProgressionTemplate::Diatonic => "diatonic",
            ProgressionTemplate::TwelveBarBlues => "12-bar blues",
            ProgressionTemplate::TwoFiveOne => "ii-V-I",
        };
        f.write_str(name)
    }
}

impl FromStr for ProgressionTemplate {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diatonic" => Ok(ProgressionTemplate::Diatonic),
            "blues" | "12-bar" | "12-bar-blues" | "twelve-bar" => {
                Ok(ProgressionTemplate::TwelveBarBlues)
            }
            "ii-v-i" | "2-5-1" | "251" | "jazz" => Ok(ProgressionTemplate::TwoFiveOne),
            _ => Err(TheoryError::InvalidName(s.to_string())),
        }
    }
}
