//! # Chord Module
//!
//! Chord qualities and octave-resolved chord tones.
//!
//! Chord tones are placed with a fixed low/high split: a tone lands in
//! octave 3 unless `root + offset` reaches 12, in which case it lands in
//! octave 4. This keeps generated chords near the middle of the guitar's
//! register. There is no voice leading between consecutive chords.

use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::note::{Note, PitchClass, SEMITONES_PER_OCTAVE};
use crate::{Result, TheoryError};

/// Octave of chord tones that do not wrap past B.
pub const CHORD_BASE_OCTAVE: i32 = 3;

/// The intervallic formula of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChordQuality {
    MajorSeventh,
    MinorSeventh,
    DominantSeventh,
    /// Half-diminished, written m7b5.
    MinorSevenFlatFive,
    DiminishedSeventh,
    /// Root, major third and fifth.
    #[default]
    MajorTriad,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 6] = [
        ChordQuality::MajorSeventh,
        ChordQuality::MinorSeventh,
        ChordQuality::DominantSeventh,
        ChordQuality::MinorSevenFlatFive,
        ChordQuality::DiminishedSeventh,
        ChordQuality::MajorTriad,
    ];

    /// Semitone offsets from the root, root first.
    pub fn offsets(self) -> &'static [u8] {
        match self {
            ChordQuality::MajorSeventh => &[0, 4, 7, 11],
            ChordQuality::MinorSeventh => &[0, 3, 7, 10],
            ChordQuality::DominantSeventh => &[0, 4, 7, 10],
            ChordQuality::MinorSevenFlatFive => &[0, 3, 6, 10],
            ChordQuality::DiminishedSeventh => &[0, 3, 6, 9],
            ChordQuality::MajorTriad => &[0, 4, 7],
        }
    }

    /// Number of tones in the chord.
    pub fn arity(self) -> usize {
        self.offsets().len()
    }

    /// Chord-symbol suffix, e.g. "maj7" or "7". The triad has none.
    pub fn symbol(self) -> &'static str {
        match self {
            ChordQuality::MajorSeventh => "maj7",
            ChordQuality::MinorSeventh => "min7",
            ChordQuality::DominantSeventh => "7",
            ChordQuality::MinorSevenFlatFive => "m7b5",
            ChordQuality::DiminishedSeventh => "dim7",
            ChordQuality::MajorTriad => "",
        }
    }

    /// Parses a symbol, falling back to a major triad when it is unknown.
    ///
    /// The fallback is logged so it never happens silently.
    pub fn parse_lenient(symbol: &str) -> Self {
        symbol.parse().unwrap_or_else(|err| {
            warn!(%err, "falling back to a major triad");
            ChordQuality::MajorTriad
        })
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for ChordQuality {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "maj7" | "M7" | "Maj7" | "major7" => Ok(ChordQuality::MajorSeventh),
            "min7" | "m7" | "-7" | "minor7" => Ok(ChordQuality::MinorSeventh),
            "7" | "dom7" | "dominant7" => Ok(ChordQuality::DominantSeventh),
            "m7b5" | "ø" | "ø7" | "half-dim" => Ok(ChordQuality::MinorSevenFlatFive),
            "dim7" | "°7" | "o7" => Ok(ChordQuality::DiminishedSeventh),
            "" | "maj" | "M" | "triad" => Ok(ChordQuality::MajorTriad),
            other => Err(TheoryError::UnknownQuality(other.to_string())),
        }
    }
}

/// How long a chord lasts in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChordDuration {
    /// One full measure.
    #[default]
    Measure,
    Half,
    Quarter,
}

impl ChordDuration {
    /// Transport notation: "1m", "2n" or "4n".
    pub fn symbol(self) -> &'static str {
        match self {
            ChordDuration::Measure => "1m",
            ChordDuration::Half => "2n",
            ChordDuration::Quarter => "4n",
        }
    }
}

/// Computes the tones of a chord, root first.
///
/// # Arguments
/// * `root` - Root pitch class
/// * `quality` - Chord quality
///
/// # Returns
/// * One note per offset of `quality`, in offset order. Each lands in
///   octave 3, or octave 4 once `root + offset` reaches 12.
pub fn chord_tones(root: PitchClass, quality: ChordQuality) -> Vec<Note> {
    quality
        .offsets()
        .iter()
        .map(|&offset| {
            let total = root.index() as i32 + offset as i32;
            let octave = if total < SEMITONES_PER_OCTAVE {
                CHORD_BASE_OCTAVE
            } else {
                CHORD_BASE_OCTAVE + 1
            };
            Note::new(PitchClass::from_index(total), octave)
        })
        .collect()
}

/// A chord with its tones resolved to concrete notes.
///
/// The notes are always derived from the root and quality, so their count
/// matches the quality's arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    root: PitchClass,
    quality: ChordQuality,
    notes: Vec<Note>,
    duration: ChordDuration,
}

impl Chord {
    pub fn new(root: PitchClass, quality: ChordQuality) -> Self {
        Self {
            root,
            quality,
            notes: chord_tones(root, quality),
            duration: ChordDuration::default(),
        }
    }

    pub fn with_duration(mut self, duration: ChordDuration) -> Self {
        self.duration = duration;
        self
    }

    pub fn root(&self) -> PitchClass {
        self.root
    }

    pub fn quality(&self) -> ChordQuality {
        self.quality
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn duration(&self) -> ChordDuration {
        self.duration
    }

    /// Chord symbol, e.g. "Cmaj7", "G7" or "F" for a triad.
    pub fn name(&self) -> String {
        format!("{}{}", self.root, self.quality)
    }

    pub fn pitch_classes(&self) -> impl Iterator<Item = PitchClass> + '_ {
        self.notes.iter().map(|n| n.pitch_class)
    }

    /// Whether `pitch_class` is a chord tone in any octave.
    pub fn contains(&self, pitch_class: PitchClass) -> bool {
        self.pitch_classes().any(|pc| pc == pitch_class)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
