//! Scale-degree labels of a pitch class relative to a chord root.

use std::fmt;

use crate::chord::Chord;
use crate::note::PitchClass;

/// Interval above a root, named the way chord charts name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalLabel {
    Root,
    FlatSecond,
    Second,
    FlatThird,
    Third,
    Fourth,
    FlatFifth,
    Fifth,
    FlatSixth,
    Sixth,
    FlatSeventh,
    Seventh,
}

impl IntervalLabel {
    const BY_SEMITONE: [IntervalLabel; 12] = [
        IntervalLabel::Root,
        IntervalLabel::FlatSecond,
        IntervalLabel::Second,
        IntervalLabel::FlatThird,
        IntervalLabel::Third,
        IntervalLabel::Fourth,
        IntervalLabel::FlatFifth,
        IntervalLabel::Fifth,
        IntervalLabel::FlatSixth,
        IntervalLabel::Sixth,
        IntervalLabel::FlatSeventh,
        IntervalLabel::Seventh,
    ];

    /// Label for a distance in semitones, taken modulo 12.
    pub fn from_semitones(semitones: u8) -> Self {
        Self::BY_SEMITONE[usize::from(semitones % 12)]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IntervalLabel::Root => "R",
            IntervalLabel::FlatSecond => "b2",
            IntervalLabel::Second => "2",
            IntervalLabel::FlatThird => "b3",
            IntervalLabel::Third => "3",
            IntervalLabel::Fourth => "4",
            IntervalLabel::FlatFifth => "b5",
            IntervalLabel::Fifth => "5",
            IntervalLabel::FlatSixth => "b6",
            IntervalLabel::Sixth => "6",
            IntervalLabel::FlatSeventh => "b7",
            IntervalLabel::Seventh => "7",
        }
    }
}

impl fmt::Display for IntervalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Labels `note` against `root`. Total over all pitch-class pairs.
pub fn interval_label(root: PitchClass, note: PitchClass) -> IntervalLabel {
    IntervalLabel::from_semitones(note.semitones_above(root))
}

/// Labels every tone of `chord` against its root, in chord order.
pub fn chord_labels(chord: &Chord) -> Vec<IntervalLabel> {
    chord
        .pitch_classes()
        .map(|pc| interval_label(chord.root(), pc))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::ChordQuality;

    fn labels(root: PitchClass, quality: ChordQuality) -> Vec<&'static str> {
        chord_labels(&Chord::new(root, quality))
            .into_iter()
            .map(IntervalLabel::as_str)
            .collect()
    }

    #[test]
    fn test_root_is_r() {
        for root in PitchClass::ALL {
            assert_eq!(interval_label(root, root), IntervalLabel::Root);
        }
    }

    #[test]
    fn test_wraps_below_root() {
        // C is a minor third above A.
        assert_eq!(interval_label(PitchClass::A, PitchClass::C).as_str(), "b3");
        assert_eq!(interval_label(PitchClass::D, PitchClass::CSharp).as_str(), "7");
    }

    #[test]
    fn test_chord_labels_per_quality() {
        assert_eq!(labels(PitchClass::C, ChordQuality::MajorSeventh), ["R", "3", "5", "7"]);
        assert_eq!(labels(PitchClass::D, ChordQuality::MinorSeventh), ["R", "b3", "5", "b7"]);
        assert_eq!(labels(PitchClass::G, ChordQuality::DominantSeventh), ["R", "3", "5", "b7"]);
        assert_eq!(
            labels(PitchClass::B, ChordQuality::MinorSevenFlatFive),
            ["R", "b3", "b5", "b7"]
        );
        assert_eq!(labels(PitchClass::E, ChordQuality::DiminishedSeventh), ["R", "b3", "b5", "6"]);
        assert_eq!(labels(PitchClass::F, ChordQuality::MajorTriad), ["R", "3", "5"]);
    }
}
