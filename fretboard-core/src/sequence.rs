//! The ordered, editable list of chords a practice session plays through.

use crate::chord::Chord;
use crate::{Result, TheoryError};

/// Chords in playing order. Insertion order is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    chords: Vec<Chord>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chord: Chord) {
        self.chords.push(chord);
    }

    /// Removes and returns the chord at `index`, shifting later chords down.
    pub fn remove(&mut self, index: usize) -> Result<Chord> {
        if index >= self.chords.len() {
            return Err(self.index_error(index));
        }
        Ok(self.chords.remove(index))
    }

    pub fn clear(&mut self) {
        self.chords.clear();
    }

    /// Clears the sequence, then appends `chords` one by one.
    ///
    /// This is two steps, not an atomic swap: anyone observing the sequence
    /// between them sees it empty.
    pub fn replace_with(&mut self, chords: impl IntoIterator<Item = Chord>) {
        self.clear();
        for chord in chords {
            self.push(chord);
        }
    }

    pub fn get(&self, index: usize) -> Option<&Chord> {
        self.chords.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chord> {
        self.chords.iter()
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    pub(crate) fn index_error(&self, index: usize) -> TheoryError {
        if self.chords.is_empty() {
            return TheoryError::Empty { what: "sequence" };
        }
        TheoryError::range(
            "sequence index",
            index as i64,
            0,
            self.chords.len() as i64 - 1,
        )
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Chord;
    type IntoIter = std::slice::Iter<'a, Chord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Chord> for Sequence {
    fn from_iter<I: IntoIterator<Item = Chord>>(iter: I) -> Self {
        Self {
            chords: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::ChordQuality;
    use crate::note::PitchClass;
    use crate::progression::twelve_bar_blues;

    #[test]
    fn test_push_and_remove_preserve_order() {
        let mut seq = Sequence::new();
        seq.push(Chord::new(PitchClass::C, ChordQuality::MajorSeventh));
        seq.push(Chord::new(PitchClass::D, ChordQuality::MinorSeventh));
        seq.push(Chord::new(PitchClass::G, ChordQuality::DominantSeventh));

        let removed = seq.remove(1).unwrap();
        assert_eq!(removed.name(), "Dmin7");
        let names: Vec<String> = seq.iter().map(Chord::name).collect();
        assert_eq!(names, ["Cmaj7", "G7"]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut seq = Sequence::new();
        let err = seq.remove(0).unwrap_err();
        assert_eq!(err, TheoryError::Empty { what: "sequence" });
        assert_eq!(err.to_string(), "sequence is empty");

        seq.push(Chord::new(PitchClass::E, ChordQuality::MinorSeventh));
        let err = seq.remove(3).unwrap_err();
        assert!(matches!(err, TheoryError::Range { value: 3, min: 0, max: 0, .. }));
    }

    #[test]
    fn test_replace_with_clears_first() {
        let mut seq: Sequence = twelve_bar_blues(PitchClass::E).into_iter().collect();
        assert_eq!(seq.len(), 12);
        seq.replace_with(vec![Chord::new(PitchClass::A, ChordQuality::MajorTriad)]);
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.get(0).map(Chord::name), Some("A".to_string()));
        seq.clear();
        assert!(seq.is_empty());
    }
}
