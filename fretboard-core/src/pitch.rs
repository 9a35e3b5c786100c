//! # Pitch Conversion Module
//!
//! This module turns frequency estimates into notes. The estimate itself
//! comes from an external pitch estimator; nothing here analyses audio.
//!
//! ## Features
//! - 12-tone equal temperament conversion referenced to A4 = 440 Hz
//! - Cent deviation from the nearest note
//! - Range and amplitude gating of raw estimates before conversion

use tracing::debug;

use crate::note::{A4_FREQUENCY, Note, SEMITONES_PER_OCTAVE};
use crate::{Result, TheoryError};

/// Lowest frequency accepted as a guitar note (exclusive).
pub const MIN_DETECTABLE_HZ: f64 = 70.0;

/// Highest frequency accepted as a guitar note (exclusive). Covers the
/// fundamental range of a 24-fret guitar plus low harmonics.
pub const MAX_DETECTABLE_HZ: f64 = 2000.0;

/// Default RMS level an estimate must exceed to count as a detection.
pub const DEFAULT_SENSITIVITY: f64 = 0.001;

/// Converts a frequency to the nearest equal-tempered note.
///
/// The converter has no range restriction of its own. Gating to the
/// musical range is the caller's job (see [`DetectionGate`]).
///
/// # Arguments
/// * `frequency` - Frequency in Hz
///
/// # Returns
/// * `Ok(note)` - Nearest note, e.g. 440 Hz -> A4
/// * `Err(TheoryError::Domain)` - Frequency is zero, negative or not finite
pub fn frequency_to_note(frequency: f64) -> Result<Note> {
    if !(frequency.is_finite() && frequency > 0.0) {
        return Err(TheoryError::Domain { frequency });
    }

    let semitones_from_a4 = SEMITONES_PER_OCTAVE as f64 * (frequency / A4_FREQUENCY).log2();
    let semitone_offset = semitones_from_a4.round() as i32;
    // MIDI numbering puts A4 at 69 and C-1 at 0.
    let midi = semitone_offset + 69;
    Ok(Note::from_semitone_index(midi - SEMITONES_PER_OCTAVE))
}

/// Calculates the deviation from a target frequency in cents.
///
/// 100 cents = 1 semitone. Positive values are sharp, negative flat.
pub fn cents_deviation(frequency: f64, target_frequency: f64) -> f64 {
    1200.0 * (frequency / target_frequency).log2()
}

/// A frequency resolved to its nearest note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchReading {
    pub note: Note,
    /// The measured frequency in Hz.
    pub frequency: f64,
    /// Offset from the note's exact frequency, in cents.
    pub cents: f64,
}

/// Finds the nearest note to `frequency` and how far off it is.
pub fn analyze_frequency(frequency: f64) -> Result<PitchReading> {
    let note = frequency_to_note(frequency)?;
    Ok(PitchReading {
        note,
        frequency,
        cents: cents_deviation(frequency, note.frequency()),
    })
}

/// One raw result from the external pitch estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchEstimate {
    /// Estimated fundamental in Hz.
    pub frequency: f64,
    /// RMS level of the analysed frame (0.0 to 1.0).
    pub rms: f64,
}

/// Range and amplitude gate applied to estimates before they become notes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionGate {
    pub min_hz: f64,
    pub max_hz: f64,
    /// Minimum RMS level; frames at or below it are treated as silence.
    pub sensitivity: f64,
}

impl Default for DetectionGate {
    fn default() -> Self {
        Self {
            min_hz: MIN_DETECTABLE_HZ,
            max_hz: MAX_DETECTABLE_HZ,
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl DetectionGate {
    pub fn with_sensitivity(sensitivity: f64) -> Self {
        Self {
            sensitivity,
            ..Self::default()
        }
    }

    /// Applies the gate and converts a passing estimate.
    ///
    /// # Returns
    /// * `Some(reading)` - Estimate is in range and loud enough
    /// * `None` - No detection (out of range, too quiet, or no pitch)
    pub fn read(&self, estimate: PitchEstimate) -> Option<PitchReading> {
        if !(estimate.frequency > self.min_hz && estimate.frequency < self.max_hz) {
            debug!(frequency = estimate.frequency, "estimate outside detectable range");
            return None;
        }
        if estimate.rms <= self.sensitivity {
            debug!(
                rms = estimate.rms,
                sensitivity = self.sensitivity,
                "estimate below sensitivity"
            );
            return None;
        }
        analyze_frequency(estimate.frequency).ok()
    }

    /// Same as [`read`](Self::read) but keeps only the note.
    pub fn gate(&self, estimate: PitchEstimate) -> Option<Note> {
        self.read(estimate).map(|reading| reading.note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::PitchClass;

    #[test]
    fn test_a440_is_a4() {
        assert_eq!(frequency_to_note(440.0), Ok(Note::new(PitchClass::A, 4)));
    }

    #[test]
    fn test_open_strings() {
        assert_eq!(frequency_to_note(82.41).unwrap().to_string(), "E2");
        assert_eq!(frequency_to_note(110.0).unwrap().to_string(), "A2");
        assert_eq!(frequency_to_note(329.63).unwrap().to_string(), "E4");
    }

    #[test]
    fn test_rounds_to_nearest_semitone() {
        // 40 cents sharp of A4 still reads as A4, 60 cents sharp as A#4.
        assert_eq!(frequency_to_note(440.0 * 2f64.powf(0.4 / 12.0)).unwrap().to_string(), "A4");
        assert_eq!(frequency_to_note(440.0 * 2f64.powf(0.6 / 12.0)).unwrap().to_string(), "A#4");
    }

    #[test]
    fn test_octave_boundary_between_b_and_c() {
        assert_eq!(frequency_to_note(261.63).unwrap().to_string(), "C4");
        assert_eq!(frequency_to_note(246.94).unwrap().to_string(), "B3");
    }

    #[test]
    fn test_non_positive_frequency_is_domain_error() {
        assert!(matches!(frequency_to_note(0.0), Err(TheoryError::Domain { .. })));
        assert!(matches!(frequency_to_note(-5.0), Err(TheoryError::Domain { .. })));
        assert!(matches!(frequency_to_note(f64::NAN), Err(TheoryError::Domain { .. })));
    }

    #[test]
    fn test_cents_deviation() {
        assert!((cents_deviation(880.0, 440.0) - 1200.0).abs() < 1e-9);
        let reading = analyze_frequency(445.0).unwrap();
        assert_eq!(reading.note.to_string(), "A4");
        assert!(reading.cents > 19.0 && reading.cents < 20.0);
    }

    #[test]
    fn test_gate_rejects_out_of_range_and_quiet() {
        let gate = DetectionGate::default();
        assert!(gate.gate(PitchEstimate { frequency: 70.0, rms: 0.5 }).is_none());
        assert!(gate.gate(PitchEstimate { frequency: 2000.0, rms: 0.5 }).is_none());
        // Open interval: just inside either bound passes.
        assert!(gate.gate(PitchEstimate { frequency: 70.1, rms: 0.5 }).is_some());
        assert!(gate.gate(PitchEstimate { frequency: 1999.9, rms: 0.5 }).is_some());
        assert!(gate.gate(PitchEstimate { frequency: 440.0, rms: 0.001 }).is_none());
        assert_eq!(
            gate.gate(PitchEstimate { frequency: 440.0, rms: 0.01 }),
            Some(Note::new(PitchClass::A, 4))
        );
    }
}
