//! End-to-end scenarios across the engine.

use fretboard_core::chord::{Chord, ChordQuality, chord_tones};
use fretboard_core::detection::{self, Offer};
use fretboard_core::note::{Note, PitchClass};
use fretboard_core::pitch::frequency_to_note;
use fretboard_core::presence::{DetectedNoteEvent, NotePresenceTracker, PresenceState};
use fretboard_core::progression::{ProgressionTemplate, diatonic_chords, twelve_bar_blues};

#[test]
fn a440_is_a4() {
    assert_eq!(frequency_to_note(440.0).unwrap(), Note::new(PitchClass::A, 4));
}

#[test]
fn c_major_seventh_tones() {
    let tones = chord_tones(PitchClass::C, ChordQuality::MajorSeventh);
    let pitch_classes: Vec<PitchClass> = tones.iter().map(|n| n.pitch_class).collect();
    assert_eq!(
        pitch_classes,
        [PitchClass::C, PitchClass::E, PitchClass::G, PitchClass::B]
    );
    assert!(tones.iter().all(|n| n.octave == 3));
}

#[test]
fn twelve_bar_blues_in_c() {
    let chords = twelve_bar_blues(PitchClass::C);
    let roots: Vec<String> = chords.iter().map(|c| c.root().to_string()).collect();
    assert_eq!(roots, ["C", "C", "C", "C", "F", "F", "C", "C", "G", "F", "C", "G"]);
    assert!(chords.iter().all(|c| c.quality() == ChordQuality::DominantSeventh));
}

#[test]
fn presence_fades_and_is_pruned() {
    let c4 = Note::new(PitchClass::C, 4);
    let mut tracker = NotePresenceTracker::new(2000).unwrap();
    tracker.observe(DetectedNoteEvent::heard(c4, 0));

    // Sweeps every 50 ms; the detection stops after the first one.
    let mut now = 0;
    while now < 1000 {
        now += 50;
        tracker.sweep(now);
    }
    let presence = tracker.presence_of(c4, 1000);
    assert_eq!(presence.state, PresenceState::Fading);
    assert!((presence.opacity - 0.5).abs() < 0.01);

    while now < 2000 {
        now += 50;
        tracker.sweep(now);
    }
    assert!(tracker.is_empty());
    assert_eq!(tracker.presence_of(c4, 2000).state, PresenceState::Silent);
}

#[test]
fn diatonic_chords_in_c() {
    let chords = diatonic_chords(PitchClass::C);
    let roots: Vec<PitchClass> = chords.iter().map(|d| d.chord.root()).collect();
    let qualities: Vec<ChordQuality> = chords.iter().map(|d| d.chord.quality()).collect();
    assert_eq!(
        roots,
        [
            PitchClass::C,
            PitchClass::D,
            PitchClass::E,
            PitchClass::F,
            PitchClass::G,
            PitchClass::A,
            PitchClass::B
        ]
    );
    assert_eq!(
        qualities,
        [
            ChordQuality::MajorSeventh,
            ChordQuality::MinorSeventh,
            ChordQuality::MinorSeventh,
            ChordQuality::MajorSeventh,
            ChordQuality::DominantSeventh,
            ChordQuality::MinorSeventh,
            ChordQuality::MinorSevenFlatFive
        ]
    );
}

#[test]
fn generated_progressions_use_chord_tone_generator() {
    for template in [
        ProgressionTemplate::Diatonic,
        ProgressionTemplate::TwelveBarBlues,
        ProgressionTemplate::TwoFiveOne,
    ] {
        for chord in template.generate(PitchClass::FSharp) {
            assert_eq!(chord, Chord::new(chord.root(), chord.quality()));
        }
    }
}

#[test]
fn estimator_thread_feeds_tracker_through_channel() {
    let (tx, mut rx) = detection::channel();
    let producer = std::thread::spawn(move || {
        let note = frequency_to_note(196.0).unwrap();
        tx.offer(DetectedNoteEvent::heard(note, 10))
    });
    assert_eq!(producer.join().unwrap(), Offer::Delivered);

    let mut tracker = NotePresenceTracker::default();
    assert_eq!(rx.drain_into(&mut tracker), 1);
    assert_eq!(tracker.current(), Some(Note::new(PitchClass::G, 3)));
    assert!(rx.is_closed());
}
