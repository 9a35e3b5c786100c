//! Live mode: pitch estimates arrive on stdin, one per line, and the
//! presence trail is printed whenever it changes.
//!
//! Input lines are `<frequency> [rms]`. A blank line or `-` means the
//! estimator heard nothing. The reader runs on its own thread and hands
//! events over through the single-slot detection channel; the main thread
//! sweeps the tracker on a fixed tick.

use anyhow::{Context, Result, bail};
use crossbeam_channel::tick;
use fretboard_core::detection::{self, DetectionSender, Offer};
use fretboard_core::interval::interval_label;
use fretboard_core::pitch::{DetectionGate, PitchEstimate};
use fretboard_core::presence::{DetectedNoteEvent, NotePresence, PresenceState};
use fretboard_core::session::PracticeSession;
use std::io::BufRead;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::board;

/// RMS assumed when a line carries only a frequency.
const DEFAULT_RMS: f64 = 1.0;

/// Default pause between input lines, roughly one estimator hop.
pub const DEFAULT_FRAME_MS: u64 = 20;

pub struct ListenOptions {
    pub frame_ms: u64,
    pub board: bool,
}

pub fn run(mut session: PracticeSession, options: ListenOptions) -> Result<()> {
    let (sender, mut receiver) = detection::channel();
    let gate = session.config().detection_gate();
    let start = Instant::now();
    let frame_ms = options.frame_ms;

    let reader = thread::Builder::new()
        .name("estimate-reader".to_string())
        .spawn(move || read_estimates(std::io::stdin().lock(), gate, sender, start, frame_ms))
        .context("failed to spawn estimate reader")?;

    let ticker = tick(Duration::from_millis(session.config().sweep_interval_ms));
    let mut last_frame = String::new();

    loop {
        ticker.recv().context("sweep timer stopped")?;
        let now = elapsed_ms(start);
        session.drain_detections(&mut receiver);
        let pruned = session.tick(now);
        if pruned > 0 {
            debug!(pruned, at = now, "pruned expired notes");
        }

        let frame = if options.board {
            board::render(session.fretboard(), &session.overlay(now))
        } else {
            summarize(&session, now)
        };
        if frame != last_frame {
            if options.board {
                println!("{} ms\n{}", now, frame);
            } else {
                println!("{:>7} ms  {}", now, frame);
            }
            last_frame = frame;
        }

        // Let the trail fade out before leaving.
        if receiver.is_closed() && session.tracker().is_empty() {
            break;
        }
    }

    match reader.join() {
        Ok(result) => result?,
        Err(_) => bail!("estimate reader panicked"),
    }
    info!(replaced = receiver.replaced(), "input finished");
    Ok(())
}

fn read_estimates(
    input: impl BufRead,
    gate: DetectionGate,
    sender: DetectionSender,
    start: Instant,
    frame_ms: u64,
) -> Result<()> {
    for (number, line) in input.lines().enumerate() {
        let line = line.context("failed to read stdin")?;
        let event = match parse_estimate(&line) {
            Ok(Some(estimate)) => match gate.gate(estimate) {
                Some(note) => DetectedNoteEvent::heard(note, elapsed_ms(start)),
                None => DetectedNoteEvent::silence(elapsed_ms(start)),
            },
            Ok(None) => DetectedNoteEvent::silence(elapsed_ms(start)),
            Err(err) => {
                warn!(line = number + 1, %err, "skipping malformed estimate");
                continue;
            }
        };
        if sender.offer(event) == Offer::Closed {
            break;
        }
        if frame_ms > 0 {
            thread::sleep(Duration::from_millis(frame_ms));
        }
    }
    Ok(())
}

/// Parses one `<frequency> [rms]` line. `None` means no pitch.
fn parse_estimate(line: &str) -> Result<Option<PitchEstimate>> {
    let mut fields = line.split_whitespace();
    let frequency = match fields.next() {
        None | Some("-") => return Ok(None),
        Some(text) => text
            .parse::<f64>()
            .with_context(|| format!("bad frequency '{}'", text))?,
    };
    let rms = match fields.next() {
        Some(text) => text.parse::<f64>().with_context(|| format!("bad rms '{}'", text))?,
        None => DEFAULT_RMS,
    };
    if fields.next().is_some() {
        bail!("expected at most two fields");
    }
    Ok(Some(PitchEstimate { frequency, rms }))
}

fn summarize(session: &PracticeSession, now_ms: u64) -> String {
    let presences = session.presences(now_ms);
    if presences.is_empty() {
        return "-".to_string();
    }
    presences
        .iter()
        .map(|p| describe(session, p))
        .collect::<Vec<_>>()
        .join("  ")
}

fn describe(session: &PracticeSession, presence: &NotePresence) -> String {
    let mut text = presence.note.to_string();
    if let Some(chord) = session.current_chord() {
        text.push_str(&format!("({})", interval_label(chord.root(), presence.note.pitch_class)));
    }
    match presence.state {
        PresenceState::Active => text.push('*'),
        _ => text.push_str(&format!(" {:.0}%", presence.opacity * 100.0)),
    }
    text
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
