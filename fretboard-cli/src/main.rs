//! # Fretboard - Guitar Practice Aid
//!
//! Command-line front end for `fretboard-core`.
//!
//! ## Commands
//! - `note`: name the note nearest a frequency and where it sits on the neck
//! - `chord`: list chord tones with their intervals
//! - `progression`: generate a progression in a key
//! - `board`: draw the fretboard with a chord's safe notes
//! - `listen`: follow pitch estimates from stdin and show the fading trail
//!
//! Logs go to stderr; command output goes to stdout.

mod board;
mod listen;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fretboard_core::config::PracticeConfig;
use fretboard_core::interval::interval_label;
use fretboard_core::overlay::NoteLabelMode;
use fretboard_core::pitch::analyze_frequency;
use fretboard_core::progression::{ProgressionTemplate, diatonic_chords};
use fretboard_core::session::PracticeSession;
use fretboard_core::{Chord, ChordQuality, FretCount, PitchClass, TheoryError};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

#[derive(Parser)]
#[command(
    name = "fretboard",
    about = "Chord tones, progressions and live note trails on a guitar fretboard"
)]
#[command(version)]
struct Cli {
    /// Practice config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Name the note nearest a frequency
    Note {
        /// Frequency in Hz
        frequency: f64,
    },

    /// List the tones of a chord
    Chord {
        /// Root pitch class, e.g. C, F# or Bb
        root: PitchClass,

        /// Quality symbol: maj7, min7, 7, m7b5, dim7 (empty for a triad)
        #[arg(default_value = "")]
        quality: String,

        /// Fall back to a major triad instead of failing on an unknown quality
        #[arg(long)]
        lenient: bool,
    },

    /// Generate a progression in a major key
    Progression {
        /// Key, e.g. C or Eb
        key: PitchClass,

        /// diatonic, blues or ii-V-I
        #[arg(default_value = "diatonic")]
        template: ProgressionTemplate,
    },

    /// Draw the fretboard
    Board {
        /// Chord whose tones are marked, e.g. Am7 or F#m7b5
        #[arg(long, value_parser = parse_chord)]
        chord: Option<Chord>,

        /// Number of frets: 12, 17 or 24
        #[arg(long)]
        frets: Option<u8>,

        /// Marker text: interval, note or combined
        #[arg(long)]
        labels: Option<NoteLabelMode>,
    },

    /// Follow "<frequency> [rms]" lines from stdin
    Listen {
        /// Chord to play over
        #[arg(long, value_parser = parse_chord)]
        chord: Option<Chord>,

        /// Delay after each input line, so a recorded file replays at the
        /// estimator's pace (0 reads as fast as lines arrive)
        #[arg(long, default_value_t = listen::DEFAULT_FRAME_MS)]
        frame_ms: u64,

        /// Redraw the board on every change instead of a one-line summary
        #[arg(long)]
        board: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level)?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Note { frequency } => {
            let reading = analyze_frequency(frequency)?;
            println!(
                "{}  {:.2} Hz  {:+.1} cents",
                reading.note, reading.frequency, reading.cents
            );
            let positions = config.fretboard().positions_of(reading.note);
            if positions.is_empty() {
                println!("not on a {}-fret board", config.fret_count.frets());
            }
            for position in positions {
                println!("  string {} fret {}", position.string_index, position.fret);
            }
        }
        Command::Chord { root, quality, lenient } => {
            let quality = if lenient {
                ChordQuality::parse_lenient(&quality)
            } else {
                quality.parse()?
            };
            let chord = Chord::new(root, quality);
            let tones: Vec<String> = chord
                .notes()
                .iter()
                .map(|note| format!("{}({})", note, interval_label(root, note.pitch_class)))
                .collect();
            println!("{}: {}", chord.name(), tones.join(" "));
        }
        Command::Progression { key, template } => {
            print_progression(key, template);
        }
        Command::Board { chord, frets, labels } => {
            let mut config = config;
            if let Some(frets) = frets {
                config.fret_count = FretCount::try_from(frets)?;
            }
            if let Some(labels) = labels {
                config.label_mode = labels;
            }
            let mut session = PracticeSession::new(config)?;
            if let Some(chord) = chord {
                let index = session.add_chord(chord.root(), chord.quality());
                session.set_current_step(index)?;
            }
            print!("{}", board::render(session.fretboard(), &session.overlay(0)));
        }
        Command::Listen { chord, frame_ms, board } => {
            let mut session = PracticeSession::new(config)?;
            if let Some(chord) = chord {
                let index = session.add_chord(chord.root(), chord.quality());
                session.set_current_step(index)?;
            }
            listen::run(session, listen::ListenOptions { frame_ms, board })?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PracticeConfig> {
    match path {
        Some(path) => PracticeConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => {
            debug!("no config file given, using defaults");
            Ok(PracticeConfig::default())
        }
    }
}

fn print_progression(key: PitchClass, template: ProgressionTemplate) {
    info!(%key, %template, "generating progression");
    println!("{} in {} major", template, key);
    match template {
        ProgressionTemplate::Diatonic => {
            for diatonic in diatonic_chords(key) {
                println!("  {:<5} {}", diatonic.degree, diatonic.chord);
            }
        }
        _ => {
            for (bar, chord) in template.generate(key).iter().enumerate() {
                println!("  {:>2}. {:<8} {}", bar + 1, chord.name(), chord.duration().symbol());
            }
        }
    }
}

/// Parses a chord symbol such as "Am7", "Bbmaj7" or "F#m7b5".
fn parse_chord(symbol: &str) -> std::result::Result<Chord, TheoryError> {
    let symbol = symbol.trim();
    let mut split = symbol.chars().next().map_or(0, char::len_utf8);
    if matches!(symbol[split..].chars().next(), Some('#' | 'b')) {
        split += 1;
    }
    let (root, quality) = symbol.split_at(split);
    Ok(Chord::new(root.parse()?, quality.parse()?))
}
