//! # Practice Configuration Module
//!
//! Session settings loaded from a JSON file. Every field has a default, so
//! a file only needs the settings it changes:
//!
//! ```json
//! { "fret_count": 24, "lingering_window_ms": 1500, "label_mode": "interval" }
//! ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::fretboard::{FretCount, Fretboard};
use crate::overlay::{NoteLabelMode, OverlayOptions};
use crate::pitch::{DEFAULT_SENSITIVITY, DetectionGate};
use crate::presence::{
    DEFAULT_LINGERING_WINDOW_MS, DEFAULT_SWEEP_INTERVAL_MS, MAX_LINGERING_WINDOW_MS,
    MIN_LINGERING_WINDOW_MS,
};
use crate::tuning::Tuning;

pub const MIN_BPM: u32 = 60;
pub const MAX_BPM: u32 = 200;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for one practice session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeConfig {
    /// Tempo for the external transport. Nothing in this crate schedules
    /// playback; the value is validated and carried for whoever does.
    pub bpm: u32,
    /// (beats per measure, beat unit), also carried for the transport.
    pub time_signature: (u8, u8),
    pub fret_count: FretCount,
    pub lingering_window_ms: u64,
    pub sweep_interval_ms: u64,
    pub label_mode: NoteLabelMode,
    pub show_safe_notes: bool,
    /// RMS level a frame must exceed to count as a detection.
    pub sensitivity: f64,
    pub tuning: Tuning,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            bpm: 120,
            time_signature: (4, 4),
            fret_count: FretCount::default(),
            lingering_window_ms: DEFAULT_LINGERING_WINDOW_MS,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
            label_mode: NoteLabelMode::default(),
            show_safe_notes: true,
            sensitivity: DEFAULT_SENSITIVITY,
            tuning: Tuning::standard(),
        }
    }
}

impl PracticeConfig {
    /// Loads and validates a config file.
    ///
    /// # Returns
    /// * `Err(ConfigError)` - File unreadable, malformed JSON, or a value
    ///   out of bounds
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut data = String::new();
        file.read_to_string(&mut data)?;
        let config = Self::from_json_str(&data)?;
        info!(path = %path.display(), "loaded practice config");
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PracticeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every bounded field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BPM..=MAX_BPM).contains(&self.bpm) {
            return Err(invalid(format!("bpm {} not in {}..={}", self.bpm, MIN_BPM, MAX_BPM)));
        }
        let (beats, unit) = self.time_signature;
        if !(1..=16).contains(&beats) || ![2, 4, 8, 16].contains(&unit) {
            return Err(invalid(format!("time signature {}/{} not supported", beats, unit)));
        }
        let window = self.lingering_window_ms;
        if !(MIN_LINGERING_WINDOW_MS..=MAX_LINGERING_WINDOW_MS).contains(&window) {
            return Err(invalid(format!(
                "lingering_window_ms {} not in {}..={}",
                window, MIN_LINGERING_WINDOW_MS, MAX_LINGERING_WINDOW_MS
            )));
        }
        if self.sweep_interval_ms == 0 {
            return Err(invalid("sweep_interval_ms must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.sensitivity) {
            return Err(invalid(format!("sensitivity {} not in 0.0..=1.0", self.sensitivity)));
        }
        Ok(())
    }

    pub fn fretboard(&self) -> Fretboard {
        Fretboard::new(self.tuning.clone(), self.fret_count)
    }

    pub fn detection_gate(&self) -> DetectionGate {
        DetectionGate::with_sensitivity(self.sensitivity)
    }

    pub fn overlay_options(&self) -> OverlayOptions {
        OverlayOptions {
            show_safe_notes: self.show_safe_notes,
            label_mode: self.label_mode,
        }
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_session_defaults() {
        let config = PracticeConfig::default();
        assert_eq!(config.bpm, 120);
        assert_eq!(config.fret_count.frets(), 17);
        assert_eq!(config.lingering_window_ms, 2000);
        assert_eq!(config.label_mode, NoteLabelMode::Combined);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PracticeConfig::from_json_str(
            r#"{
                "fret_count": 24,
                "label_mode": "interval",
                "tuning": ["D2", "A2", "D3", "G3", "B3", "E4"]
            }"#,
        )
        .unwrap();
        assert_eq!(config.fret_count, FretCount::TwentyFour);
        assert_eq!(config.label_mode, NoteLabelMode::Interval);
        assert_eq!(config.tuning, Tuning::drop_d());
        assert_eq!(config.bpm, 120);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(matches!(
            PracticeConfig::from_json_str(r#"{ "lingering_window_ms": 100 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            PracticeConfig::from_json_str(r#"{ "bpm": 300 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            PracticeConfig::from_json_str(r#"{ "fret_count": 20 }"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            PracticeConfig::from_json_str(r#"{ "time_signature": [6, 7] }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_tuning_with_absurd_octave() {
        let result = PracticeConfig::from_json_str(
            r#"{ "tuning": ["E2147483647", "A2", "D3", "G3", "B3", "E4"] }"#,
        );
        assert!(matches!(result, Err(ConfigError::Json(_))));

        let result = PracticeConfig::from_json_str(
            r#"{ "tuning": ["E2", "A2", "D3", "G3", "B3", "E12"] }"#,
        );
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = std::env::temp_dir()
            .join(format!("fretboard-config-{}.json", std::process::id()));
        let mut config = PracticeConfig::default();
        config.show_safe_notes = false;
        let mut file = File::create(&path).unwrap();
        file.write_all(config.to_json_string().unwrap().as_bytes()).unwrap();
        drop(file);

        let loaded = PracticeConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            PracticeConfig::load("/nonexistent/fretboard.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
