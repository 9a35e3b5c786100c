//! Plain-text fretboard drawing.
//!
//! The highest string is drawn on top, as on a tab staff. Roots are shown
//! in brackets and fading detections in parentheses.

use fretboard_core::fretboard::Fretboard;
use fretboard_core::overlay::PositionMarker;
use fretboard_core::presence::PresenceState;
use fretboard_core::tuning::STRING_COUNT;
use std::collections::HashMap;
use std::fmt::Write;

const MIN_CELL_WIDTH: usize = 5;

pub fn render(fretboard: &Fretboard, markers: &[PositionMarker]) -> String {
    let frets = usize::from(fretboard.fret_count().frets());
    let cells: HashMap<(usize, usize), String> = markers
        .iter()
        .map(|m| ((m.position.string_index, usize::from(m.position.fret)), cell_text(m)))
        .collect();
    let width = cells
        .values()
        .map(|text| text.chars().count() + 2)
        .max()
        .unwrap_or(0)
        .max(MIN_CELL_WIDTH);

    let mut out = String::new();
    let _ = write!(out, "{:4}", "");
    for fret in 0..=frets {
        let _ = write!(out, "{:^width$}", fret);
    }
    out.push('\n');

    for string_index in (0..STRING_COUNT).rev() {
        let open = fretboard.tuning().strings()[string_index];
        let _ = write!(out, "{:<3}|", open.to_string());
        for fret in 0..=frets {
            match cells.get(&(string_index, fret)) {
                Some(text) => {
                    let _ = write!(out, "{:-^width$}", text);
                }
                None => out.push_str(&"-".repeat(width)),
            }
            out.push('|');
        }
        out.push('\n');
    }
    out
}

fn cell_text(marker: &PositionMarker) -> String {
    match marker.presence.map(|p| p.state) {
        Some(PresenceState::Fading) => format!("({})", marker.label),
        _ if marker.is_root => format!("[{}]", marker.label),
        _ => marker.label.clone(),
    }
}
