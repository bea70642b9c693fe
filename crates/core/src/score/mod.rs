//! Quantized note scores.
//!
//! A score is the note-level view of one recording: a leading rest, one
//! note per sung segment, and a trailing rest, all on a 32nd-note grid at a
//! single tempo.

pub mod builder;
pub mod ust;

pub use builder::{alternate_pitches, build_score};

/// Ticks per beat in scores.
pub const BEAT_TICKS: i64 = 480;
/// Quantization step, a 32nd note.
pub const STEP_TICKS: i64 = BEAT_TICKS / 8;

/// A single score note.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub lyric: String,
    /// Note number, C4 = 60.
    pub pitch: i32,
    /// Beats per minute.
    pub tempo: f64,
    /// Length in ticks, always a multiple of [`STEP_TICKS`].
    pub length_ticks: i64,
}

/// An ordered note sequence for one recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub notes: Vec<Note>,
    pub tempo: f64,
}

impl Score {
    /// Indices of notes whose length quantized to zero or negative ticks.
    ///
    /// Such notes come from segments shorter than half a quantization step
    /// and usually mean the recording tempo was set wrong.
    pub fn degenerate_notes(&self) -> Vec<usize> {
        self.notes
            .iter()
            .enumerate()
            .filter(|(_, note)| note.length_ticks <= 0)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn total_ticks(&self) -> i64 {
        self.notes.iter().map(|note| note.length_ticks).sum()
    }
}

/// Quantize a millisecond duration to whole 32nd-note ticks.
///
/// `tempo / 7500` is 32nd-note steps per millisecond (60000 ms per minute
/// over 8 steps per beat); rounding happens at step granularity so every
/// length lands on the grid.
pub fn quantize_ms(duration_ms: f64, tempo: f64) -> i64 {
    (duration_ms * tempo / 7500.0).round() as i64 * STEP_TICKS
}

/// Convert a tick count to 100 ns units at the given tempo.
pub fn ticks_to_100ns(ticks: i64, tempo: f64) -> i64 {
    (ticks as f64 * 600_000_000.0 / (tempo * BEAT_TICKS as f64)).round() as i64
}
