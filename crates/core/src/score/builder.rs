//! Build quantized scores from per-recording oto groups.

use crate::error::ConvertError;
use crate::oto::{RecordGroup, REST_LYRIC};

use super::{quantize_ms, Note, Score, BEAT_TICKS};

/// Map a record group to its quantized score.
///
/// The group's final record is the rest-like tail, so its note doubles as
/// the trailing rest. Interior notes sit on a uniform one-beat grid; only
/// the three boundary lengths are measured from the recording:
///
/// * the leading rest runs to the first stable onset,
/// * the last sung note gets the distance between the final two onsets,
/// * the tail gets the stretch from its onset to the recorded right edge.
pub fn build_score(group: &RecordGroup, pitch: i32, tempo: f64) -> Result<Score, ConvertError> {
    let records = &group.records;
    if records.len() < 2 {
        return Err(ConvertError::GroupTooShort {
            recording: group.recording_id.clone(),
            count: records.len(),
        });
    }

    let mut notes = Vec::with_capacity(records.len() + 1);
    notes.push(Note {
        lyric: REST_LYRIC.to_string(),
        pitch,
        tempo,
        length_ticks: quantize_ms(records[0].onset_ms(), tempo),
    });
    for rec in records {
        notes.push(Note {
            lyric: rec.alias.clone(),
            pitch,
            tempo,
            length_ticks: BEAT_TICKS,
        });
    }

    let last = &records[records.len() - 1];
    let prev = &records[records.len() - 2];
    let n = notes.len();
    notes[n - 2].length_ticks = quantize_ms(last.onset_ms() - prev.onset_ms(), tempo);
    notes[n - 1].length_ticks = quantize_ms(-last.cutoff_ms - last.preutterance_ms, tempo);

    Ok(Score { notes, tempo })
}

/// Alternate interior note pitches for alternating-pitch recordings.
///
/// Odd interior positions drop a semitone and even positions rise one, so
/// four interior notes at pitch P become P-1, P+1, P-1, P+1. The two rests
/// snap to their sung neighbors. Parity is positional: applying this twice
/// alternates around the already shifted pitches rather than undoing them.
pub fn alternate_pitches(score: &mut Score) {
    let n = score.notes.len();
    if n < 3 {
        return;
    }
    for (pos, note) in score.notes[1..n - 1].iter_mut().enumerate() {
        if (pos + 1) % 2 == 0 {
            note.pitch += 1;
        } else {
            note.pitch -= 1;
        }
    }
    score.notes[0].pitch = score.notes[1].pitch;
    score.notes[n - 1].pitch = score.notes[n - 2].pitch;
}
