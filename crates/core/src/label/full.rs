//! Score labels: full-context phoneme sequences timed from the note grid.
//!
//! The score label mirrors the alignment label phoneme for phoneme, but its
//! timing comes from the quantized score and each symbol is a full-context
//! string in a fixed template:
//!
//! ```text
//! p1^p2-p3+p4=p5/A:pitch_len/E:pitch_len@pos|count/F:pitch_len
//! ```
//!
//! The quinphone part names the two phonemes either side of the current
//! one. `/A:` and `/F:` describe the previous and next note, `/E:` the
//! current one: pitch name (`xx` for rests), length in 32nd steps, and for
//! `/E:` the phoneme's 1-based position and the note's phoneme count.
//! Fields outside a group's scope hold `xx`.

use crate::oto::REST_LYRIC;
use crate::pitch;
use crate::score::{ticks_to_100ns, Score, STEP_TICKS};
use crate::table::PhonemeTable;

use super::{Label, PhonemeSegment, PAUSE};

/// Placeholder for out-of-scope context fields.
const PLACEHOLDER: &str = "xx";

struct NoteInfo {
    /// Sharp-spelled pitch name; `None` for rests and out-of-range pitches.
    pitch_name: Option<String>,
    /// Length in 32nd steps.
    steps: i64,
    phonemes: Vec<String>,
}

/// Project a score into its full-context label.
///
/// Rest notes always carry a single `pau`; sung lyrics map through the
/// table with the identity fallback, so phoneme counts line up with the
/// alignment label built from the same table. Note boundaries are converted
/// from cumulative ticks and each note's span is divided evenly among its
/// phonemes, keeping the label contiguous from zero.
pub fn build_score_label(score: &Score, table: &PhonemeTable) -> Label {
    let notes: Vec<NoteInfo> = score
        .notes
        .iter()
        .map(|note| {
            let rest = note.lyric == REST_LYRIC;
            NoteInfo {
                pitch_name: if rest { None } else { pitch::note_name(note.pitch) },
                steps: note.length_ticks / STEP_TICKS,
                phonemes: if rest {
                    vec![PAUSE.to_string()]
                } else {
                    table.phonemes(&note.lyric)
                },
            }
        })
        .collect();

    // Flat phoneme stream as (note index, phoneme index) pairs.
    let mut flat: Vec<(usize, usize)> = Vec::new();
    for (ni, info) in notes.iter().enumerate() {
        for pi in 0..info.phonemes.len() {
            flat.push((ni, pi));
        }
    }

    // Note boundaries in 100 ns units, from cumulative ticks so consecutive
    // notes share an exact boundary.
    let mut bounds = Vec::with_capacity(score.notes.len() + 1);
    bounds.push(0i64);
    let mut ticks = 0i64;
    for note in &score.notes {
        ticks += note.length_ticks;
        bounds.push(ticks_to_100ns(ticks, score.tempo));
    }

    let mut segments = Vec::with_capacity(flat.len());
    for (j, &(ni, pi)) in flat.iter().enumerate() {
        let count = notes[ni].phonemes.len() as i64;
        let note_start = bounds[ni];
        let note_len = bounds[ni + 1] - bounds[ni];
        segments.push(PhonemeSegment {
            start: note_start + note_len * pi as i64 / count,
            end: note_start + note_len * (pi as i64 + 1) / count,
            symbol: context_symbol(&flat, &notes, j),
        });
    }
    Label { segments }
}

fn phoneme_at<'a>(flat: &[(usize, usize)], notes: &'a [NoteInfo], j: isize) -> &'a str {
    if j < 0 {
        return PLACEHOLDER;
    }
    match flat.get(j as usize) {
        Some(&(ni, pi)) => &notes[ni].phonemes[pi],
        None => PLACEHOLDER,
    }
}

fn note_fields(notes: &[NoteInfo], idx: Option<usize>) -> (String, String) {
    match idx.and_then(|i| notes.get(i)) {
        Some(info) => (
            info.pitch_name.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
            info.steps.to_string(),
        ),
        None => (PLACEHOLDER.to_string(), PLACEHOLDER.to_string()),
    }
}

fn context_symbol(flat: &[(usize, usize)], notes: &[NoteInfo], j: usize) -> String {
    let (ni, pi) = flat[j];
    let j = j as isize;
    let p1 = phoneme_at(flat, notes, j - 2);
    let p2 = phoneme_at(flat, notes, j - 1);
    let p3 = phoneme_at(flat, notes, j);
    let p4 = phoneme_at(flat, notes, j + 1);
    let p5 = phoneme_at(flat, notes, j + 2);

    let (a_pitch, a_len) = note_fields(notes, ni.checked_sub(1));
    let (e_pitch, e_len) = note_fields(notes, Some(ni));
    let (f_pitch, f_len) = note_fields(notes, Some(ni + 1));
    let position = pi + 1;
    let count = notes[ni].phonemes.len();

    format!(
        "{p1}^{p2}-{p3}+{p4}={p5}\
         /A:{a_pitch}_{a_len}\
         /E:{e_pitch}_{e_len}@{position}|{count}\
         /F:{f_pitch}_{f_len}"
    )
}
