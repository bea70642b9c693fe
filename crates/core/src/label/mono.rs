//! Alignment labels timed from recorded oto values.

use crate::error::ConvertError;
use crate::oto::RecordGroup;
use crate::table::PhonemeTable;

use super::{Label, PhonemeSegment, PAUSE, UNITS_PER_MS};

fn units(ms: f64) -> i64 {
    (ms * UNITS_PER_MS).round() as i64
}

/// Build the alignment label for one record group.
///
/// Each alias maps through the table and splits on the romaji
/// consonant-vowel convention: a lone phoneme starts at the stable onset,
/// while a consonant-vowel pair starts at the overlap point and the stable
/// onset respectively. Ends chain to the next start, the final phoneme ends
/// at the recorded right edge, and a `pau` covering the leading silence is
/// prepended.
pub fn build_alignment_label(
    group: &RecordGroup,
    table: &PhonemeTable,
) -> Result<Label, ConvertError> {
    if group.records.len() < 2 {
        return Err(ConvertError::GroupTooShort {
            recording: group.recording_id.clone(),
            count: group.records.len(),
        });
    }

    let mut segments: Vec<PhonemeSegment> = Vec::new();
    for rec in &group.records {
        let phones = table.phonemes(&rec.alias);
        match phones.as_slice() {
            [vowel] => segments.push(PhonemeSegment {
                start: units(rec.onset_ms()),
                end: 0,
                symbol: vowel.clone(),
            }),
            [consonant, vowel] => {
                segments.push(PhonemeSegment {
                    start: units(rec.left_offset_ms + rec.overlap_ms),
                    end: 0,
                    symbol: consonant.clone(),
                });
                segments.push(PhonemeSegment {
                    start: units(rec.onset_ms()),
                    end: 0,
                    symbol: vowel.clone(),
                });
            }
            _ => {
                return Err(ConvertError::UnsplittableAlias {
                    alias: rec.alias.clone(),
                    count: phones.len(),
                })
            }
        }
    }

    for i in 0..segments.len() - 1 {
        segments[i].end = segments[i + 1].start;
    }
    let last_rec = &group.records[group.records.len() - 1];
    if let Some(seg) = segments.last_mut() {
        seg.end = units(last_rec.right_edge_ms());
    }

    let first_start = segments[0].start;
    segments.insert(
        0,
        PhonemeSegment {
            start: 0,
            end: first_start,
            symbol: PAUSE.to_string(),
        },
    );
    Ok(Label { segments })
}
