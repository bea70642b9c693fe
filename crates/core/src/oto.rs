//! UTAU oto.ini parsing, normalization, and per-recording grouping.
//!
//! Each oto.ini line reads
//! `<wav>=<alias>,<offset>,<consonant>,<cutoff>,<preutterance>,<overlap>`.
//! All values are milliseconds relative to the start of the WAV. The cutoff
//! is stored non-positive in valid voicebanks, putting the segment's right
//! edge at `offset - cutoff`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::error::ConvertError;

/// Breath entries are not singable material.
const BREATH_MARK: &str = "息";
/// The を particle duplicates お in recording reclists.
const PARTICLE_MARK: &str = "を";
/// Prolonged-tail marker inside aliases.
const TAIL_MARK: char = '-';
/// Rest lyric used in scores and rewritten aliases.
pub const REST_LYRIC: &str = "R";

/// One phoneme-instance observation from an oto.ini entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OtoRecord {
    /// Source WAV filename as written in the oto.ini.
    pub recording_id: String,
    pub alias: String,
    /// Left blank: segment start relative to the WAV start.
    pub left_offset_ms: f64,
    /// Fixed-region boundary. Parsed and carried, unused by the conversion.
    pub consonant_ms: f64,
    /// Right blank, non-positive in valid voicebanks.
    pub cutoff_ms: f64,
    /// Consonant lead before the stable vowel point.
    pub preutterance_ms: f64,
    /// Crossfade region; consonant onset for two-phoneme aliases.
    pub overlap_ms: f64,
}

impl OtoRecord {
    /// Onset of the stable vowel part, relative to the WAV start.
    pub fn onset_ms(&self) -> f64 {
        self.left_offset_ms + self.preutterance_ms
    }

    /// Recorded right edge of the segment, relative to the WAV start.
    pub fn right_edge_ms(&self) -> f64 {
        self.left_offset_ms - self.cutoff_ms
    }
}

/// An ordered oto.ini table.
#[derive(Debug, Clone, Default)]
pub struct OtoIni {
    pub records: Vec<OtoRecord>,
}

impl OtoIni {
    /// Load an oto.ini file. The file must be UTF-8; convert legacy
    /// Shift-JIS voicebanks before running.
    pub fn load(path: &Path) -> Result<OtoIni> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read oto.ini: {}", path.display()))?;
        let mut records = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let record = parse_line(line).map_err(|reason| ConvertError::BadOtoLine {
                path: path.to_path_buf(),
                line: idx + 1,
                reason,
            })?;
            records.push(record);
        }
        Ok(OtoIni { records })
    }

    /// Reject the table if any entry carries a positive cutoff.
    ///
    /// Checked against the raw table before any output is written, so a
    /// single broken entry aborts the run instead of producing a database
    /// with silently wrong right edges.
    pub fn check_cutoffs(&self) -> Result<(), ConvertError> {
        for rec in &self.records {
            if rec.cutoff_ms > 0.0 {
                return Err(ConvertError::PositiveCutoff {
                    recording: rec.recording_id.clone(),
                    alias: rec.alias.clone(),
                    cutoff: rec.cutoff_ms,
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_line(line: &str) -> Result<OtoRecord, String> {
    let (filename, params) = line.split_once('=').ok_or_else(|| "missing '='".to_string())?;
    let mut fields = params.split(',');
    let alias = fields.next().unwrap_or("").trim().to_string();

    // Numeric fields default to 0 when trailing ones are omitted.
    let mut numbers = [0.0f64; 5];
    for (i, slot) in numbers.iter_mut().enumerate() {
        let Some(text) = fields.next() else { break };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        *slot = text
            .parse()
            .map_err(|_| format!("field {} is not a number: {:?}", i + 2, text))?;
    }
    if fields.next().is_some() {
        return Err("too many fields".to_string());
    }

    let [left_offset_ms, consonant_ms, cutoff_ms, preutterance_ms, overlap_ms] = numbers;
    Ok(OtoRecord {
        recording_id: filename.trim().to_string(),
        alias,
        left_offset_ms,
        consonant_ms,
        cutoff_ms,
        preutterance_ms,
        overlap_ms,
    })
}

/// Filter and rewrite aliases for conversion, returning a new table.
///
/// Single-token aliases (no whitespace) carry no singable context and are
/// dropped, as are breath and を entries. Surviving aliases keep only their
/// final token, with the prolonged-tail marker rewritten to the rest lyric.
/// The result is sorted by `(recording, left offset)` so grouping walks each
/// recording in temporal order.
pub fn normalize(table: &OtoIni) -> OtoIni {
    let mut records: Vec<OtoRecord> = table
        .records
        .iter()
        .filter(|rec| {
            rec.alias.contains(char::is_whitespace)
                && !rec.alias.contains(BREATH_MARK)
                && !rec.alias.contains(PARTICLE_MARK)
        })
        .cloned()
        .map(|mut rec| {
            let tail = rec
                .alias
                .split_whitespace()
                .last()
                .unwrap_or_default()
                .replace(TAIL_MARK, REST_LYRIC);
            rec.alias = tail;
            rec
        })
        .collect();
    records.sort_by(|a, b| {
        a.recording_id
            .cmp(&b.recording_id)
            .then(a.left_offset_ms.total_cmp(&b.left_offset_ms))
    });
    OtoIni { records }
}

/// Records for a single recording, ascending by left offset.
#[derive(Debug, Clone)]
pub struct RecordGroup {
    pub recording_id: String,
    pub records: Vec<OtoRecord>,
}

impl RecordGroup {
    /// Recording name without the `.wav` extension, used as the output stem.
    pub fn name(&self) -> &str {
        self.recording_id
            .strip_suffix(".wav")
            .unwrap_or(&self.recording_id)
    }
}

/// Split a normalized table into per-recording groups, preserving order.
pub fn group(table: &OtoIni) -> Vec<RecordGroup> {
    let mut groups: Vec<RecordGroup> = Vec::new();
    for rec in &table.records {
        match groups.last_mut() {
            Some(g) if g.recording_id == rec.recording_id => g.records.push(rec.clone()),
            _ => groups.push(RecordGroup {
                recording_id: rec.recording_id.clone(),
                records: vec![rec.clone()],
            }),
        }
    }
    groups
}
