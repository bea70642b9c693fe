//! Phoneme labels.
//!
//! A label is an ordered, contiguous sequence of phoneme segments timed in
//! 100 ns units, stored one `<start> <end> <symbol>` triple per line. Two
//! labels exist per recording: the alignment label timed from the recorded
//! oto values and the score label timed from the quantized note grid.

pub mod full;
pub mod mono;
pub mod reconcile;

use std::path::Path;

use anyhow::{Context, Result};

use crate::error::ConvertError;

/// 100 ns units per millisecond.
pub const UNITS_PER_MS: f64 = 10_000.0;
/// 5 ms grid used when rounding label boundaries.
pub const ROUND_UNIT: i64 = 50_000;
/// Silence symbol.
pub const PAUSE: &str = "pau";

/// One phoneme with start and end in 100 ns units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonemeSegment {
    pub start: i64,
    pub end: i64,
    pub symbol: String,
}

/// An ordered phoneme sequence for one recording.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    pub segments: Vec<PhonemeSegment>,
}

impl Label {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Round every boundary to the nearest multiple of `unit`, half away
    /// from zero. Idempotent on already aligned boundaries.
    pub fn round(&mut self, unit: i64) {
        for seg in &mut self.segments {
            seg.start = round_to(seg.start, unit);
            seg.end = round_to(seg.end, unit);
        }
    }

    /// Load a `<start> <end> <symbol>` label file.
    pub fn load(path: &Path) -> Result<Label> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read label: {}", path.display()))?;
        let mut segments = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            segments.push(parse_segment(line).map_err(|reason| ConvertError::BadLabelLine {
                path: path.to_path_buf(),
                line: idx + 1,
                reason,
            })?);
        }
        Ok(Label { segments })
    }

    /// Write the label, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let mut text = self
            .segments
            .iter()
            .map(|seg| format!("{} {} {}", seg.start, seg.end, seg.symbol))
            .collect::<Vec<_>>()
            .join("\n");
        text.push('\n');
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write label: {}", path.display()))
    }
}

fn parse_segment(line: &str) -> Result<PhonemeSegment, String> {
    let mut fields = line.split_whitespace();
    let (Some(start), Some(end), Some(symbol)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err("expected <start> <end> <symbol>".to_string());
    };
    if fields.next().is_some() {
        return Err("trailing fields after the symbol".to_string());
    }
    let start: i64 = start
        .parse()
        .map_err(|_| format!("start is not an integer: {start:?}"))?;
    let end: i64 = end
        .parse()
        .map_err(|_| format!("end is not an integer: {end:?}"))?;
    Ok(PhonemeSegment {
        start,
        end,
        symbol: symbol.to_string(),
    })
}

/// Round to the nearest multiple of `unit`, half away from zero.
fn round_to(value: i64, unit: i64) -> i64 {
    if value >= 0 {
        (value + unit / 2) / unit * unit
    } else {
        -((-value + unit / 2) / unit * unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: i64, end: i64, symbol: &str) -> PhonemeSegment {
        PhonemeSegment {
            start,
            end,
            symbol: symbol.to_string(),
        }
    }

    #[test]
    fn test_round_to_half_up() {
        assert_eq!(round_to(1_000_500, ROUND_UNIT), 1_000_000);
        assert_eq!(round_to(1_025_000, ROUND_UNIT), 1_050_000);
        assert_eq!(round_to(1_074_999, ROUND_UNIT), 1_050_000);
        assert_eq!(round_to(0, ROUND_UNIT), 0);
    }

    #[test]
    fn test_round_is_idempotent() {
        for value in [0, 49_999, 75_000, 123_456_789] {
            let once = round_to(value, ROUND_UNIT);
            assert_eq!(once % ROUND_UNIT, 0);
            assert_eq!(round_to(once, ROUND_UNIT), once);
        }
    }

    #[test]
    fn test_label_round() {
        let mut label = Label {
            segments: vec![seg(0, 1_024_999, "pau"), seg(1_024_999, 2_000_000, "a")],
        };
        label.round(ROUND_UNIT);
        assert_eq!(label.segments[0].end, 1_000_000);
        assert_eq!(label.segments[1].start, 1_000_000);
        assert_eq!(label.segments[1].end, 2_000_000);
    }

    #[test]
    fn test_parse_segment() {
        let parsed = parse_segment("0 1200000 pau").unwrap();
        assert_eq!(parsed, seg(0, 1_200_000, "pau"));
        assert!(parse_segment("0 pau").is_err());
        assert!(parse_segment("0 abc pau").is_err());
        assert!(parse_segment("0 1 pau extra").is_err());
    }

    #[test]
    fn test_write_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.lab");
        let label = Label {
            segments: vec![seg(0, 1_200_000, "pau"), seg(1_200_000, 2_000_000, "a")],
        };
        label.write(&path).unwrap();
        assert_eq!(Label::load(&path).unwrap(), label);
    }
}
