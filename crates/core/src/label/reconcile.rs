//! Reconcile each recording's label pair.
//!
//! The score label carries the authoritative full-context symbols, the
//! alignment label the authoritative timing. Reconciliation transplants the
//! symbols onto the alignment label and rounds both to the 5 ms grid, in
//! place, so downstream alignment tooling sees one consistent symbol
//! sequence per recording.

use std::path::Path;

use anyhow::Result;

use crate::error::ConvertError;

use super::{Label, ROUND_UNIT};

/// Copy symbols from `score` onto `align`, segment by segment.
///
/// Correspondence is positional, so differing lengths mean the two labels
/// no longer describe the same phoneme stream and nothing is copied.
pub fn transplant_symbols(
    align: &mut Label,
    score: &Label,
    name: &str,
) -> Result<(), ConvertError> {
    if align.len() != score.len() {
        return Err(ConvertError::SegmentCountMismatch {
            name: name.to_string(),
            align: align.len(),
            score: score.len(),
        });
    }
    for (a, s) in align.segments.iter_mut().zip(&score.segments) {
        a.symbol = s.symbol.clone();
    }
    Ok(())
}

/// Reconcile one recording's label pair on disk.
///
/// Loads both files, transplants score symbols onto the alignment label,
/// rounds both to the 5 ms grid, and overwrites both files. On a count
/// mismatch neither file is touched, leaving the unrounded pair for
/// inspection.
pub fn reconcile_pair(align_path: &Path, score_path: &Path) -> Result<()> {
    let mut align = Label::load(align_path)?;
    let mut score = Label::load(score_path)?;
    let name = align_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    transplant_symbols(&mut align, &score, &name)?;
    align.round(ROUND_UNIT);
    score.round(ROUND_UNIT);
    align.write(align_path)?;
    score.write(score_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::PhonemeSegment;

    fn make_label(rows: &[(i64, i64, &str)]) -> Label {
        Label {
            segments: rows
                .iter()
                .map(|(start, end, symbol)| PhonemeSegment {
                    start: *start,
                    end: *end,
                    symbol: symbol.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_transplant_keeps_timing() {
        let mut align = make_label(&[(0, 1_200_000, "pau"), (1_200_000, 2_000_000, "a")]);
        let score = make_label(&[(0, 1_250_000, "x-pau+a"), (1_250_000, 2_500_000, "pau-a+x")]);
        transplant_symbols(&mut align, &score, "_test").unwrap();

        assert_eq!(align.segments[0].symbol, "x-pau+a");
        assert_eq!(align.segments[1].symbol, "pau-a+x");
        assert_eq!(align.segments[0].end, 1_200_000);
        assert_eq!(align.segments[1].end, 2_000_000);
    }

    #[test]
    fn test_count_mismatch_is_rejected() {
        let mut align = make_label(&[(0, 1, "pau"), (1, 2, "a"), (2, 3, "pau")]);
        let score = make_label(&[(0, 1, "pau"), (1, 2, "a")]);
        let err = transplant_symbols(&mut align, &score, "_test").unwrap_err();
        assert!(matches!(
            err,
            ConvertError::SegmentCountMismatch { align: 3, score: 2, .. }
        ));
        // Nothing was copied.
        assert_eq!(align.segments[0].symbol, "pau");
    }

    #[test]
    fn test_reconcile_pair_rounds_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let align_path = dir.path().join("a_align.lab");
        let score_path = dir.path().join("a_score.lab");
        make_label(&[(0, 1_203_000, "pau"), (1_203_000, 2_000_000, "a")])
            .write(&align_path)
            .unwrap();
        make_label(&[(0, 1_250_000, "ctx-pau"), (1_250_000, 2_080_000, "ctx-a")])
            .write(&score_path)
            .unwrap();

        reconcile_pair(&align_path, &score_path).unwrap();

        let align = Label::load(&align_path).unwrap();
        assert_eq!(align.segments[0].end, 1_200_000);
        assert_eq!(align.segments[0].symbol, "ctx-pau");
        assert_eq!(align.segments[1].start, 1_200_000);
        let score = Label::load(&score_path).unwrap();
        assert_eq!(score.segments[1].end, 2_100_000);
        assert_eq!(score.segments[1].symbol, "ctx-a");
    }

    #[test]
    fn test_mismatched_pair_left_untouched_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let align_path = dir.path().join("b_align.lab");
        let score_path = dir.path().join("b_score.lab");
        make_label(&[(0, 1_203_000, "pau"), (1_203_000, 2_000_000, "a")])
            .write(&align_path)
            .unwrap();
        make_label(&[(0, 2_080_000, "ctx-pau")]).write(&score_path).unwrap();

        let err = reconcile_pair(&align_path, &score_path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::SegmentCountMismatch { .. })
        ));
        // Files keep their unrounded contents.
        let align = Label::load(&align_path).unwrap();
        assert_eq!(align.segments[0].end, 1_203_000);
        assert_eq!(align.segments[0].symbol, "pau");
    }
}
