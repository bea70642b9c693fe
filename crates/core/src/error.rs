//! Failure taxonomy for voicebank conversion.
//!
//! Variants carry enough context to name the offending file, alias, or
//! recording in a log line. Only `PositiveCutoff`, the parse variants, and
//! config problems abort a run; everything else is isolated to the single
//! recording that produced it.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// A positive right blank anywhere in the source metadata invalidates the
    /// whole voicebank, not just one entry.
    #[error(
        "positive cutoff ({cutoff} ms) on alias \"{alias}\" in {recording}: \
         re-estimate the voicebank timing before converting"
    )]
    PositiveCutoff {
        recording: String,
        alias: String,
        cutoff: f64,
    },

    /// A recording needs at least two usable entries to form a score.
    #[error("recording {recording} has {count} usable record(s), need at least 2")]
    GroupTooShort { recording: String, count: usize },

    /// Alignment and score labels for the same recording disagree in length.
    #[error("label pair {name} differs in length ({align} vs {score} segments)")]
    SegmentCountMismatch {
        name: String,
        align: usize,
        score: usize,
    },

    /// The consonant-vowel split covers one- and two-phoneme aliases only.
    #[error("alias \"{alias}\" maps to {count} phonemes, cannot split")]
    UnsplittableAlias { alias: String, count: usize },

    #[error("{path}:{line}: bad oto.ini entry: {reason}")]
    BadOtoLine {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("{path}:{line}: bad label line: {reason}")]
    BadLabelLine {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("unknown pitch name \"{0}\"")]
    UnknownPitch(String),

    #[error("could not infer a pitch from folder \"{prefix}\", pass one explicitly")]
    PitchInferenceFailed { prefix: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
