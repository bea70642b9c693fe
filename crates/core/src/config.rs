//! Conversion settings, validated up front.
//!
//! Everything a run needs is collected into [`ConvertConfig`] and checked
//! once by [`ConvertConfig::validate`], which resolves paths and the pitch
//! lookup into a [`ResolvedConfig`] the pipeline consumes. Nothing prompts
//! or guesses at conversion time.

use std::path::{Path, PathBuf};

use crate::error::ConvertError;
use crate::pitch;

/// User-facing settings for one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// oto.ini path, or the voicebank pitch folder containing one.
    pub otoini_path: PathBuf,
    /// Alias-to-phoneme table path.
    pub table_path: PathBuf,
    /// Database output root.
    pub out_dir: PathBuf,
    /// Recording tempo in BPM. Required; there is no sensible default.
    pub tempo: f64,
    /// Recording pitch name like `C4`. Inferred from the voicebank folder
    /// name when absent.
    pub pitch: Option<String>,
    /// Alternating-pitch recording style.
    pub alternating_pitch: bool,
}

/// A validated configuration with every lookup resolved.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub otoini_path: PathBuf,
    /// Folder holding the oto.ini and its WAV files.
    pub voicebank_dir: PathBuf,
    /// Output filename prefix, the voicebank folder's name.
    pub prefix: String,
    pub table_path: PathBuf,
    pub out_dir: PathBuf,
    pub tempo: f64,
    /// Note number resolved from the pitch name, C4 = 60.
    pub note_num: i32,
    pub alternating_pitch: bool,
}

impl ConvertConfig {
    /// Check every setting and resolve lookups.
    ///
    /// A directory for `otoini_path` means `<dir>/oto.ini`. A missing pitch
    /// falls back to inference from the voicebank folder name; failure
    /// there is an error rather than a prompt.
    pub fn validate(&self) -> Result<ResolvedConfig, ConvertError> {
        if !self.tempo.is_finite() || self.tempo <= 0.0 {
            return Err(ConvertError::InvalidConfig(format!(
                "tempo must be a positive BPM value, got {}",
                self.tempo
            )));
        }

        let otoini_path = if self.otoini_path.is_dir() {
            self.otoini_path.join("oto.ini")
        } else {
            self.otoini_path.clone()
        };
        if !otoini_path.is_file() {
            return Err(ConvertError::InvalidConfig(format!(
                "oto.ini not found at {}",
                otoini_path.display()
            )));
        }
        if !self.table_path.is_file() {
            return Err(ConvertError::InvalidConfig(format!(
                "phoneme table not found at {}",
                self.table_path.display()
            )));
        }

        let voicebank_dir = otoini_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let prefix = voicebank_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let pitch_name = match &self.pitch {
            Some(name) => name.clone(),
            None => pitch::guess_from_prefix(&prefix).ok_or_else(|| {
                ConvertError::PitchInferenceFailed {
                    prefix: prefix.clone(),
                }
            })?,
        };
        let note_num = pitch::note_number(&pitch_name)?;
        log::debug!("resolved pitch {pitch_name} (note {note_num}) for folder {prefix}");

        Ok(ResolvedConfig {
            otoini_path,
            voicebank_dir,
            prefix,
            table_path: self.table_path.clone(),
            out_dir: self.out_dir.clone(),
            tempo: self.tempo,
            note_num,
            alternating_pitch: self.alternating_pitch,
        })
    }
}
