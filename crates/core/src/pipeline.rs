//! Batch conversion driver.
//!
//! Turns one voicebank pitch folder into a singing database: per recording
//! a UST score, an alignment label, a score label, and a copied WAV, then a
//! reconciliation pass over every label pair. Failures are isolated to the
//! recording that produced them and collected into a summary written next
//! to the converted data.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::config::ResolvedConfig;
use crate::label::full::build_score_label;
use crate::label::mono::build_alignment_label;
use crate::label::reconcile::reconcile_pair;
use crate::oto::{self, OtoIni, RecordGroup};
use crate::score::{alternate_pitches, build_score, ust};
use crate::table::PhonemeTable;

/// One recording-level failure, with the stage that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct RecordingFailure {
    pub recording: String,
    pub stage: &'static str,
    pub reason: String,
}

/// Outcome counts for one conversion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConvertSummary {
    pub recordings: usize,
    pub converted: usize,
    pub reconciled: usize,
    /// Notes whose length quantized to zero or negative ticks. The outputs
    /// are still written; the count flags a probable tempo mismatch.
    pub degenerate_notes: usize,
    pub failures: Vec<RecordingFailure>,
}

impl ConvertSummary {
    fn fail(&mut self, recording: &str, stage: &'static str, err: &anyhow::Error) {
        self.failures.push(RecordingFailure {
            recording: recording.to_string(),
            stage,
            reason: format!("{err:#}"),
        });
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write summary: {}", path.display()))
    }
}

struct OutputDirs {
    ust: PathBuf,
    align: PathBuf,
    score: PathBuf,
    wav: PathBuf,
}

impl OutputDirs {
    fn create(out_dir: &Path) -> Result<OutputDirs> {
        let dirs = OutputDirs {
            ust: out_dir.join("ust"),
            align: out_dir.join("label_phone_align"),
            score: out_dir.join("label_phone_score"),
            wav: out_dir.join("wav"),
        };
        for dir in [&dirs.ust, &dirs.align, &dirs.score, &dirs.wav] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(dirs)
    }
}

/// Run the full conversion for one voicebank pitch folder.
///
/// The raw table's cutoffs are checked before anything is written, so a
/// broken voicebank aborts with an empty output tree.
pub fn run(config: &ResolvedConfig) -> Result<ConvertSummary> {
    let raw = OtoIni::load(&config.otoini_path)?;
    raw.check_cutoffs()?;
    let table = PhonemeTable::load(&config.table_path)?;

    let normalized = oto::normalize(&raw);
    let groups = oto::group(&normalized);
    log::info!(
        "Normalized {} of {} oto records into {} recordings",
        normalized.len(),
        raw.len(),
        groups.len()
    );

    let dirs = OutputDirs::create(&config.out_dir)?;
    let mut summary = ConvertSummary {
        recordings: groups.len(),
        ..Default::default()
    };
    let mut converted: Vec<String> = Vec::new();

    let bar = progress_bar(groups.len() as u64, "convert");
    for group in &groups {
        let name = format!("{}{}", config.prefix, group.name());
        match convert_group(group, &table, config, &dirs, &name) {
            Ok(degenerate) => {
                summary.converted += 1;
                summary.degenerate_notes += degenerate;
                converted.push(name);
            }
            Err(err) => {
                log::warn!("Skipping {}: {:#}", group.recording_id, err);
                summary.fail(&group.recording_id, "convert", &err);
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    let bar = progress_bar(converted.len() as u64, "reconcile");
    for name in &converted {
        let align_path = dirs.align.join(format!("{name}.lab"));
        let score_path = dirs.score.join(format!("{name}.lab"));
        match reconcile_pair(&align_path, &score_path) {
            Ok(()) => summary.reconciled += 1,
            Err(err) => {
                log::warn!("Leaving {name} unrounded: {err:#}");
                summary.fail(name, "reconcile", &err);
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    log::info!(
        "Converted {}/{} recordings, reconciled {}",
        summary.converted,
        summary.recordings,
        summary.reconciled
    );
    summary.write_json(&config.out_dir.join("summary.json"))?;
    Ok(summary)
}

/// Convert one recording; returns its degenerate-note count.
fn convert_group(
    group: &RecordGroup,
    table: &PhonemeTable,
    config: &ResolvedConfig,
    dirs: &OutputDirs,
    name: &str,
) -> Result<usize> {
    let mut score = build_score(group, config.note_num, config.tempo)?;
    if config.alternating_pitch {
        alternate_pitches(&mut score);
    }
    let degenerate = score.degenerate_notes();
    for idx in &degenerate {
        log::warn!(
            "{name}: note {idx} quantized to {} ticks",
            score.notes[*idx].length_ticks
        );
    }

    let align_label = build_alignment_label(group, table)?;
    let score_label = build_score_label(&score, table);

    ust::write_ust(&dirs.ust.join(format!("{name}.ust")), &score, name)?;
    align_label.write(&dirs.align.join(format!("{name}.lab")))?;
    score_label.write(&dirs.score.join(format!("{name}.lab")))?;

    // Copy the recording only after every text output wrote cleanly.
    let wav_src = config.voicebank_dir.join(&group.recording_id);
    let wav_dst = dirs.wav.join(format!("{name}.wav"));
    std::fs::copy(&wav_src, &wav_dst)
        .with_context(|| format!("Failed to copy {}", wav_src.display()))?;

    Ok(degenerate.len())
}

fn progress_bar(len: u64, prefix: &str) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{prefix:>10} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    bar.set_prefix(prefix.to_string());
    bar
}
