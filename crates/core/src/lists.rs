//! Train/eval/dev split lists over converted recording ids.

use std::path::Path;

use anyhow::{Context, Result};

use crate::error::ConvertError;

/// Recording-id lists for each training split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitLists {
    pub utt: Vec<String>,
    pub eval: Vec<String>,
    pub dev: Vec<String>,
    pub train_no_dev: Vec<String>,
}

/// Split an ordered id list by modular index sampling.
///
/// Every `interval`-th id (counting from 0) goes to eval and every
/// `interval`-th from 5 to dev; train keeps everything outside dev. The
/// interval must stay above 5 to keep the held-out share small, and it is
/// bumped while it evenly divides the id count, which would leave the
/// trailing remainder class unrepresented.
pub fn split_ids(ids: &[String], interval: usize) -> Result<SplitLists, ConvertError> {
    if interval <= 5 {
        return Err(ConvertError::InvalidConfig(format!(
            "split interval must be larger than 5, got {interval}"
        )));
    }
    let mut interval = interval;
    while !ids.is_empty() && ids.len() % interval == 0 {
        interval += 1;
    }

    let select = |keep: &dyn Fn(usize) -> bool| -> Vec<String> {
        ids.iter()
            .enumerate()
            .filter(|(idx, _)| keep(*idx))
            .map(|(_, id)| id.clone())
            .collect()
    };
    Ok(SplitLists {
        utt: ids.to_vec(),
        eval: select(&|idx| idx % interval == 0),
        dev: select(&|idx| idx % interval == 5),
        train_no_dev: select(&|idx| idx % interval != 5),
    })
}

/// Collect recording ids from `acoustic/wav` and write the four list files.
pub fn write_lists(out_dir: &Path, interval: usize) -> Result<SplitLists> {
    let wav_dir = out_dir.join("acoustic").join("wav");
    let entries = std::fs::read_dir(&wav_dir)
        .with_context(|| format!("Failed to read directory: {}", wav_dir.display()))?;
    let mut ids: Vec<String> = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read entry in {}", wav_dir.display()))?
            .path();
        if path.extension().map(|ext| ext == "wav").unwrap_or(false) {
            if let Some(stem) = path.file_stem() {
                ids.push(stem.to_string_lossy().into_owned());
            }
        }
    }
    ids.sort();
    log::info!("Listing {} recordings from {}", ids.len(), wav_dir.display());

    let lists = split_ids(&ids, interval)?;
    let list_dir = out_dir.join("list");
    std::fs::create_dir_all(&list_dir)
        .with_context(|| format!("Failed to create directory: {}", list_dir.display()))?;
    write_list(&list_dir.join("utt.list"), &lists.utt)?;
    write_list(&list_dir.join("eval.list"), &lists.eval)?;
    write_list(&list_dir.join("dev.list"), &lists.dev)?;
    write_list(&list_dir.join("train_no_dev.list"), &lists.train_no_dev)?;
    Ok(lists)
}

fn write_list(path: &Path, ids: &[String]) -> Result<()> {
    std::fs::write(path, ids.join("\n"))
        .with_context(|| format!("Failed to write list: {}", path.display()))
}
