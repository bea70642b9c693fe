//! Copy converted outputs into per-model training folders.

use std::path::Path;

use anyhow::{Context, Result};

/// Recursively copy a directory tree, creating `dst` as needed.
fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create directory: {}", dst.display()))?;
    let entries = std::fs::read_dir(src)
        .with_context(|| format!("Failed to read directory: {}", src.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", src.display()))?;
        let path = entry.path();
        let target = dst.join(entry.file_name());
        if path.is_dir() {
            copy_tree(&path, &target)?;
        } else {
            std::fs::copy(&path, &target)
                .with_context(|| format!("Failed to copy {}", path.display()))?;
        }
    }
    Ok(())
}

/// Mirror converted outputs under `acoustic/`, `duration/` and `timelag/`.
///
/// Only the acoustic model sees the real score labels and the audio. The
/// duration and timelag models train purely on aligned timing, so the
/// alignment labels fill both label slots there.
pub fn place_files(out_dir: &Path) -> Result<()> {
    let align = out_dir.join("label_phone_align");
    let score = out_dir.join("label_phone_score");
    let wav = out_dir.join("wav");

    let acoustic = out_dir.join("acoustic");
    log::info!("Copying acoustic files to {}", acoustic.display());
    copy_tree(&align, &acoustic.join("label_phone_align"))?;
    copy_tree(&score, &acoustic.join("label_phone_score"))?;
    copy_tree(&wav, &acoustic.join("wav"))?;

    for model in ["duration", "timelag"] {
        let model_dir = out_dir.join(model);
        log::info!("Copying {model} files to {}", model_dir.display());
        copy_tree(&align, &model_dir.join("label_phone_align"))?;
        copy_tree(&align, &model_dir.join("label_phone_score"))?;
    }

    Ok(())
}
