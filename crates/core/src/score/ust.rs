//! UST score output.
//!
//! Writes the section format UTAU editors read: a version tag, a settings
//! block, one `[#NNNN]` block per note, and a `[#TRACKEND]` terminator.

use std::path::Path;

use anyhow::{Context, Result};

use super::Score;

/// Serialize a score to UST text.
pub fn to_ust_string(score: &Score, project_name: &str) -> String {
    let mut lines: Vec<String> = vec![
        "[#VERSION]".to_string(),
        "UST Version1.20".to_string(),
        "[#SETTING]".to_string(),
        format!("Tempo={}", format_tempo(score.tempo)),
        "Tracks=1".to_string(),
        format!("ProjectName={project_name}"),
        "Mode2=True".to_string(),
    ];
    for (idx, note) in score.notes.iter().enumerate() {
        lines.push(format!("[#{idx:04}]"));
        lines.push(format!("Length={}", note.length_ticks));
        lines.push(format!("Lyric={}", note.lyric));
        lines.push(format!("NoteNum={}", note.pitch));
        lines.push(format!("Tempo={}", format_tempo(note.tempo)));
    }
    lines.push("[#TRACKEND]".to_string());
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Write a score to a UST file, creating parent directories as needed.
pub fn write_ust(path: &Path, score: &Score, project_name: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, to_ust_string(score, project_name))
        .with_context(|| format!("Failed to write UST: {}", path.display()))
}

/// Whole tempos keep one decimal place, as UTAU writes them.
fn format_tempo(tempo: f64) -> String {
    if tempo.fract() == 0.0 {
        format!("{tempo:.1}")
    } else {
        format!("{tempo}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::Note;

    fn make_score() -> Score {
        let note = |lyric: &str, length_ticks: i64| Note {
            lyric: lyric.to_string(),
            pitch: 60,
            tempo: 120.0,
            length_ticks,
        };
        Score {
            notes: vec![note("R", 120), note("あ", 480), note("R", 480)],
            tempo: 120.0,
        }
    }

    #[test]
    fn test_ust_layout() {
        let text = to_ust_string(&make_score(), "_test");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            &lines[..7],
            &[
                "[#VERSION]",
                "UST Version1.20",
                "[#SETTING]",
                "Tempo=120.0",
                "Tracks=1",
                "ProjectName=_test",
                "Mode2=True",
            ]
        );
        assert_eq!(lines[7], "[#0000]");
        assert_eq!(lines[8], "Length=120");
        assert_eq!(lines[9], "Lyric=R");
        assert_eq!(lines[10], "NoteNum=60");
        assert_eq!(lines[11], "Tempo=120.0");
        assert_eq!(lines[12], "[#0001]");
        assert_eq!(*lines.last().unwrap(), "[#TRACKEND]");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_fractional_tempo_kept_verbatim() {
        assert_eq!(format_tempo(120.0), "120.0");
        assert_eq!(format_tempo(99.5), "99.5");
    }
}
