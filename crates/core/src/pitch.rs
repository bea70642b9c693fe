//! Note-name lookups and pitch inference from voicebank folder names.

use std::collections::HashMap;

use crate::error::ConvertError;

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const FLAT_NAMES: [(&str, i32); 5] = [("Db", 1), ("Eb", 3), ("Gb", 6), ("Ab", 8), ("Bb", 10)];

lazy_static::lazy_static! {
    /// Note name to note number (C4 = 60), octaves 0 through 7, with both
    /// sharp and flat spellings.
    static ref NOTE_NUMBERS: HashMap<String, i32> = {
        let mut map = HashMap::new();
        for octave in 0..=7i32 {
            let base = (octave + 1) * 12;
            for (semitone, name) in SHARP_NAMES.iter().enumerate() {
                map.insert(format!("{name}{octave}"), base + semitone as i32);
            }
            for (name, semitone) in FLAT_NAMES {
                map.insert(format!("{name}{octave}"), base + semitone);
            }
        }
        map
    };
}

/// Resolve a note name like `C4` to its note number.
pub fn note_number(name: &str) -> Result<i32, ConvertError> {
    NOTE_NUMBERS
        .get(name)
        .copied()
        .ok_or_else(|| ConvertError::UnknownPitch(name.to_string()))
}

/// Sharp-spelled name for a note number, if it falls in the table's range.
pub fn note_name(number: i32) -> Option<String> {
    let semitone = number.rem_euclid(12) as usize;
    let octave = number.div_euclid(12) - 1;
    if !(0..=7).contains(&octave) {
        return None;
    }
    Some(format!("{}{}", SHARP_NAMES[semitone], octave))
}

/// Guess the recording pitch from a voicebank folder name.
///
/// Pitch folders are conventionally named after their note, so the folder
/// name is matched as a substring of known note names. Shortest match wins,
/// alphabetically on ties, keeping the guess deterministic.
pub fn guess_from_prefix(prefix: &str) -> Option<String> {
    if prefix.is_empty() {
        return None;
    }
    let mut matches: Vec<&String> = NOTE_NUMBERS
        .keys()
        .filter(|name| name.contains(prefix))
        .collect();
    matches.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    matches.into_iter().next().map(|name| name.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_number_middle_c() {
        assert_eq!(note_number("C4").unwrap(), 60);
        assert_eq!(note_number("A4").unwrap(), 69);
    }

    #[test]
    fn test_flat_and_sharp_spellings_agree() {
        assert_eq!(note_number("A#4").unwrap(), note_number("Bb4").unwrap());
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        assert!(matches!(
            note_number("H3"),
            Err(ConvertError::UnknownPitch(_))
        ));
        assert!(note_number("C9").is_err());
    }

    #[test]
    fn test_note_name_roundtrip() {
        assert_eq!(note_name(60).as_deref(), Some("C4"));
        assert_eq!(note_name(61).as_deref(), Some("C#4"));
        assert_eq!(note_name(note_number("G3").unwrap()).as_deref(), Some("G3"));
        assert_eq!(note_name(-1), None);
        assert_eq!(note_name(108), None);
    }

    #[test]
    fn test_guess_from_prefix() {
        assert_eq!(guess_from_prefix("C4").as_deref(), Some("C4"));
        assert_eq!(guess_from_prefix("Bb3").as_deref(), Some("Bb3"));
        assert_eq!(guess_from_prefix("voice_take2"), None);
        assert_eq!(guess_from_prefix(""), None);
    }
}
