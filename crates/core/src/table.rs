//! Alias-to-phoneme table.
//!
//! The table file carries one `alias phoneme [phoneme ...]` entry per line,
//! whitespace separated, such as `きゃ ky a` or `R pau`. Lookups for aliases
//! the table does not know fall back to the alias itself: an unknown entry
//! is assumed to already be a phoneme.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

#[derive(Debug, Clone, Default)]
pub struct PhonemeTable {
    entries: HashMap<String, Vec<String>>,
}

impl PhonemeTable {
    pub fn load(path: &Path) -> Result<PhonemeTable> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read phoneme table: {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    /// Parse table text. Blank lines are skipped; later duplicates win.
    pub fn parse(text: &str) -> PhonemeTable {
        let mut entries = HashMap::new();
        for line in text.lines() {
            let mut tokens = line.split_whitespace();
            let Some(alias) = tokens.next() else { continue };
            let phonemes: Vec<String> = tokens.map(str::to_string).collect();
            if !phonemes.is_empty() {
                entries.insert(alias.to_string(), phonemes);
            }
        }
        PhonemeTable { entries }
    }

    /// Phoneme sequence for an alias, with the identity fallback.
    pub fn phonemes(&self, alias: &str) -> Vec<String> {
        match self.entries.get(alias) {
            Some(phones) => phones.clone(),
            None => vec![alias.to_string()],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
