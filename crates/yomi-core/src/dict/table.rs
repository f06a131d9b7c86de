use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::unicode::is_kana_reading;

use super::{DictEntry, DictError, ReadingDictionary};

/// Spelling-indexed in-memory entry table, the default `ReadingDictionary`.
///
/// Loadable from entries directly or from a TSV lexicon where each line is
/// `spelling[|spelling…]<TAB>reading[|reading…]`. Blank lines and lines
/// starting with `#` are skipped; anything else malformed is a hard parse
/// error, with its line number.
#[derive(Debug)]
pub struct TableDictionary {
    entries: Vec<DictEntry>,
    index: HashMap<String, Vec<usize>>,
    max_spelling_chars: usize,
}

impl TableDictionary {
    pub fn from_entries(entries: Vec<DictEntry>) -> Self {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        let mut max_spelling_chars = 0;
        for (id, entry) in entries.iter().enumerate() {
            for spelling in &entry.spellings {
                max_spelling_chars = max_spelling_chars.max(spelling.chars().count());
                index.entry(spelling.clone()).or_default().push(id);
            }
        }
        Self {
            entries,
            index,
            max_spelling_chars,
        }
    }

    /// Parse a TSV lexicon.
    pub fn from_lexicon_str(text: &str) -> Result<Self, DictError> {
        let mut entries = Vec::new();
        for (number, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parse_err = |reason: &str| DictError::Parse {
                line: number + 1,
                reason: reason.to_string(),
            };

            let (spellings, readings) = line
                .split_once('\t')
                .ok_or_else(|| parse_err("expected `spellings<TAB>readings`"))?;
            let spellings: Vec<String> = spellings
                .split('|')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            let readings: Vec<String> = readings
                .split('|')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if spellings.is_empty() || readings.is_empty() {
                return Err(parse_err("empty spelling or reading list"));
            }
            if let Some(bad) = readings.iter().find(|r| !is_kana_reading(r)) {
                return Err(DictError::Parse {
                    line: number + 1,
                    reason: format!("reading '{bad}' is not kana"),
                });
            }
            entries.push(DictEntry { spellings, readings });
        }
        Ok(Self::from_entries(entries))
    }

    /// Load a TSV lexicon from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DictError> {
        let text = fs::read_to_string(path)?;
        Self::from_lexicon_str(&text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest spelling variant in characters; bounds maximum-munch scans.
    pub fn max_spelling_chars(&self) -> usize {
        self.max_spelling_chars
    }

    pub fn contains_spelling(&self, spelling: &str) -> bool {
        self.index.contains_key(spelling)
    }
}

impl ReadingDictionary for TableDictionary {
    fn lookup_spelling(&self, spelling: &str) -> Vec<DictEntry> {
        match self.index.get(spelling) {
            Some(ids) => ids.iter().map(|&id| self.entries[id].clone()).collect(),
            None => Vec::new(),
        }
    }
}
