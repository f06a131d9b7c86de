//! Reading-dictionary boundary.
//!
//! The kanji block resolver consumes a dictionary through the
//! `ReadingDictionary` trait; `TableDictionary` is the bundled in-memory
//! implementation, loadable from entry lists or a TSV lexicon file.

mod table;

pub use table::TableDictionary;

use std::io;

use serde::{Deserialize, Serialize};

/// One dictionary record: interchangeable spellings of a word and its
/// readings, most common reading first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictEntry {
    pub spellings: Vec<String>,
    pub readings: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("lexicon line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// Dictionary boundary used to resolve kanji block readings. Implementations
/// must be shareable across concurrent conversions.
pub trait ReadingDictionary: Send + Sync {
    /// All entries listing `spelling` among their spelling variants.
    fn lookup_spelling(&self, spelling: &str) -> Vec<DictEntry>;

    /// First reading of the first entry for `spelling` — the deterministic
    /// tie-break used when a kanji block resolves against multiple entries.
    fn first_reading(&self, spelling: &str) -> Option<String> {
        self.lookup_spelling(spelling)
            .into_iter()
            .next()
            .and_then(|entry| entry.readings.into_iter().next())
    }
}
