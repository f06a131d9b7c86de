//! The conversion facade: analyzer output through resolution, phonological
//! rewriting, and rendering, as one synchronous pass per request.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyzer::MorphAnalyzer;
use crate::dict::ReadingDictionary;
use crate::division::Division;
use crate::phonology::apply_overrides;
use crate::render::{render, Mode, Target};
use crate::resolver::resolve_divisions;
use crate::romaji::RomajiSystem;

/// Parameters of one conversion. Carried explicitly per call so concurrent
/// requests against a shared [`Converter`] cannot observe each other's
/// settings. The delimiters only matter to okurigana and furigana modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub target: Target,
    pub mode: Mode,
    pub system: RomajiSystem,
    pub delimiter_start: String,
    pub delimiter_end: String,
}

impl Default for ConvertRequest {
    fn default() -> Self {
        Self {
            target: Target::Hiragana,
            mode: Mode::Normal,
            system: RomajiSystem::Hepburn,
            delimiter_start: "(".to_string(),
            delimiter_end: ")".to_string(),
        }
    }
}

/// Converter over a shared analyzer and reading dictionary. Both resources
/// are read-only once loaded; clones share them, and a single instance may
/// serve conversions from multiple threads at once.
#[derive(Clone)]
pub struct Converter {
    analyzer: Arc<dyn MorphAnalyzer>,
    dict: Arc<dyn ReadingDictionary>,
}

impl Converter {
    pub fn new(analyzer: Arc<dyn MorphAnalyzer>, dict: Arc<dyn ReadingDictionary>) -> Self {
        Self { analyzer, dict }
    }

    /// Convert `text` into the requested script and mode. Empty input (or an
    /// analyzer that returns no tokens) yields an empty string.
    pub fn convert(&self, text: &str, request: &ConvertRequest) -> String {
        if text.is_empty() {
            return String::new();
        }
        let divisions = self.divisions(text, request.system);
        render(
            &divisions,
            request.target,
            request.mode,
            request.system,
            &request.delimiter_start,
            &request.delimiter_end,
        )
    }

    /// Run the pipeline up to (but not including) rendering and return the
    /// resolved Divisions. Counter overrides are already applied, so the
    /// readings here are exactly what [`Converter::convert`] would render.
    pub fn divisions(&self, text: &str, system: RomajiSystem) -> Vec<Division> {
        let tokens = self.analyzer.tokenize(text);
        let divisions = tokens
            .iter()
            .map(|token| Division::from_token(token, system))
            .collect();
        let mut divisions = resolve_divisions(divisions, self.dict.as_ref(), system);
        apply_overrides(&mut divisions, system);
        debug!(
            chars = text.chars().count(),
            divisions = divisions.len(),
            "analyzed"
        );
        divisions
    }
}
