//! The conversion data model: Elements grouped into Divisions.
//!
//! A Division holds the Elements of one analyzer token. Element spellings are
//! immutable; readings are rewritten in place by the resolver and the
//! phonological pass. Concatenating every spelling across all Divisions in
//! order always reproduces the input text.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyzer::Token;
use crate::romaji::{romanize, RomajiSystem};
use crate::unicode::{hiragana_to_katakana, is_kana, is_kanji, katakana_to_hiragana};

/// Script composition of a spelling, assigned once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Composition {
    PureKanji,
    KanjiKanaMixed,
    PureKana,
    Other,
}

impl Composition {
    /// Classify a spelling. Any character that is neither kanji nor kana
    /// (Latin, digits, punctuation) makes the whole spelling `Other`.
    pub fn classify(spelling: &str) -> Composition {
        let mut has_kanji = false;
        let mut has_kana = false;
        for c in spelling.chars() {
            if is_kanji(c) {
                has_kanji = true;
            } else if is_kana(c) {
                has_kana = true;
            } else {
                return Composition::Other;
            }
        }
        match (has_kanji, has_kana) {
            (true, true) => Composition::KanjiKanaMixed,
            (true, false) => Composition::PureKanji,
            (false, true) => Composition::PureKana,
            (false, false) => Composition::Other,
        }
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Composition::PureKanji => "pure-kanji",
            Composition::KanjiKanaMixed => "mixed",
            Composition::PureKana => "pure-kana",
            Composition::Other => "other",
        };
        f.write_str(name)
    }
}

/// The atomic render unit: an input fragment with its notations in all three
/// target scripts. The spelling never changes after construction; readings
/// do, through [`Element::set_reading`], which keeps the three notations
/// coherent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub spelling: String,
    pub hiragana: String,
    pub katakana: String,
    pub romaji: String,
    pub category: Composition,
}

impl Element {
    /// Build an element from a kana reading (hiragana or katakana).
    pub fn new(
        spelling: impl Into<String>,
        reading: &str,
        category: Composition,
        system: RomajiSystem,
    ) -> Self {
        let spelling = spelling.into();
        let hiragana = katakana_to_hiragana(reading);
        let katakana = hiragana_to_katakana(&hiragana);
        let romaji = romanize(&hiragana, system);
        Self {
            spelling,
            hiragana,
            katakana,
            romaji,
            category,
        }
    }

    /// Build a pass-through element whose notations all equal the spelling.
    /// Used for `Other` fragments: punctuation and non-Japanese text render
    /// as themselves in every target script.
    pub fn verbatim(spelling: impl Into<String>) -> Self {
        let spelling = spelling.into();
        Self {
            hiragana: spelling.clone(),
            katakana: spelling.clone(),
            romaji: spelling.clone(),
            spelling,
            category: Composition::Other,
        }
    }

    /// Replace the reading, recomputing all three notations.
    pub fn set_reading(&mut self, reading: &str, system: RomajiSystem) {
        self.hiragana = katakana_to_hiragana(reading);
        self.katakana = hiragana_to_katakana(&self.hiragana);
        self.romaji = romanize(&self.hiragana, system);
    }
}

/// The Elements of one analyzer token, in document order. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub elements: Vec<Element>,
}

impl Division {
    pub fn new(elements: Vec<Element>) -> Self {
        debug_assert!(!elements.is_empty());
        Self { elements }
    }

    pub fn single(element: Element) -> Self {
        Self {
            elements: vec![element],
        }
    }

    /// Build a Division from one analyzer token.
    ///
    /// Kanji-kana-mixed surfaces are split into per-script Elements with the
    /// reading distributed across them, so annotation modes can gloss just
    /// the kanji part of e.g. 感じ. When the reading cannot be aligned the
    /// token stays a single mixed Element carrying the whole reading.
    pub fn from_token(token: &Token, system: RomajiSystem) -> Self {
        let category = Composition::classify(&token.surface);
        let elements = match category {
            Composition::Other => vec![Element::verbatim(&token.surface)],
            // Kana fragments read as themselves; analyzers with sparse
            // coverage often leave the reading field blank for these.
            Composition::PureKana => vec![Element::new(
                &token.surface,
                &token.surface,
                category,
                system,
            )],
            Composition::PureKanji => vec![Element::new(
                &token.surface,
                &token.reading,
                category,
                system,
            )],
            Composition::KanjiKanaMixed => {
                match align_mixed(&token.surface, &token.reading, system) {
                    Some(elements) => elements,
                    None => {
                        debug!(surface = %token.surface, "mixed reading alignment failed");
                        vec![Element::new(&token.surface, &token.reading, category, system)]
                    }
                }
            }
        };
        Division::new(elements)
    }

    /// Concatenated element spellings — the original input fragment.
    pub fn spelling(&self) -> String {
        self.elements.iter().map(|e| e.spelling.as_str()).collect()
    }

    pub fn hiragana_reading(&self) -> String {
        self.elements.iter().map(|e| e.hiragana.as_str()).collect()
    }

    pub fn katakana_reading(&self) -> String {
        self.elements.iter().map(|e| e.katakana.as_str()).collect()
    }

    /// True when the pronunciation ends in small-tsu, i.e. this Division
    /// geminates into the next one.
    pub fn ends_in_sokuon(&self) -> bool {
        self.elements
            .last()
            .is_some_and(|e| e.hiragana.ends_with('っ'))
    }
}

/// Split a mixed surface into kanji/kana script runs and distribute the
/// reading over them. Kana runs read as themselves and anchor the alignment;
/// each kanji run claims the reading span up to the next anchor. The final
/// kana run is matched against the end of the reading so an identical
/// fragment earlier in the reading cannot steal it.
fn align_mixed(surface: &str, reading: &str, system: RomajiSystem) -> Option<Vec<Element>> {
    let reading: Vec<char> = katakana_to_hiragana(reading).chars().collect();
    let runs = script_runs(surface);
    let mut elements = Vec::with_capacity(runs.len());
    let mut cursor = 0;
    let mut pending_kanji: Option<&str> = None;

    for (idx, (kanji_run, run)) in runs.iter().enumerate() {
        if *kanji_run {
            pending_kanji = Some(run);
            continue;
        }

        let run_reading: Vec<char> = katakana_to_hiragana(run).chars().collect();
        // A pending kanji run claims at least one reading character.
        let min_start = cursor + usize::from(pending_kanji.is_some());
        let start = if idx == runs.len() - 1 {
            reading
                .len()
                .checked_sub(run_reading.len())
                .filter(|&s| s >= min_start && reading[s..] == run_reading[..])
        } else {
            find_chars(&reading, &run_reading, min_start)
        }?;

        if let Some(kanji) = pending_kanji.take() {
            let kanji_reading: String = reading[cursor..start].iter().collect();
            elements.push(Element::new(
                kanji,
                &kanji_reading,
                Composition::PureKanji,
                system,
            ));
        } else if start != cursor {
            return None;
        }
        elements.push(Element::new(run, run, Composition::PureKana, system));
        cursor = start + run_reading.len();
    }

    if let Some(kanji) = pending_kanji.take() {
        if cursor >= reading.len() {
            return None;
        }
        let kanji_reading: String = reading[cursor..].iter().collect();
        elements.push(Element::new(
            kanji,
            &kanji_reading,
            Composition::PureKanji,
            system,
        ));
        cursor = reading.len();
    }

    (cursor == reading.len()).then_some(elements)
}

/// Partition a surface into maximal same-script runs: `true` for kanji runs,
/// `false` for kana runs. Only called on mixed spellings, which contain
/// nothing else.
fn script_runs(surface: &str) -> Vec<(bool, String)> {
    let mut runs: Vec<(bool, String)> = Vec::new();
    for c in surface.chars() {
        let kanji = is_kanji(c);
        match runs.last_mut() {
            Some((k, run)) if *k == kanji => run.push(c),
            _ => runs.push((kanji, c.to_string())),
        }
    }
    runs
}

fn find_chars(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() || from > haystack.len() - needle.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&s| haystack[s..s + needle.len()] == needle[..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(surface: &str, reading: &str) -> Token {
        Token {
            surface: surface.to_string(),
            reading: reading.to_string(),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(Composition::classify("漢字"), Composition::PureKanji);
        assert_eq!(Composition::classify("感じ"), Composition::KanjiKanaMixed);
        assert_eq!(Composition::classify("かんじ"), Composition::PureKana);
        assert_eq!(Composition::classify("カンジ"), Composition::PureKana);
        assert_eq!(Composition::classify("abc"), Composition::Other);
        assert_eq!(Composition::classify("感じ!"), Composition::Other);
        assert_eq!(Composition::classify("、"), Composition::Other);
    }

    #[test]
    fn test_element_notations() {
        let e = Element::new("漢字", "かんじ", Composition::PureKanji, RomajiSystem::Hepburn);
        assert_eq!(e.hiragana, "かんじ");
        assert_eq!(e.katakana, "カンジ");
        assert_eq!(e.romaji, "kanji");
    }

    #[test]
    fn test_element_set_reading_keeps_notations_coherent() {
        let mut e = Element::new("分", "ふん", Composition::PureKanji, RomajiSystem::Hepburn);
        e.set_reading("ぷん", RomajiSystem::Hepburn);
        assert_eq!(e.hiragana, "ぷん");
        assert_eq!(e.katakana, "プン");
        assert_eq!(e.romaji, "pun");
    }

    #[test]
    fn test_verbatim_element() {
        let e = Element::verbatim("and");
        assert_eq!(e.category, Composition::Other);
        assert_eq!(e.hiragana, "and");
        assert_eq!(e.romaji, "and");
    }

    #[test]
    fn test_mixed_token_splits_okurigana() {
        let d = Division::from_token(&token("感じ", "カンジ"), RomajiSystem::Hepburn);
        assert_eq!(d.elements.len(), 2);
        assert_eq!(d.elements[0].spelling, "感");
        assert_eq!(d.elements[0].hiragana, "かん");
        assert_eq!(d.elements[0].category, Composition::PureKanji);
        assert_eq!(d.elements[1].spelling, "じ");
        assert_eq!(d.elements[1].hiragana, "じ");
        assert_eq!(d.elements[1].category, Composition::PureKana);
        assert_eq!(d.spelling(), "感じ");
        assert_eq!(d.hiragana_reading(), "かんじ");
    }

    #[test]
    fn test_mixed_token_with_leading_kana() {
        let d = Division::from_token(&token("お願い", "おねがい"), RomajiSystem::Hepburn);
        let spellings: Vec<&str> = d.elements.iter().map(|e| e.spelling.as_str()).collect();
        assert_eq!(spellings, vec!["お", "願", "い"]);
        assert_eq!(d.elements[1].hiragana, "ねが");
    }

    #[test]
    fn test_mixed_token_repeated_kana() {
        // The first き must not steal the final run's anchor.
        let d = Division::from_token(&token("聞き込み", "ききこみ"), RomajiSystem::Hepburn);
        let readings: Vec<&str> = d.elements.iter().map(|e| e.hiragana.as_str()).collect();
        assert_eq!(readings, vec!["き", "き", "こ", "み"]);
    }

    #[test]
    fn test_mixed_alignment_failure_keeps_whole_token() {
        // Reading does not contain the kana run: fall back to one element.
        let d = Division::from_token(&token("感じ", "かんしん"), RomajiSystem::Hepburn);
        assert_eq!(d.elements.len(), 1);
        assert_eq!(d.elements[0].category, Composition::KanjiKanaMixed);
        assert_eq!(d.spelling(), "感じ");
        assert_eq!(d.hiragana_reading(), "かんしん");
    }

    #[test]
    fn test_pure_kana_reads_as_itself() {
        let d = Division::from_token(&token("たら", ""), RomajiSystem::Hepburn);
        assert_eq!(d.hiragana_reading(), "たら");
        let d = Division::from_token(&token("ライン", "らいん"), RomajiSystem::Hepburn);
        assert_eq!(d.katakana_reading(), "ライン");
        assert_eq!(d.hiragana_reading(), "らいん");
    }

    #[test]
    fn test_other_token_passes_through() {
        let d = Division::from_token(&token(" and ", ""), RomajiSystem::Hepburn);
        assert_eq!(d.elements[0].category, Composition::Other);
        assert_eq!(d.hiragana_reading(), " and ");
    }

    #[test]
    fn test_ends_in_sokuon() {
        let d = Division::from_token(&token("いっ", ""), RomajiSystem::Hepburn);
        assert!(d.ends_in_sokuon());
        let d = Division::from_token(&token("行っ", "いっ"), RomajiSystem::Hepburn);
        assert!(d.ends_in_sokuon());
        let d = Division::from_token(&token("て", ""), RomajiSystem::Hepburn);
        assert!(!d.ends_in_sokuon());
    }
}
