//! Morphological-analyzer boundary and the bundled lexicon tokenizer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dict::{ReadingDictionary, TableDictionary};
use crate::unicode::{is_hiragana, is_kanji, is_katakana};

/// One analyzer token: a surface fragment and its baseline kana reading.
///
/// The reading is trusted as-is for single tokens; runs of lone-kanji tokens
/// get re-read by the block resolver, which treats this field as the
/// per-character fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub surface: String,
    pub reading: String,
}

/// Tokenization boundary. Implementations must be shareable across
/// concurrent conversions.
pub trait MorphAnalyzer: Send + Sync {
    /// Split `text` into tokens in document order. Every character of `text`
    /// appears in exactly one token's surface.
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// Greedy longest-match tokenizer over the spellings of a `TableDictionary`.
///
/// A stand-in for a full morphological analyzer: at each position the longest
/// spelling with an entry wins. Out-of-lexicon kanji become single-character
/// tokens (leaving the block resolver free to re-segment them); runs of
/// out-of-lexicon kana or non-Japanese characters group into one token each,
/// reading as themselves.
pub struct LexiconAnalyzer {
    dict: Arc<TableDictionary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Kanji,
    Hiragana,
    Katakana,
    Other,
}

fn char_class(c: char) -> CharClass {
    if is_kanji(c) {
        CharClass::Kanji
    } else if is_hiragana(c) {
        CharClass::Hiragana
    } else if is_katakana(c) {
        CharClass::Katakana
    } else {
        CharClass::Other
    }
}

impl LexiconAnalyzer {
    pub fn new(dict: Arc<TableDictionary>) -> Self {
        Self { dict }
    }

    /// Longest spelling with an entry starting at `at`, with its reading.
    fn match_at(&self, chars: &[char], at: usize) -> Option<(String, String)> {
        let longest = self.dict.max_spelling_chars().min(chars.len() - at);
        for len in (1..=longest).rev() {
            let candidate: String = chars[at..at + len].iter().collect();
            if let Some(reading) = self.dict.first_reading(&candidate) {
                return Some((candidate, reading));
            }
        }
        None
    }

    fn has_entry_at(&self, chars: &[char], at: usize) -> bool {
        let longest = self.dict.max_spelling_chars().min(chars.len() - at);
        (1..=longest).any(|len| {
            let candidate: String = chars[at..at + len].iter().collect();
            self.dict.contains_spelling(&candidate)
        })
    }
}

impl MorphAnalyzer for LexiconAnalyzer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            if let Some((surface, reading)) = self.match_at(&chars, i) {
                i += surface.chars().count();
                tokens.push(Token { surface, reading });
                continue;
            }

            let class = char_class(chars[i]);
            let start = i;
            i += 1;
            if class != CharClass::Kanji {
                // Extend the unknown run while the script stays the same and
                // no lexicon entry could begin mid-run.
                while i < chars.len()
                    && char_class(chars[i]) == class
                    && !self.has_entry_at(&chars, i)
                {
                    i += 1;
                }
            }
            let surface: String = chars[start..i].iter().collect();
            tokens.push(Token {
                reading: surface.clone(),
                surface,
            });
        }

        debug!(tokens = tokens.len(), "tokenized");
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::DictEntry;

    fn analyzer(pairs: &[(&str, &str)]) -> LexiconAnalyzer {
        let entries = pairs
            .iter()
            .map(|(spelling, reading)| DictEntry {
                spellings: vec![spelling.to_string()],
                readings: vec![reading.to_string()],
            })
            .collect();
        LexiconAnalyzer::new(Arc::new(TableDictionary::from_entries(entries)))
    }

    fn surfaces(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.surface.as_str()).collect()
    }

    #[test]
    fn test_longest_match_wins() {
        let a = analyzer(&[("感じ", "かんじ"), ("感", "かん"), ("じ", "じ")]);
        let tokens = a.tokenize("感じ");
        assert_eq!(surfaces(&tokens), vec!["感じ"]);
        assert_eq!(tokens[0].reading, "かんじ");
    }

    #[test]
    fn test_unknown_kanji_stays_single() {
        let a = analyzer(&[("感じ", "かんじ")]);
        let tokens = a.tokenize("三百");
        assert_eq!(surfaces(&tokens), vec!["三", "百"]);
        assert_eq!(tokens[0].reading, "三");
    }

    #[test]
    fn test_unknown_kana_groups_by_script() {
        let a = analyzer(&[]);
        let tokens = a.tokenize("レミリアたら");
        assert_eq!(surfaces(&tokens), vec!["レミリア", "たら"]);
        assert_eq!(tokens[0].reading, "レミリア");
    }

    #[test]
    fn test_unknown_run_breaks_at_entry() {
        let a = analyzer(&[("たら", "たら")]);
        let tokens = a.tokenize("ぬたら");
        assert_eq!(surfaces(&tokens), vec!["ぬ", "たら"]);
    }

    #[test]
    fn test_non_japanese_grouped() {
        let a = analyzer(&[("最高", "さいこう")]);
        let tokens = a.tokenize("and 最高！");
        assert_eq!(surfaces(&tokens), vec!["and ", "最高", "！"]);
    }

    #[test]
    fn test_empty_input() {
        let a = analyzer(&[("感じ", "かんじ")]);
        assert!(a.tokenize("").is_empty());
    }

    #[test]
    fn test_surfaces_concatenate_to_input() {
        let a = analyzer(&[("手", "て"), ("繋ご", "つなご")]);
        let text = "手を繋ごう、ライン and レミリア！";
        let tokens = a.tokenize(text);
        let joined: String = tokens.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(joined, text);
    }
}
