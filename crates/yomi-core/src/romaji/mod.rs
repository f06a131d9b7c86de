//! Kana → Latin romanization under Hepburn, Nippon-shiki, or passport style.
//!
//! `romanize` is a pure function of the input and the selected system.
//! Contracted pairs are matched before single kana; small-tsu doubles the
//! next consonant (silently consumed at the end of a word, where the render
//! loop carries the doubling into the next Division); ん and the long-vowel
//! mark ー follow per-system rules.

mod table;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::unicode::katakana_to_hiragana;

/// Romanization system selector. A read-only configuration value: it picks
/// the syllable table and the ん / long-vowel spelling rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RomajiSystem {
    #[default]
    Hepburn,
    Nippon,
    Passport,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown romanization system '{0}' (expected hepburn, nippon, or passport)")]
pub struct ParseSystemError(String);

impl FromStr for RomajiSystem {
    type Err = ParseSystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("hepburn") {
            Ok(RomajiSystem::Hepburn)
        } else if s.eq_ignore_ascii_case("nippon") {
            Ok(RomajiSystem::Nippon)
        } else if s.eq_ignore_ascii_case("passport") {
            Ok(RomajiSystem::Passport)
        } else {
            Err(ParseSystemError(s.to_string()))
        }
    }
}

impl fmt::Display for RomajiSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RomajiSystem::Hepburn => "hepburn",
            RomajiSystem::Nippon => "nippon",
            RomajiSystem::Passport => "passport",
        };
        f.write_str(name)
    }
}

/// Romanize a kana string. Katakana input is normalized to hiragana first;
/// characters outside the kana tables (punctuation, Latin) pass through.
pub fn romanize(kana: &str, system: RomajiSystem) -> String {
    let chars: Vec<char> = katakana_to_hiragana(kana).chars().collect();
    let mut out = String::with_capacity(kana.len());
    let mut sokuon = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == 'っ' {
            // A trailing small-tsu marks gemination into the NEXT word and
            // never spells a syllable of its own; the caller's render loop
            // owns that doubling, so it is silent here.
            sokuon = i + 1 < chars.len();
            i += 1;
            continue;
        }

        if c == 'ん' {
            out.push_str(moraic_n(&chars, i + 1, system));
            i += 1;
            continue;
        }

        if c == 'ー' {
            extend_vowel(&mut out, system);
            i += 1;
            continue;
        }

        // Contracted pair first, single kana second.
        let mut buf = [0u8; 4];
        let (fragment, advance) = match digraph_at(&chars, i, system) {
            Some(fragment) => (fragment, 2),
            None => match table::lookup(c.encode_utf8(&mut buf), system) {
                Some(fragment) => (fragment, 1),
                None => {
                    out.push(c);
                    sokuon = false;
                    i += 1;
                    continue;
                }
            },
        };

        if sokuon {
            push_geminated(&mut out, fragment);
            sokuon = false;
        }
        out.push_str(fragment);
        i += advance;
    }

    out
}

fn digraph_at(chars: &[char], i: usize, system: RomajiSystem) -> Option<&'static str> {
    if i + 1 >= chars.len() {
        return None;
    }
    let pair: String = chars[i..=i + 1].iter().collect();
    table::lookup(&pair, system)
}

/// Spell ん from what follows it. Hepburn assimilates to "m" before labials
/// and disambiguates with an apostrophe before vowels and y; Nippon-shiki
/// keeps "n" everywhere but still disambiguates; passport style assimilates
/// and never writes the apostrophe.
fn moraic_n(chars: &[char], next: usize, system: RomajiSystem) -> &'static str {
    let mut buf = [0u8; 4];
    let first = chars
        .get(next)
        .and_then(|c| table::lookup(c.encode_utf8(&mut buf), system))
        .and_then(|fragment| fragment.chars().next());

    let labial = matches!(first, Some('b' | 'm' | 'p'));
    let vowel_or_y = matches!(first, Some('a' | 'i' | 'u' | 'e' | 'o' | 'y'));

    match system {
        RomajiSystem::Hepburn => {
            if labial {
                "m"
            } else if vowel_or_y {
                "n'"
            } else {
                "n"
            }
        }
        RomajiSystem::Nippon => {
            if vowel_or_y {
                "n'"
            } else {
                "n"
            }
        }
        RomajiSystem::Passport => {
            if labial {
                "m"
            } else {
                "n"
            }
        }
    }
}

/// Apply the long-vowel mark ー to the vowel already in `out`. No preceding
/// vowel (degenerate input) renders nothing.
fn extend_vowel(out: &mut String, system: RomajiSystem) {
    let Some(last) = out.chars().last() else {
        return;
    };
    if !matches!(last, 'a' | 'i' | 'u' | 'e' | 'o') {
        return;
    }
    match system {
        // スーパー → suupaa
        RomajiSystem::Hepburn => out.push(last),
        // Circumflex: カー → kâ
        RomajiSystem::Nippon => {
            out.pop();
            out.push(match last {
                'a' => 'â',
                'i' => 'î',
                'u' => 'û',
                'e' => 'ê',
                _ => 'ô',
            });
        }
        // Passport style marks only long o, as "oh"
        RomajiSystem::Passport => {
            if last == 'o' {
                out.push('h');
            }
        }
    }
}

/// Double the first consonant of `fragment` after a small-tsu. Hepburn
/// spells っち as "tch"; a vowel-initial syllable takes no doubling.
fn push_geminated(out: &mut String, fragment: &str) {
    if fragment.starts_with("ch") {
        out.push('t');
        return;
    }
    if let Some(c) = fragment.chars().next() {
        if c.is_ascii_alphabetic() && !matches!(c, 'a' | 'i' | 'u' | 'e' | 'o') {
            out.push(c);
        }
    }
}

/// The letter a following word's romaji gains when the previous Division
/// ended in small-tsu. `None` when the word starts with a vowel or
/// non-Latin text, where there is no consonant to double.
pub(crate) fn gemination_prefix(roma: &str) -> Option<char> {
    if roma.starts_with("ch") {
        return Some('t');
    }
    let c = roma.chars().next()?;
    if c.is_ascii_alphabetic() && !matches!(c, 'a' | 'i' | 'u' | 'e' | 'o') {
        Some(c)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_syllables() {
        assert_eq!(romanize("かんじ", RomajiSystem::Hepburn), "kanji");
        assert_eq!(romanize("さくら", RomajiSystem::Hepburn), "sakura");
        assert_eq!(romanize("", RomajiSystem::Hepburn), "");
    }

    #[test]
    fn test_system_divergence() {
        assert_eq!(romanize("しち", RomajiSystem::Hepburn), "shichi");
        assert_eq!(romanize("しち", RomajiSystem::Nippon), "siti");
        assert_eq!(romanize("しち", RomajiSystem::Passport), "shichi");
        assert_eq!(romanize("つづき", RomajiSystem::Hepburn), "tsuzuki");
        assert_eq!(romanize("つづき", RomajiSystem::Nippon), "tuduki");
        assert_eq!(romanize("ふじ", RomajiSystem::Nippon), "huzi");
    }

    #[test]
    fn test_contracted_sounds() {
        assert_eq!(romanize("しゃしん", RomajiSystem::Hepburn), "shashin");
        assert_eq!(romanize("しゃしん", RomajiSystem::Nippon), "syasin");
        assert_eq!(romanize("ちょっと", RomajiSystem::Hepburn), "chotto");
        assert_eq!(romanize("ちょっと", RomajiSystem::Nippon), "tyotto");
        assert_eq!(romanize("びょういん", RomajiSystem::Hepburn), "byouin");
    }

    #[test]
    fn test_sokuon_doubling() {
        assert_eq!(romanize("きって", RomajiSystem::Hepburn), "kitte");
        assert_eq!(romanize("ざっし", RomajiSystem::Hepburn), "zasshi");
        // Hepburn spells っち with a t
        assert_eq!(romanize("まっちゃ", RomajiSystem::Hepburn), "matcha");
        assert_eq!(romanize("まっちゃ", RomajiSystem::Nippon), "mattya");
    }

    #[test]
    fn test_trailing_sokuon_is_silent() {
        assert_eq!(romanize("いっ", RomajiSystem::Hepburn), "i");
        assert_eq!(romanize("っ", RomajiSystem::Hepburn), "");
    }

    #[test]
    fn test_moraic_n() {
        assert_eq!(romanize("しんぶん", RomajiSystem::Hepburn), "shimbun");
        assert_eq!(romanize("しんぶん", RomajiSystem::Nippon), "sinbun");
        assert_eq!(romanize("しんぶん", RomajiSystem::Passport), "shimbun");
        assert_eq!(romanize("ほん", RomajiSystem::Hepburn), "hon");
        assert_eq!(romanize("きんえん", RomajiSystem::Hepburn), "kin'en");
        assert_eq!(romanize("きんえん", RomajiSystem::Passport), "kinen");
        assert_eq!(romanize("ほんや", RomajiSystem::Nippon), "hon'ya");
    }

    #[test]
    fn test_long_vowel_mark() {
        assert_eq!(romanize("ラーメン", RomajiSystem::Hepburn), "raamen");
        assert_eq!(romanize("ラーメン", RomajiSystem::Nippon), "râmen");
        assert_eq!(romanize("ラーメン", RomajiSystem::Passport), "ramen");
        assert_eq!(romanize("オーサカ", RomajiSystem::Passport), "ohsaka");
    }

    #[test]
    fn test_katakana_input() {
        assert_eq!(romanize("カンジ", RomajiSystem::Hepburn), "kanji");
        assert_eq!(romanize("レミリア", RomajiSystem::Hepburn), "remiria");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(romanize("、", RomajiSystem::Hepburn), "、");
        assert_eq!(romanize("abc", RomajiSystem::Hepburn), "abc");
    }

    #[test]
    fn test_particle_wo() {
        assert_eq!(romanize("を", RomajiSystem::Hepburn), "o");
        assert_eq!(romanize("を", RomajiSystem::Nippon), "wo");
    }

    #[test]
    fn test_pure_function() {
        let a = romanize("がっこうへいった", RomajiSystem::Hepburn);
        let b = romanize("がっこうへいった", RomajiSystem::Hepburn);
        assert_eq!(a, b);
    }

    #[test]
    fn test_gemination_prefix() {
        assert_eq!(gemination_prefix("pun"), Some('p'));
        assert_eq!(gemination_prefix("cha"), Some('t'));
        assert_eq!(gemination_prefix("aka"), None);
        assert_eq!(gemination_prefix("、"), None);
        assert_eq!(gemination_prefix(""), None);
    }

    #[test]
    fn test_parse_system() {
        assert_eq!("hepburn".parse::<RomajiSystem>().unwrap(), RomajiSystem::Hepburn);
        assert_eq!("Nippon".parse::<RomajiSystem>().unwrap(), RomajiSystem::Nippon);
        assert!("kunrei".parse::<RomajiSystem>().is_err());
    }
}
