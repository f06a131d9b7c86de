//! Irregular counter and time-expression readings.
//!
//! Numeral + counter pairs geminate or voice at the boundary (三百 is
//! さんびゃく, not さんひゃく; 一分 is いっぷん) in ways per-word dictionary
//! readings miss once the pair is split across Divisions. A fixed table
//! keyed by (counter character, preceding numeral) rewrites one or both
//! readings in place.

use crate::division::{Composition, Division};
use crate::romaji::RomajiSystem;

/// (trigger, preceding numeral, new preceding reading, new trigger reading).
#[rustfmt::skip]
static OVERRIDES: &[(char, char, Option<&str>, Option<&str>)] = &[
    // Hundreds: -byaku / -pyaku
    ('百', '三', Some("さん"), Some("びゃく")),
    ('百', '六', Some("ろっ"), Some("ぴゃく")),
    ('百', '八', Some("はっ"), Some("ぴゃく")),
    // Thousands: -zen
    ('千', '三', None,         Some("ぜん")),
    ('千', '八', Some("はっ"), None),
    // Hours: 四時 is よじ, 九時 is くじ
    ('時', '四', Some("よ"),   None),
    ('時', '九', Some("く"),   None),
    // Minutes: -pun
    ('分', '一', Some("いっ"), Some("ぷん")),
    ('分', '三', None,         Some("ぷん")),
    ('分', '四', None,         Some("ぷん")),
    ('分', '六', Some("ろっ"), Some("ぷん")),
    ('分', '八', Some("はっ"), Some("ぷん")),
    ('分', '十', Some("じゅ"), Some("ぷん")),
];

/// Apply counter overrides in place. A rule fires when a pure-kanji Element
/// spells a trigger character and the Division before it consists of exactly
/// one Element spelling the paired numeral; multi-element predecessors never
/// trigger.
pub fn apply_overrides(divisions: &mut [Division], system: RomajiSystem) {
    for i in 1..divisions.len() {
        let (before, rest) = divisions.split_at_mut(i);
        let previous = &mut before[i - 1];
        if previous.elements.len() != 1 {
            continue;
        }
        let Some(numeral) = single_char(&previous.elements[0].spelling) else {
            continue;
        };

        for element in &mut rest[0].elements {
            if element.category != Composition::PureKanji {
                continue;
            }
            let Some(trigger) = single_char(&element.spelling) else {
                continue;
            };
            let Some(&(_, _, new_previous, new_trigger)) = OVERRIDES
                .iter()
                .find(|&&(t, n, _, _)| t == trigger && n == numeral)
            else {
                continue;
            };
            if let Some(reading) = new_previous {
                previous.elements[0].set_reading(reading, system);
            }
            if let Some(reading) = new_trigger {
                element.set_reading(reading, system);
            }
        }
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Token;

    fn division(surface: &str, reading: &str) -> Division {
        Division::from_token(
            &Token {
                surface: surface.to_string(),
                reading: reading.to_string(),
            },
            RomajiSystem::Hepburn,
        )
    }

    #[test]
    fn test_sanbyaku() {
        let mut divisions = vec![division("三", "さん"), division("百", "ひゃく")];
        apply_overrides(&mut divisions, RomajiSystem::Hepburn);
        assert_eq!(divisions[0].hiragana_reading(), "さん");
        assert_eq!(divisions[1].hiragana_reading(), "びゃく");
    }

    #[test]
    fn test_ippun_rewrites_both_sides() {
        let mut divisions = vec![division("一", "いち"), division("分", "ふん")];
        apply_overrides(&mut divisions, RomajiSystem::Hepburn);
        assert_eq!(divisions[0].hiragana_reading(), "いっ");
        assert_eq!(divisions[1].hiragana_reading(), "ぷん");
        // All three notations stay coherent after the rewrite.
        assert_eq!(divisions[0].elements[0].katakana, "イッ");
        assert_eq!(divisions[1].elements[0].romaji, "pun");
    }

    #[test]
    fn test_yoji_rewrites_the_numeral() {
        let mut divisions = vec![division("四", "し"), division("時", "じ")];
        apply_overrides(&mut divisions, RomajiSystem::Hepburn);
        assert_eq!(divisions[0].hiragana_reading(), "よ");
        assert_eq!(divisions[1].hiragana_reading(), "じ");
    }

    #[test]
    fn test_juppun() {
        let mut divisions = vec![division("十", "じゅう"), division("分", "ふん")];
        apply_overrides(&mut divisions, RomajiSystem::Hepburn);
        assert_eq!(divisions[0].hiragana_reading(), "じゅ");
        assert_eq!(divisions[1].hiragana_reading(), "ぷん");
    }

    #[test]
    fn test_unlisted_pair_unchanged() {
        let mut divisions = vec![division("五", "ご"), division("分", "ふん")];
        apply_overrides(&mut divisions, RomajiSystem::Hepburn);
        assert_eq!(divisions[0].hiragana_reading(), "ご");
        assert_eq!(divisions[1].hiragana_reading(), "ふん");
    }

    #[test]
    fn test_longer_predecessor_never_fires() {
        // 第三 spells two characters, so it is not a lone numeral.
        let mut divisions = vec![division("第三", "だいさん"), division("百", "ひゃく")];
        apply_overrides(&mut divisions, RomajiSystem::Hepburn);
        assert_eq!(divisions[1].hiragana_reading(), "ひゃく");
    }

    #[test]
    fn test_kana_trigger_never_fires() {
        let mut divisions = vec![division("三", "さん"), division("ひゃく", "ひゃく")];
        apply_overrides(&mut divisions, RomajiSystem::Hepburn);
        assert_eq!(divisions[1].hiragana_reading(), "ひゃく");
    }

    #[test]
    fn test_trigger_without_predecessor_untouched() {
        let mut divisions = vec![division("百", "ひゃく")];
        apply_overrides(&mut divisions, RomajiSystem::Hepburn);
        assert_eq!(divisions[0].hiragana_reading(), "ひゃく");
    }
}
