//! Kana → Latin syllable tables.
//!
//! `BASE` is the Hepburn column and doubles as the shared fallback; `NIPPON`
//! holds only the rows where Nippon-shiki spelling diverges. Passport style
//! shares the Hepburn letter table and differs only in ん and long-vowel
//! handling, which live in the conversion walk.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::RomajiSystem;

static BASE: &[(&str, &str)] = &[
    // Monographs
    ("あ", "a"),
    ("い", "i"),
    ("う", "u"),
    ("え", "e"),
    ("お", "o"),
    ("か", "ka"),
    ("き", "ki"),
    ("く", "ku"),
    ("け", "ke"),
    ("こ", "ko"),
    ("さ", "sa"),
    ("し", "shi"),
    ("す", "su"),
    ("せ", "se"),
    ("そ", "so"),
    ("た", "ta"),
    ("ち", "chi"),
    ("つ", "tsu"),
    ("て", "te"),
    ("と", "to"),
    ("な", "na"),
    ("に", "ni"),
    ("ぬ", "nu"),
    ("ね", "ne"),
    ("の", "no"),
    ("は", "ha"),
    ("ひ", "hi"),
    ("ふ", "fu"),
    ("へ", "he"),
    ("ほ", "ho"),
    ("ま", "ma"),
    ("み", "mi"),
    ("む", "mu"),
    ("め", "me"),
    ("も", "mo"),
    ("や", "ya"),
    ("ゆ", "yu"),
    ("よ", "yo"),
    ("ら", "ra"),
    ("り", "ri"),
    ("る", "ru"),
    ("れ", "re"),
    ("ろ", "ro"),
    ("わ", "wa"),
    ("ゐ", "i"),
    ("ゑ", "e"),
    ("を", "o"),
    // Voiced and semi-voiced
    ("が", "ga"),
    ("ぎ", "gi"),
    ("ぐ", "gu"),
    ("げ", "ge"),
    ("ご", "go"),
    ("ざ", "za"),
    ("じ", "ji"),
    ("ず", "zu"),
    ("ぜ", "ze"),
    ("ぞ", "zo"),
    ("だ", "da"),
    ("ぢ", "ji"),
    ("づ", "zu"),
    ("で", "de"),
    ("ど", "do"),
    ("ば", "ba"),
    ("び", "bi"),
    ("ぶ", "bu"),
    ("べ", "be"),
    ("ぼ", "bo"),
    ("ぱ", "pa"),
    ("ぴ", "pi"),
    ("ぷ", "pu"),
    ("ぺ", "pe"),
    ("ぽ", "po"),
    ("ゔ", "vu"),
    // Small kana that can stand alone in readings
    ("ぁ", "a"),
    ("ぃ", "i"),
    ("ぅ", "u"),
    ("ぇ", "e"),
    ("ぉ", "o"),
    ("ゃ", "ya"),
    ("ゅ", "yu"),
    ("ょ", "yo"),
    ("ゎ", "wa"),
    ("ゕ", "ka"),
    ("ゖ", "ke"),
    // Contracted sounds
    ("きゃ", "kya"),
    ("きゅ", "kyu"),
    ("きょ", "kyo"),
    ("しゃ", "sha"),
    ("しゅ", "shu"),
    ("しょ", "sho"),
    ("ちゃ", "cha"),
    ("ちゅ", "chu"),
    ("ちょ", "cho"),
    ("にゃ", "nya"),
    ("にゅ", "nyu"),
    ("にょ", "nyo"),
    ("ひゃ", "hya"),
    ("ひゅ", "hyu"),
    ("ひょ", "hyo"),
    ("みゃ", "mya"),
    ("みゅ", "myu"),
    ("みょ", "myo"),
    ("りゃ", "rya"),
    ("りゅ", "ryu"),
    ("りょ", "ryo"),
    ("ぎゃ", "gya"),
    ("ぎゅ", "gyu"),
    ("ぎょ", "gyo"),
    ("じゃ", "ja"),
    ("じゅ", "ju"),
    ("じょ", "jo"),
    ("ぢゃ", "ja"),
    ("ぢゅ", "ju"),
    ("ぢょ", "jo"),
    ("びゃ", "bya"),
    ("びゅ", "byu"),
    ("びょ", "byo"),
    ("ぴゃ", "pya"),
    ("ぴゅ", "pyu"),
    ("ぴょ", "pyo"),
    // Extended combinations common in loanword readings
    ("ふぁ", "fa"),
    ("ふぃ", "fi"),
    ("ふぇ", "fe"),
    ("ふぉ", "fo"),
    ("うぃ", "wi"),
    ("うぇ", "we"),
    ("うぉ", "wo"),
    ("てぃ", "ti"),
    ("でぃ", "di"),
    ("ゔぁ", "va"),
    ("ゔぃ", "vi"),
    ("ゔぇ", "ve"),
    ("ゔぉ", "vo"),
];

/// Rows where Nippon-shiki diverges from the shared table.
static NIPPON: &[(&str, &str)] = &[
    ("し", "si"),
    ("ち", "ti"),
    ("つ", "tu"),
    ("ふ", "hu"),
    ("じ", "zi"),
    ("ぢ", "di"),
    ("づ", "du"),
    ("を", "wo"),
    ("ゐ", "wi"),
    ("ゑ", "we"),
    ("しゃ", "sya"),
    ("しゅ", "syu"),
    ("しょ", "syo"),
    ("ちゃ", "tya"),
    ("ちゅ", "tyu"),
    ("ちょ", "tyo"),
    ("じゃ", "zya"),
    ("じゅ", "zyu"),
    ("じょ", "zyo"),
    ("ぢゃ", "dya"),
    ("ぢゅ", "dyu"),
    ("ぢょ", "dyo"),
];

fn base_map() -> &'static HashMap<&'static str, &'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| BASE.iter().copied().collect())
}

fn nippon_map() -> &'static HashMap<&'static str, &'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| NIPPON.iter().copied().collect())
}

/// Look up a kana fragment (one kana or a contracted pair) for `system`.
pub(super) fn lookup(kana: &str, system: RomajiSystem) -> Option<&'static str> {
    if system == RomajiSystem::Nippon {
        if let Some(roma) = nippon_map().get(kana) {
            return Some(roma);
        }
    }
    base_map().get(kana).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_split() {
        assert_eq!(lookup("し", RomajiSystem::Hepburn), Some("shi"));
        assert_eq!(lookup("し", RomajiSystem::Nippon), Some("si"));
        assert_eq!(lookup("し", RomajiSystem::Passport), Some("shi"));
        assert_eq!(lookup("づ", RomajiSystem::Hepburn), Some("zu"));
        assert_eq!(lookup("づ", RomajiSystem::Nippon), Some("du"));
        assert_eq!(lookup("ちゃ", RomajiSystem::Nippon), Some("tya"));
    }

    #[test]
    fn test_unknown_fragment() {
        assert_eq!(lookup("漢", RomajiSystem::Hepburn), None);
        assert_eq!(lookup("", RomajiSystem::Hepburn), None);
    }
}
