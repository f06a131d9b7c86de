//! Character-level Unicode classification and kana conversion for Japanese
//! text.

pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

/// The prolonged sound mark ー (U+30FC) lives in the katakana block and is
/// treated as katakana here, so readings like "ラーメン" classify cleanly.
pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

pub fn is_kana(c: char) -> bool {
    is_hiragana(c) || is_katakana(c)
}

/// CJK Unified Ideographs plus extensions A and B, and the iteration mark
/// 々 (U+3005), which only ever appears inside kanji spellings.
pub fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{20000}'..='\u{2A6DF}').contains(&c)
        || c == '\u{3005}'
}

/// Convert hiragana characters to katakana, passing everything else through.
///
/// Only the paired ranges ぁ..ゖ (U+3041..U+3096) and ァ..ヶ (U+30A1..U+30F6)
/// are offset-convertible; ー and punctuation survive unchanged.
pub fn hiragana_to_katakana(s: &str) -> String {
    s.chars()
        .map(|c| {
            if ('\u{3041}'..='\u{3096}').contains(&c) {
                char::from_u32(c as u32 + 0x60).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Convert katakana characters to hiragana, passing everything else through.
pub fn katakana_to_hiragana(s: &str) -> String {
    s.chars()
        .map(|c| {
            if ('\u{30A1}'..='\u{30F6}').contains(&c) {
                char::from_u32(c as u32 - 0x60).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Check if a string is a usable kana reading: hiragana or katakana
/// characters only (ー included).
pub fn is_kana_reading(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_kana)
}
