//! Rendering of resolved Divisions into an output string.
//!
//! The render matrix is target script (hiragana, katakana, romaji) crossed
//! with layout mode (normal, spaced, okurigana, furigana). Kana targets work
//! per Division or per Element and never consult the romanization system.
//! Romaji flow modes re-romanize each Division's whole reading so that ん and
//! small-tsu rules see across Element boundaries, and carry gemination from a
//! Division ending in っ into the first consonant of the next one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::division::{Composition, Division, Element};
use crate::romaji::{gemination_prefix, romanize, RomajiSystem};

/// Output script selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    #[default]
    Hiragana,
    Katakana,
    Romaji,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown target script '{0}' (expected hiragana, katakana, or romaji)")]
pub struct ParseTargetError(String);

impl FromStr for Target {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("hiragana") {
            Ok(Target::Hiragana)
        } else if s.eq_ignore_ascii_case("katakana") {
            Ok(Target::Katakana)
        } else if s.eq_ignore_ascii_case("romaji") {
            Ok(Target::Romaji)
        } else {
            Err(ParseTargetError(s.to_string()))
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Target::Hiragana => "hiragana",
            Target::Katakana => "katakana",
            Target::Romaji => "romaji",
        };
        f.write_str(name)
    }
}

/// Output layout selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Normal,
    Spaced,
    Okurigana,
    Furigana,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown render mode '{0}' (expected normal, spaced, okurigana, or furigana)")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("normal") {
            Ok(Mode::Normal)
        } else if s.eq_ignore_ascii_case("spaced") {
            Ok(Mode::Spaced)
        } else if s.eq_ignore_ascii_case("okurigana") {
            Ok(Mode::Okurigana)
        } else if s.eq_ignore_ascii_case("furigana") {
            Ok(Mode::Furigana)
        } else {
            Err(ParseModeError(s.to_string()))
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Normal => "normal",
            Mode::Spaced => "spaced",
            Mode::Okurigana => "okurigana",
            Mode::Furigana => "furigana",
        };
        f.write_str(name)
    }
}

/// Render resolved Divisions. The delimiters wrap reading annotations in
/// okurigana and furigana modes and are ignored by the other two.
pub fn render(
    divisions: &[Division],
    target: Target,
    mode: Mode,
    system: RomajiSystem,
    delimiter_start: &str,
    delimiter_end: &str,
) -> String {
    match (target, mode) {
        (Target::Romaji, Mode::Normal | Mode::Spaced) => {
            render_romaji_flow(divisions, mode, system)
        }
        (Target::Romaji, Mode::Okurigana | Mode::Furigana) => {
            render_romaji_annotated(divisions, mode, delimiter_start, delimiter_end)
        }
        _ => render_kana(divisions, target, mode, delimiter_start, delimiter_end),
    }
}

fn kanji_bearing(element: &Element) -> bool {
    matches!(
        element.category,
        Composition::PureKanji | Composition::KanjiKanaMixed
    )
}

fn kana_reading(division: &Division, target: Target) -> String {
    match target {
        Target::Katakana => division.katakana_reading(),
        _ => division.hiragana_reading(),
    }
}

fn kana_notation(element: &Element, target: Target) -> &str {
    match target {
        Target::Katakana => &element.katakana,
        _ => &element.hiragana,
    }
}

fn render_kana(
    divisions: &[Division],
    target: Target,
    mode: Mode,
    delimiter_start: &str,
    delimiter_end: &str,
) -> String {
    let mut out = String::new();
    for division in divisions {
        match mode {
            Mode::Normal => out.push_str(&kana_reading(division, target)),
            // A space follows every Division, the last one included.
            Mode::Spaced => {
                out.push_str(&kana_reading(division, target));
                out.push(' ');
            }
            Mode::Okurigana => {
                for element in &division.elements {
                    out.push_str(&element.spelling);
                    if kanji_bearing(element) {
                        out.push_str(delimiter_start);
                        out.push_str(kana_notation(element, target));
                        out.push_str(delimiter_end);
                    }
                }
            }
            Mode::Furigana => {
                for element in &division.elements {
                    if kanji_bearing(element) {
                        push_ruby(
                            &mut out,
                            &element.spelling,
                            kana_notation(element, target),
                            delimiter_start,
                            delimiter_end,
                        );
                    } else {
                        out.push_str(&element.spelling);
                    }
                }
            }
        }
    }
    out
}

/// Normal and spaced romaji. Each Division romanizes as one word; a Division
/// ending in small-tsu emits without its trailing space and raises a flag,
/// and the next word gains a doubled first consonant, so いっ + ぷん comes
/// out as the single word "ippun".
fn render_romaji_flow(divisions: &[Division], mode: Mode, system: RomajiSystem) -> String {
    let mut out = String::new();
    let mut pending = false;

    for division in divisions {
        let mut word = romanize(&division.hiragana_reading(), system);
        if pending {
            // Consumed whether or not the word starts with a consonant.
            if let Some(c) = gemination_prefix(&word) {
                word.insert(0, c);
            }
            pending = false;
        }
        out.push_str(&word);

        if division.ends_in_sokuon() {
            pending = true;
            continue;
        }
        if mode == Mode::Spaced {
            out.push(' ');
        }
    }
    out
}

/// Okurigana and furigana romaji. Kanji-bearing Elements carry their own
/// romaji annotation next to the spelling; kana Elements pass through as
/// spelled. A pending gemination lands in the first Element's annotation.
fn render_romaji_annotated(
    divisions: &[Division],
    mode: Mode,
    delimiter_start: &str,
    delimiter_end: &str,
) -> String {
    let mut out = String::new();
    let mut pending = false;

    for division in divisions {
        for (position, element) in division.elements.iter().enumerate() {
            let doubled = position == 0 && pending;
            if position == 0 {
                pending = false;
            }

            if !kanji_bearing(element) {
                out.push_str(&element.spelling);
                continue;
            }

            let mut annotation = element.romaji.clone();
            if doubled {
                if let Some(c) = gemination_prefix(&annotation) {
                    annotation.insert(0, c);
                }
            }
            if mode == Mode::Furigana {
                push_ruby(
                    &mut out,
                    &element.spelling,
                    &annotation,
                    delimiter_start,
                    delimiter_end,
                );
            } else {
                out.push_str(&element.spelling);
                out.push_str(delimiter_start);
                out.push_str(&annotation);
                out.push_str(delimiter_end);
            }
        }

        if division.ends_in_sokuon() {
            pending = true;
        }
    }
    out
}

fn push_ruby(out: &mut String, spelling: &str, notation: &str, ds: &str, de: &str) {
    out.push_str("<ruby>");
    out.push_str(spelling);
    out.push_str("<rp>");
    out.push_str(ds);
    out.push_str("</rp><rt>");
    out.push_str(notation);
    out.push_str("</rt><rp>");
    out.push_str(de);
    out.push_str("</rp></ruby>");
}
