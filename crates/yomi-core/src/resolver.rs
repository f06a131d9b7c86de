//! Kanji block resolution.
//!
//! An analyzer without coverage for a compound falls back to char-by-char
//! tokens whose per-character readings are unreliable (音/訓 mixups, proper
//! names). This pass merges runs of lone-kanji Divisions into maximal blocks
//! and re-reads each block against the dictionary, longest span first,
//! re-processing any unresolved tail the same way.

use tracing::debug;

use crate::dict::ReadingDictionary;
use crate::division::{Composition, Division, Element};
use crate::romaji::RomajiSystem;

/// Merge consecutive single-character pure-kanji Divisions into blocks and
/// resolve each block's reading. All other Divisions pass through unchanged,
/// flushing any pending block first, so document order is preserved.
pub fn resolve_divisions(
    divisions: Vec<Division>,
    dict: &dyn ReadingDictionary,
    system: RomajiSystem,
) -> Vec<Division> {
    let mut out = Vec::with_capacity(divisions.len());
    // Pending block: (kanji character, analyzer baseline reading).
    let mut block: Vec<(String, String)> = Vec::new();

    for division in divisions {
        if is_lone_kanji(&division) {
            let element = &division.elements[0];
            block.push((element.spelling.clone(), element.hiragana.clone()));
            continue;
        }
        flush_block(&mut block, dict, system, &mut out);
        out.push(division);
    }
    flush_block(&mut block, dict, system, &mut out);
    out
}

fn is_lone_kanji(division: &Division) -> bool {
    division.elements.len() == 1
        && division.elements[0].category == Composition::PureKanji
        && division.elements[0].spelling.chars().count() == 1
}

/// Resolve a block with a shrinking window: try `block[lo..hi]` against the
/// dictionary, dropping the last character on a miss. The window floor is one
/// character, where a miss keeps the analyzer's own reading instead of
/// retrying, and `lo` then advances past whatever was emitted — both bounds
/// move strictly toward termination regardless of dictionary coverage.
fn flush_block(
    block: &mut Vec<(String, String)>,
    dict: &dyn ReadingDictionary,
    system: RomajiSystem,
    out: &mut Vec<Division>,
) {
    if block.is_empty() {
        return;
    }

    let mut lo = 0;
    while lo < block.len() {
        let mut hi = block.len();
        loop {
            let span: String = block[lo..hi].iter().map(|(c, _)| c.as_str()).collect();
            if let Some(reading) = dict.first_reading(&span) {
                out.push(Division::single(Element::new(
                    span,
                    &reading,
                    Composition::PureKanji,
                    system,
                )));
                lo = hi;
                break;
            }
            if hi - lo == 1 {
                let (spelling, baseline) = &block[lo];
                debug!(kanji = %spelling, "no entry at any width, keeping analyzer reading");
                out.push(Division::single(Element::new(
                    spelling.clone(),
                    baseline,
                    Composition::PureKanji,
                    system,
                )));
                lo = hi;
                break;
            }
            hi -= 1;
        }
    }
    block.clear();
}
