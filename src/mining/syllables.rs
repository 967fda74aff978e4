use super::lexicon::{strip_punctuation, SyllableResolver};
use crate::types::dialogue::SyllablePattern;

/// Split a line into word slots: hyphen and slash act as spaces, and the split
/// is on single spaces, so consecutive delimiters leave empty slots behind.
pub fn split_words(text: &str) -> Vec<String> {
    text.replace(['-', '/'], " ")
        .split(' ')
        .map(String::from)
        .collect()
}

/// Syllables of one word slot; 0 for slots that are empty once punctuation
/// is stripped.
pub fn slot_syllables(resolver: &SyllableResolver, slot: &str) -> u32 {
    let stripped = strip_punctuation(slot);
    if stripped.trim().is_empty() {
        0
    } else {
        resolver.syllables_of(&stripped)
    }
}

pub fn count_line(resolver: &SyllableResolver, text: &str) -> u32 {
    split_words(text)
        .iter()
        .map(|w| slot_syllables(resolver, w))
        .sum()
}

/// Running total after every word slot, empty slots included.
pub fn cumulative_counts(resolver: &SyllableResolver, text: &str) -> Vec<u32> {
    let mut running = 0;
    split_words(text)
        .iter()
        .map(|w| {
            running += slot_syllables(resolver, w);
            running
        })
        .collect()
}

/// True when every line end of `pattern` falls exactly on a word boundary and
/// the text carries exactly the pattern's total.
pub fn is_parsable(resolver: &SyllableResolver, text: &str, pattern: &SyllablePattern) -> bool {
    let counts = cumulative_counts(resolver, text);
    if counts.last().copied() != Some(pattern.total()) {
        return false;
    }
    pattern.cuts().iter().all(|cut| counts.contains(cut))
}
