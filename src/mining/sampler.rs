use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use super::lexicon::{strip_punctuation, SyllableResolver};
use super::syllables::{slot_syllables, split_words};
use crate::error::HaikuError;
use crate::types::dialogue::{ParsedHaiku, SyllablePattern};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleFilter {
    /// Accepted per-fragment syllable shapes; `None` accepts every shape.
    pub shapes: Option<Vec<Vec<u32>>>,
    /// Latest season allowed; entries without episode metadata fail this filter.
    pub era_cutoff: Option<u32>,
}

impl SampleFilter {
    pub fn matches(&self, haiku: &ParsedHaiku) -> bool {
        if let Some(cutoff) = self.era_cutoff {
            match haiku.season() {
                Some(season) if season <= cutoff => {}
                _ => return false,
            }
        }
        if let Some(shapes) = &self.shapes {
            if !shapes.iter().any(|s| *s == haiku.syllables) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampledHaiku {
    pub lines: Vec<String>,
    pub haiku: ParsedHaiku,
}

impl SampledHaiku {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static whitespace pattern"))
}

/// Cut `text` into the pattern's lines at word boundaries.
///
/// Each word is appended to the current line first; the line pointer then
/// moves on once the running count has reached that line's end, so the word
/// that completes a line stays on it. Punctuation is dropped, case is kept.
pub fn split_lines(
    resolver: &SyllableResolver,
    text: &str,
    pattern: &SyllablePattern,
) -> Vec<String> {
    let cuts = pattern.cuts();
    let mut lines = vec![String::new(); pattern.line_count()];
    let mut line = 0;
    let mut running = 0;

    for slot in split_words(text) {
        running += slot_syllables(resolver, &slot);
        lines[line].push_str(&strip_punctuation(&slot));
        lines[line].push(' ');
        if running >= cuts[line] && line + 1 < lines.len() {
            line += 1;
        }
    }

    lines
        .iter()
        .map(|l| whitespace_run().replace_all(l, " ").trim().to_string())
        .collect()
}

pub struct HaikuSampler<'a> {
    resolver: &'a SyllableResolver,
    pattern: SyllablePattern,
}

impl<'a> HaikuSampler<'a> {
    pub fn new(resolver: &'a SyllableResolver, pattern: SyllablePattern) -> Self {
        HaikuSampler { resolver, pattern }
    }

    pub fn sample<R: Rng + ?Sized>(
        &self,
        corpus: &[ParsedHaiku],
        filter: &SampleFilter,
        rng: &mut R,
    ) -> Result<SampledHaiku, HaikuError> {
        let survivors: Vec<&ParsedHaiku> = corpus.iter().filter(|h| filter.matches(h)).collect();
        debug!(corpus = corpus.len(), survivors = survivors.len(), "sampling");
        let chosen = survivors
            .choose(rng)
            .copied()
            .ok_or(HaikuError::EmptyCandidateSet)?;

        Ok(SampledHaiku {
            lines: split_lines(self.resolver, &chosen.text, &self.pattern),
            haiku: chosen.clone(),
        })
    }
}
