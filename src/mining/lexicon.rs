// Syllable lexicon and the layered resolver built on top of it.
//
// Three word lists are loaded once at startup into a `Lexicon`:
// - overrides: hand-curated corrections for the corpus (names, catchphrases)
// - pronouncing: a CMU-style phonetic dictionary, syllables = stressed vowels
// - secondary: a community word -> count table
//
// `SyllableResolver` turns those into an ordered list of `SyllableSource`s
// (override, pronouncing, plural retry on pronouncing, secondary) and falls
// back to the rule-based estimator. The lexicon is never mutated after load,
// so one `Arc<Lexicon>` can back any number of resolvers across threads.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use super::estimator::estimate_syllables;
use crate::config::LexiconConfig;
use crate::error::HaikuError;

/// Characters removed from a word before any lookup.
pub const STRIP_CHARS: &[char] = &[',', '.', '?', '!', ':', '\\', '"'];

pub fn strip_punctuation(word: &str) -> String {
    word.chars().filter(|c| !STRIP_CHARS.contains(c)).collect()
}

/// Normalize a raw token into a lookup key: punctuation stripped, lowercase.
pub fn normalize_word(word: &str) -> String {
    strip_punctuation(word).to_lowercase()
}

/// One layer of syllable lookup.
pub trait SyllableSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Syllables for an already normalized word, or `None` on a miss.
    fn try_lookup(&self, word: &str) -> Option<u32>;
}

/// Plain word -> count table (override and secondary dictionaries).
#[derive(Debug, Default, Clone)]
pub struct SyllableTable {
    counts: HashMap<String, u32>,
}

impl SyllableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, HaikuError> {
        let raw: HashMap<String, u32> = serde_json::from_str(json)?;
        Ok(raw.into_iter().collect())
    }

    pub fn insert(&mut self, word: &str, syllables: u32) {
        self.counts.insert(word.trim().to_lowercase(), syllables);
    }

    pub fn get(&self, word: &str) -> Option<u32> {
        self.counts.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(String, u32)> for SyllableTable {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        let mut table = SyllableTable::new();
        for (word, syllables) in iter {
            table.insert(&word, syllables);
        }
        table
    }
}

/// Phonetic dictionary in CMU pronouncing format.
///
/// `WORD  PH1 PH2 ...` per line, alternates as `WORD(2) ...`, `;;;` comments.
/// Only the stressed-vowel count of each variant is kept, in file order.
#[derive(Debug, Default, Clone)]
pub struct PronouncingDictionary {
    variants: HashMap<String, Vec<u32>>,
}

impl PronouncingDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(data: &str) -> Self {
        let mut variants: HashMap<String, Vec<u32>> = HashMap::new();
        for line in data.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }
            let mut parts = line.split_whitespace();
            let Some(word_raw) = parts.next() else {
                continue;
            };
            let word = word_raw
                .split('(')
                .next()
                .unwrap_or(word_raw)
                .to_lowercase();

            let phonemes: Vec<&str> = parts.collect();
            if phonemes.is_empty() {
                continue;
            }
            let vowels = phonemes
                .iter()
                .filter(|p| p.chars().last().is_some_and(|c| c.is_ascii_digit()))
                .count() as u32;
            variants.entry(word).or_default().push(vowels);
        }
        PronouncingDictionary { variants }
    }

    /// Syllables of the first pronunciation variant.
    pub fn syllables(&self, word: &str) -> Option<u32> {
        self.variants.get(word).and_then(|v| v.first().copied())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.variants.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// All syllable data the resolver needs. Immutable once built.
#[derive(Debug, Default, Clone)]
pub struct Lexicon {
    pub overrides: Arc<SyllableTable>,
    pub pronouncing: Arc<PronouncingDictionary>,
    pub secondary: Arc<SyllableTable>,
}

impl Lexicon {
    pub fn new(
        overrides: SyllableTable,
        pronouncing: PronouncingDictionary,
        secondary: SyllableTable,
    ) -> Self {
        Lexicon {
            overrides: Arc::new(overrides),
            pronouncing: Arc::new(pronouncing),
            secondary: Arc::new(secondary),
        }
    }

    /// Load every configured list. Unset paths give empty layers.
    pub fn load(config: &LexiconConfig) -> Result<Self, HaikuError> {
        let overrides = match &config.overrides_path {
            Some(path) => SyllableTable::from_json(&read_file(path)?)?,
            None => SyllableTable::new(),
        };
        let pronouncing = match &config.pronouncing_path {
            Some(path) => PronouncingDictionary::parse(&read_file(path)?),
            None => PronouncingDictionary::new(),
        };
        let secondary = match &config.secondary_path {
            Some(path) => SyllableTable::from_json(&read_file(path)?)?,
            None => SyllableTable::new(),
        };
        info!(
            overrides = overrides.len(),
            pronouncing = pronouncing.len(),
            secondary = secondary.len(),
            "lexicon loaded"
        );
        Ok(Lexicon::new(overrides, pronouncing, secondary))
    }
}

fn read_file(path: &Path) -> Result<String, HaikuError> {
    fs::read_to_string(path).map_err(|e| HaikuError::io(path, e))
}

impl SyllableSource for Arc<SyllableTable> {
    fn name(&self) -> &'static str {
        "table"
    }

    fn try_lookup(&self, word: &str) -> Option<u32> {
        self.get(word)
    }
}

impl SyllableSource for Arc<PronouncingDictionary> {
    fn name(&self) -> &'static str {
        "pronouncing"
    }

    fn try_lookup(&self, word: &str) -> Option<u32> {
        self.syllables(word)
    }
}

/// Retries the phonetic dictionary with a trailing `s` removed, which covers
/// plurals and possessives the dictionary lacks.
pub struct PluralRetry(pub Arc<PronouncingDictionary>);

impl SyllableSource for PluralRetry {
    fn name(&self) -> &'static str {
        "plural-retry"
    }

    fn try_lookup(&self, word: &str) -> Option<u32> {
        let stem = word.strip_suffix('s')?;
        self.0.syllables(stem)
    }
}

pub struct SyllableResolver {
    sources: Vec<Box<dyn SyllableSource>>,
}

impl SyllableResolver {
    pub fn new(lexicon: &Lexicon) -> Self {
        let sources: Vec<Box<dyn SyllableSource>> = vec![
            Box::new(Arc::clone(&lexicon.overrides)),
            Box::new(Arc::clone(&lexicon.pronouncing)),
            Box::new(PluralRetry(Arc::clone(&lexicon.pronouncing))),
            Box::new(Arc::clone(&lexicon.secondary)),
        ];
        SyllableResolver { sources }
    }

    pub fn with_sources(sources: Vec<Box<dyn SyllableSource>>) -> Self {
        SyllableResolver { sources }
    }

    /// Syllables of one word. Never fails and never returns less than 1.
    pub fn syllables_of(&self, word: &str) -> u32 {
        let word = normalize_word(word);
        for source in &self.sources {
            if let Some(n) = source.try_lookup(&word) {
                debug!(word = %word, source = source.name(), syllables = n, "lexicon hit");
                return n.max(1);
            }
        }
        estimate_syllables(&word).max(1)
    }
}
