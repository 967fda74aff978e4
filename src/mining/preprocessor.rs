use regex::{Captures, Regex};
use tracing::debug;

use super::lexicon::SyllableResolver;
use super::syllables::count_line;
use crate::config::MiningConfig;
use crate::error::HaikuError;
use crate::types::dialogue::{DialogueRecord, Fragment};

const DELIMITER: char = '.';

/// Splits dialogue records into syllable-annotated fragments.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    abbreviations: Option<Regex>,
    extra_delimiters: Vec<char>,
}

impl Preprocessor {
    pub fn new(
        abbreviations: &[String],
        split_on_colon: bool,
        split_on_semicolon: bool,
    ) -> Result<Self, HaikuError> {
        let mut extra_delimiters = vec!['!', '?', '/'];
        if split_on_colon {
            extra_delimiters.push(':');
        }
        if split_on_semicolon {
            extra_delimiters.push(';');
        }
        Ok(Preprocessor {
            abbreviations: abbreviation_regex(abbreviations)?,
            extra_delimiters,
        })
    }

    pub fn from_config(config: &MiningConfig) -> Result<Self, HaikuError> {
        Preprocessor::new(
            &config.abbreviations,
            config.split_on_colon,
            config.split_on_semicolon,
        )
    }

    /// Drop the periods inside listed abbreviations so "Mr. Burns" stays whole.
    pub fn protect_abbreviations(&self, text: &str) -> String {
        match &self.abbreviations {
            Some(re) => re
                .replace_all(text, |caps: &Captures| caps[0].replace('.', ""))
                .into_owned(),
            None => text.to_string(),
        }
    }

    /// Sentence-ish pieces of one record, in order. Pieces are left untrimmed
    /// and may be empty.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let protected = self.protect_abbreviations(text);
        let normalized: String = protected
            .chars()
            .map(|c| {
                if self.extra_delimiters.contains(&c) {
                    DELIMITER
                } else {
                    c
                }
            })
            .collect();
        normalized.split(DELIMITER).map(String::from).collect()
    }

    /// Flatten records into fragments ordered by (group, sequence, position),
    /// annotated with syllables. Zero-syllable fragments are dropped.
    pub fn to_fragments(
        &self,
        records: &[DialogueRecord],
        resolver: &SyllableResolver,
    ) -> Vec<Fragment> {
        let mut fragments: Vec<Fragment> = records
            .iter()
            .flat_map(|record| {
                self.split_text(&record.text)
                    .into_iter()
                    .enumerate()
                    .map(move |(idx, piece)| Fragment {
                        group_id: record.group_id,
                        sequence_number: record.sequence_number,
                        position: idx as u32 + 1,
                        text: piece,
                        syllables: 0,
                    })
            })
            .collect();
        fragments.sort_by_key(Fragment::order_key);

        let before = fragments.len();
        for fragment in fragments.iter_mut() {
            fragment.syllables = count_line(resolver, &fragment.text);
        }
        fragments.retain(|f| f.syllables > 0);
        debug!(
            records = records.len(),
            pieces = before,
            kept = fragments.len(),
            "fragments annotated"
        );
        fragments
    }
}

fn abbreviation_regex(abbreviations: &[String]) -> Result<Option<Regex>, HaikuError> {
    let mut list: Vec<&str> = abbreviations
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    if list.is_empty() {
        return Ok(None);
    }
    // Longest first so "U.S.A." is not cut short by "U.S.".
    list.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternatives: Vec<String> = list.iter().map(|a| regex::escape(a)).collect();
    let pattern = format!(r"(?i)\b(?:{})", alternatives.join("|"));
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| HaikuError::InvalidConfig(format!("abbreviation list: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ABBREVIATIONS;
    use crate::mining::lexicon::{Lexicon, PronouncingDictionary, SyllableTable};

    fn preprocessor() -> Preprocessor {
        let abbreviations: Vec<String> =
            DEFAULT_ABBREVIATIONS.iter().map(|s| s.to_string()).collect();
        Preprocessor::new(&abbreviations, false, false).unwrap()
    }

    fn resolver() -> SyllableResolver {
        SyllableResolver::new(&Lexicon::new(
            SyllableTable::new(),
            PronouncingDictionary::new(),
            SyllableTable::new(),
        ))
    }

    fn record(group_id: u32, sequence_number: u32, text: &str) -> DialogueRecord {
        DialogueRecord {
            group_id,
            sequence_number,
            text: text.to_string(),
            speaker: None,
        }
    }

    #[test]
    fn test_split_on_sentence_marks() {
        let p = preprocessor();
        assert_eq!(
            p.split_text("Hello! How are you? Fine/thanks."),
            vec!["Hello", " How are you", " Fine", "thanks", ""]
        );
    }

    #[test]
    fn test_abbreviations_are_protected() {
        let p = preprocessor();
        assert_eq!(p.split_text("Mr. Burns called the F.B.I."), vec!["Mr Burns called the FBI"]);
        assert_eq!(p.split_text("mrs. krabappel"), vec!["mrs krabappel"]);
        assert_eq!(p.split_text("Made in the U.S.A."), vec!["Made in the USA"]);
    }

    #[test]
    fn test_unlisted_abbreviation_still_splits() {
        let p = preprocessor();
        assert_eq!(p.split_text("Gov. Quimby"), vec!["Gov", " Quimby"]);
    }

    #[test]
    fn test_colon_and_semicolon_are_optional() {
        let plain = preprocessor();
        assert_eq!(plain.split_text("a: b; c").len(), 1);

        let extended = Preprocessor::new(&[], true, true).unwrap();
        assert_eq!(extended.split_text("a: b; c"), vec!["a", " b", " c"]);
    }

    #[test]
    fn test_to_fragments_orders_and_drops_empty() {
        let p = preprocessor();
        let records = vec![
            record(2, 1, "Second episode."),
            record(1, 7, "Later line"),
            record(1, 3, "First! Then this."),
        ];
        let fragments = p.to_fragments(&records, &resolver());
        let keys: Vec<(u32, u32, u32)> = fragments.iter().map(Fragment::order_key).collect();
        assert_eq!(keys, vec![(1, 3, 1), (1, 3, 2), (1, 7, 1), (2, 1, 1)]);
        assert!(fragments.iter().all(|f| f.syllables > 0));
        assert_eq!(fragments[1].text, " Then this");
    }

    #[test]
    fn test_whitespace_only_record_yields_nothing() {
        let p = preprocessor();
        let fragments = p.to_fragments(&[record(1, 1, "  ... ?! ")], &resolver());
        assert!(fragments.is_empty());
    }
}
