use serde::{Deserialize, Serialize};

use crate::error::HaikuError;

/// One cleaned line of dialogue as handed over by the ingestion layer.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DialogueRecord {
    pub group_id: u32,
    pub sequence_number: u32,
    pub text: String,
    pub speaker: Option<String>,
}

/// A piece of a dialogue record after delimiter splitting.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub group_id: u32,
    pub sequence_number: u32,
    /// 1-based index of this piece inside its parent record.
    pub position: u32,
    pub text: String,
    pub syllables: u32,
}

impl Fragment {
    pub fn order_key(&self) -> (u32, u32, u32) {
        (self.group_id, self.sequence_number, self.position)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeMeta {
    pub season: u32,
    pub number_in_season: u32,
    pub title: String,
}

impl EpisodeMeta {
    /// Short provenance label, e.g. `S05E12 "Bart Gets Famous"`.
    pub fn label(&self) -> String {
        format!(
            "S{:02}E{:02} \"{}\"",
            self.season, self.number_in_season, self.title
        )
    }
}

/// A run of consecutive same-group fragments whose syllables hit the target total.
#[derive(Debug, Clone, PartialEq)]
pub struct HaikuCandidate {
    pub fragments: Vec<Fragment>,
    pub text: String,
    pub syllables: Vec<u32>,
    pub cumulative: Vec<u32>,
}

impl HaikuCandidate {
    pub fn from_fragments(fragments: &[Fragment]) -> Self {
        let text = fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let syllables: Vec<u32> = fragments.iter().map(|f| f.syllables).collect();
        let cumulative = syllables
            .iter()
            .scan(0u32, |acc, &n| {
                *acc += n;
                Some(*acc)
            })
            .collect();
        HaikuCandidate {
            fragments: fragments.to_vec(),
            text,
            syllables,
            cumulative,
        }
    }

    pub fn group_id(&self) -> Option<u32> {
        self.fragments.first().map(|f| f.group_id)
    }
}

/// A candidate that admits a clean word-level split into the pattern's lines.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ParsedHaiku {
    pub text: String,
    /// Per-fragment syllable counts, i.e. the shape used by sampling filters.
    pub syllables: Vec<u32>,
    pub group_id: u32,
    pub episode: Option<EpisodeMeta>,
}

impl ParsedHaiku {
    pub fn season(&self) -> Option<u32> {
        self.episode.as_ref().map(|e| e.season)
    }
}

/// Line lengths of the poem form, 5-7-5 unless configured otherwise.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct SyllablePattern {
    lines: Vec<u32>,
}

impl SyllablePattern {
    pub fn new(lines: Vec<u32>) -> Result<Self, HaikuError> {
        if lines.is_empty() {
            return Err(HaikuError::InvalidPattern("pattern has no lines".to_string()));
        }
        if lines.iter().any(|&n| n == 0) {
            return Err(HaikuError::InvalidPattern(format!(
                "every line needs at least one syllable, got {:?}",
                lines
            )));
        }
        Ok(SyllablePattern { lines })
    }

    pub fn haiku() -> Self {
        SyllablePattern {
            lines: vec![5, 7, 5],
        }
    }

    pub fn lines(&self) -> &[u32] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn total(&self) -> u32 {
        self.lines.iter().sum()
    }

    /// Cumulative line ends; for 5-7-5 this is `[5, 12, 17]`.
    pub fn cuts(&self) -> Vec<u32> {
        self.lines
            .iter()
            .scan(0u32, |acc, &n| {
                *acc += n;
                Some(*acc)
            })
            .collect()
    }
}

impl Default for SyllablePattern {
    fn default() -> Self {
        SyllablePattern::haiku()
    }
}

impl TryFrom<Vec<u32>> for SyllablePattern {
    type Error = HaikuError;

    fn try_from(lines: Vec<u32>) -> Result<Self, Self::Error> {
        SyllablePattern::new(lines)
    }
}

impl From<SyllablePattern> for Vec<u32> {
    fn from(pattern: SyllablePattern) -> Self {
        pattern.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(seq: u32, text: &str, syllables: u32) -> Fragment {
        Fragment {
            group_id: 1,
            sequence_number: seq,
            position: 1,
            text: text.to_string(),
            syllables,
        }
    }

    #[test]
    fn test_candidate_joins_text_and_accumulates() {
        let cand = HaikuCandidate::from_fragments(&[frag(1, "old man", 2), frag(2, "river", 2)]);
        assert_eq!(cand.text, "old man river");
        assert_eq!(cand.syllables, vec![2, 2]);
        assert_eq!(cand.cumulative, vec![2, 4]);
        assert_eq!(cand.group_id(), Some(1));
    }

    #[test]
    fn test_pattern_cuts() {
        let p = SyllablePattern::haiku();
        assert_eq!(p.total(), 17);
        assert_eq!(p.cuts(), vec![5, 12, 17]);
    }

    #[test]
    fn test_pattern_rejects_zero_line() {
        assert!(SyllablePattern::new(vec![5, 0, 5]).is_err());
        assert!(SyllablePattern::new(vec![]).is_err());
    }

    #[test]
    fn test_episode_label() {
        let meta = EpisodeMeta {
            season: 5,
            number_in_season: 12,
            title: "Bart Gets Famous".to_string(),
        };
        assert_eq!(meta.label(), "S05E12 \"Bart Gets Famous\"");
    }
}
