// Windowed scan that turns an ordered fragment sequence into haikus.
//
// For every start index the window grows one fragment at a time, up to
// `max_window` fragments. A window whose syllables add up to the pattern
// total becomes a candidate if all its fragments come from one source group;
// a candidate is kept if its word-level running count lands exactly on every
// line end of the pattern.
//
// Fragments always carry at least one syllable (the preprocessor drops empty
// ones), so a window that has overshot the total or left its group can only
// get worse; the inner loop stops there.

use tracing::{debug, info};

use super::lexicon::SyllableResolver;
use super::syllables::is_parsable;
use crate::config::{MiningConfig, DEFAULT_MAX_WINDOW};
use crate::types::dialogue::{Fragment, HaikuCandidate, ParsedHaiku, SyllablePattern};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MiningStats {
    pub fragments_scanned: usize,
    pub windows_matched: usize,
    pub rejected_cross_group: usize,
    pub rejected_unparsable: usize,
    pub haikus: usize,
}

#[derive(Debug, Clone)]
pub struct MiningResult {
    pub haikus: Vec<ParsedHaiku>,
    pub stats: MiningStats,
}

pub struct HaikuMiner<'a> {
    resolver: &'a SyllableResolver,
    pattern: SyllablePattern,
    max_window: usize,
}

impl<'a> HaikuMiner<'a> {
    pub fn new(resolver: &'a SyllableResolver, pattern: SyllablePattern, max_window: usize) -> Self {
        HaikuMiner {
            resolver,
            pattern,
            max_window: max_window.max(1),
        }
    }

    pub fn haiku(resolver: &'a SyllableResolver) -> Self {
        HaikuMiner::new(resolver, SyllablePattern::haiku(), DEFAULT_MAX_WINDOW)
    }

    pub fn from_config(resolver: &'a SyllableResolver, config: &MiningConfig) -> Self {
        HaikuMiner::new(resolver, config.pattern.clone(), config.max_window)
    }

    pub fn pattern(&self) -> &SyllablePattern {
        &self.pattern
    }

    /// Every same-group window whose fragment syllables hit the total, in scan
    /// order, before word-level validation.
    pub fn mine_candidates(&self, fragments: &[Fragment]) -> (Vec<HaikuCandidate>, MiningStats) {
        let target = self.pattern.total();
        let n = fragments.len();
        let mut stats = MiningStats {
            fragments_scanned: n,
            ..MiningStats::default()
        };
        let mut candidates = Vec::new();

        for i in 0..n {
            let group = fragments[i].group_id;
            let end = (i + self.max_window).min(n);
            let mut sum = 0u32;
            for j in (i + 1)..=end {
                let last = &fragments[j - 1];
                sum += last.syllables;
                if sum > target {
                    break;
                }
                if last.group_id != group {
                    if sum == target {
                        stats.windows_matched += 1;
                        stats.rejected_cross_group += 1;
                    }
                    break;
                }
                if sum == target {
                    stats.windows_matched += 1;
                    candidates.push(HaikuCandidate::from_fragments(&fragments[i..j]));
                    break;
                }
            }
        }
        (candidates, stats)
    }

    pub fn mine(&self, fragments: &[Fragment]) -> MiningResult {
        let (candidates, mut stats) = self.mine_candidates(fragments);
        let mut haikus = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !is_parsable(self.resolver, &candidate.text, &self.pattern) {
                debug!(text = %candidate.text, "candidate rejected, no clean line breaks");
                stats.rejected_unparsable += 1;
                continue;
            }
            let Some(group_id) = candidate.group_id() else {
                continue;
            };
            haikus.push(ParsedHaiku {
                text: candidate.text,
                syllables: candidate.syllables,
                group_id,
                episode: None,
            });
        }
        stats.haikus = haikus.len();
        info!(
            fragments = stats.fragments_scanned,
            matched = stats.windows_matched,
            cross_group = stats.rejected_cross_group,
            unparsable = stats.rejected_unparsable,
            haikus = stats.haikus,
            "mining finished"
        );
        MiningResult { haikus, stats }
    }
}
