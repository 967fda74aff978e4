use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::error::HaikuError;
use crate::types::dialogue::{DialogueRecord, EpisodeMeta, ParsedHaiku};

fn column(headers: &csv::StringRecord, name: &str) -> Result<usize, HaikuError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| HaikuError::InvalidConfig(format!("missing column '{}'", name)))
}

fn parse_number(row: &csv::StringRecord, idx: usize, name: &str) -> Result<u32, String> {
    let raw = row.get(idx).unwrap_or("").trim();
    // Exported tables sometimes carry integer ids as floats ("12.0").
    let raw = raw.strip_suffix(".0").unwrap_or(raw);
    raw.parse::<u32>()
        .map_err(|e| format!("{} '{}': {}", name, raw, e))
}

fn is_speaking(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Script lines with `episode_id`, `number`, `spoken_words` and, optionally,
/// `speaking_line` and `raw_character_text` columns.
pub fn read_script_lines<R: Read>(
    reader: R,
    speaking_only: bool,
) -> Result<Vec<DialogueRecord>, HaikuError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let episode_col = column(&headers, "episode_id")?;
    let number_col = column(&headers, "number")?;
    let text_col = column(&headers, "spoken_words")?;
    let speaking_col = column(&headers, "speaking_line").ok();
    let speaker_col = column(&headers, "raw_character_text").ok();

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (idx, result) in csv_reader.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!("skipping script row {}: {}", idx + 1, e);
                skipped += 1;
                continue;
            }
        };

        let text = row.get(text_col).unwrap_or("").to_string();
        if speaking_only {
            let speaking = speaking_col
                .and_then(|c| row.get(c))
                .map(is_speaking)
                .unwrap_or(true);
            if !speaking || text.trim().is_empty() {
                skipped += 1;
                continue;
            }
        }

        let parsed = parse_number(&row, episode_col, "episode_id")
            .and_then(|e| parse_number(&row, number_col, "number").map(|n| (e, n)));
        match parsed {
            Ok((group_id, sequence_number)) => records.push(DialogueRecord {
                group_id,
                sequence_number,
                text,
                speaker: speaker_col
                    .and_then(|c| row.get(c))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
            }),
            Err(e) => {
                warn!("skipping script row {}: {}", idx + 1, e);
                skipped += 1;
            }
        }
    }
    info!(kept = records.len(), skipped, "script lines read");
    Ok(records)
}

pub fn load_script_lines(path: &Path, speaking_only: bool) -> Result<Vec<DialogueRecord>, HaikuError> {
    let file = std::fs::File::open(path).map_err(|e| HaikuError::io(path, e))?;
    read_script_lines(std::io::BufReader::new(file), speaking_only)
}

/// Episode metadata keyed by source group id.
#[derive(Debug, Clone, Default)]
pub struct EpisodeCatalog {
    episodes: HashMap<u32, EpisodeMeta>,
}

impl EpisodeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group_id: u32, meta: EpisodeMeta) {
        self.episodes.insert(group_id, meta);
    }

    pub fn get(&self, group_id: u32) -> Option<&EpisodeMeta> {
        self.episodes.get(&group_id)
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Fill in episode metadata on mined haikus. Returns how many were matched.
    pub fn attach(&self, haikus: &mut [ParsedHaiku]) -> usize {
        let mut matched = 0;
        for haiku in haikus.iter_mut() {
            haiku.episode = self.get(haiku.group_id).cloned();
            if haiku.episode.is_some() {
                matched += 1;
            }
        }
        matched
    }

    /// Episodes table with `id`, `season`, `number_in_season` and `title`.
    pub fn read<R: Read>(reader: R) -> Result<Self, HaikuError> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let id_col = column(&headers, "id")?;
        let season_col = column(&headers, "season")?;
        let number_col = column(&headers, "number_in_season")?;
        let title_col = column(&headers, "title")?;

        let mut catalog = EpisodeCatalog::new();
        for (idx, result) in csv_reader.records().enumerate() {
            let row = result?;
            let parsed = parse_number(&row, id_col, "id").and_then(|id| {
                let season = parse_number(&row, season_col, "season")?;
                let number_in_season = parse_number(&row, number_col, "number_in_season")?;
                Ok((id, season, number_in_season))
            });
            match parsed {
                Ok((id, season, number_in_season)) => catalog.insert(
                    id,
                    EpisodeMeta {
                        season,
                        number_in_season,
                        title: row.get(title_col).unwrap_or("").trim().to_string(),
                    },
                ),
                Err(e) => warn!("skipping episode row {}: {}", idx + 1, e),
            }
        }
        info!(episodes = catalog.len(), "episode catalog read");
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, HaikuError> {
        let file = std::fs::File::open(path).map_err(|e| HaikuError::io(path, e))?;
        EpisodeCatalog::read(std::io::BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "id,episode_id,number,raw_text,raw_character_text,speaking_line,spoken_words
1,32,209,\"Miss Hoover: No, actually, it was a little of both.\",Miss Hoover,true,\"No, actually, it was a little of both.\"
2,32,210,(Springfield Elementary School: EXT. ELEMENTARY - SCHOOL PLAYGROUND - AFTERNOON),,false,
3,32,211,\"Lisa Simpson: Where's Mr. Bergstrom?\",Lisa Simpson,true,Where's Mr. Bergstrom?
4,x,212,broken,Nobody,true,bad episode id
5,33,1.0,\"Bart: Cowabunga\",Bart Simpson,true,Cowabunga
";

    const EPISODES: &str = "id,title,season,number_in_season
32,Lisa's Substitute,2,19
33,The War of the Simpsons,2,20
34,,bad,1
";

    #[test]
    fn test_read_script_lines_speaking_only() {
        let records = read_script_lines(SCRIPT.as_bytes(), true).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].group_id, 32);
        assert_eq!(records[0].sequence_number, 209);
        assert_eq!(records[0].speaker.as_deref(), Some("Miss Hoover"));
        assert_eq!(records[1].text, "Where's Mr. Bergstrom?");
        assert_eq!(records[2].sequence_number, 1);
    }

    #[test]
    fn test_read_script_lines_keeps_non_speaking_when_asked() {
        let records = read_script_lines(SCRIPT.as_bytes(), false).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[1].text, "");
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let err = read_script_lines("episode_id,number\n1,2\n".as_bytes(), true).unwrap_err();
        assert!(matches!(err, HaikuError::InvalidConfig(_)));
    }

    #[test]
    fn test_episode_catalog_attach() {
        let catalog = EpisodeCatalog::read(EPISODES.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);

        let mut haikus = vec![
            ParsedHaiku {
                text: "a".to_string(),
                syllables: vec![17],
                group_id: 33,
                episode: None,
            },
            ParsedHaiku {
                text: "b".to_string(),
                syllables: vec![17],
                group_id: 99,
                episode: None,
            },
        ];
        assert_eq!(catalog.attach(&mut haikus), 1);
        let meta = haikus[0].episode.as_ref().unwrap();
        assert_eq!(meta.title, "The War of the Simpsons");
        assert_eq!(meta.season, 2);
        assert_eq!(meta.number_in_season, 20);
        assert!(haikus[1].episode.is_none());
    }
}
