use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::HaikuError;
use crate::types::dialogue::{EpisodeMeta, ParsedHaiku};

// One CSV row of the mined table. The syllable list is stored as a literal
// list, e.g. "[5, 7, 5]".
#[derive(Serialize, Deserialize, Debug)]
struct HaikuRow {
    text: String,
    syllables: String,
    group_id: u32,
    season: Option<u32>,
    number_in_season: Option<u32>,
    title: Option<String>,
}

pub fn format_syllable_list(syllables: &[u32]) -> String {
    let parts: Vec<String> = syllables.iter().map(|n| n.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

pub fn parse_syllable_list(value: &str, row: usize) -> Result<Vec<u32>, HaikuError> {
    serde_json::from_str::<Vec<u32>>(value.trim()).map_err(|_| HaikuError::MalformedSyllableList {
        row,
        value: value.to_string(),
    })
}

impl From<&ParsedHaiku> for HaikuRow {
    fn from(haiku: &ParsedHaiku) -> Self {
        HaikuRow {
            text: haiku.text.clone(),
            syllables: format_syllable_list(&haiku.syllables),
            group_id: haiku.group_id,
            season: haiku.episode.as_ref().map(|e| e.season),
            number_in_season: haiku.episode.as_ref().map(|e| e.number_in_season),
            title: haiku.episode.as_ref().map(|e| e.title.clone()),
        }
    }
}

impl HaikuRow {
    fn into_haiku(self, row: usize) -> Result<ParsedHaiku, HaikuError> {
        let syllables = parse_syllable_list(&self.syllables, row)?;
        let episode = match (self.season, self.number_in_season) {
            (Some(season), Some(number_in_season)) => Some(EpisodeMeta {
                season,
                number_in_season,
                title: self.title.unwrap_or_default(),
            }),
            _ => None,
        };
        Ok(ParsedHaiku {
            text: self.text,
            syllables,
            group_id: self.group_id,
            episode,
        })
    }
}

pub fn write_haiku_table<W: Write>(writer: W, haikus: &[ParsedHaiku]) -> Result<(), HaikuError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for haiku in haikus {
        csv_writer.serialize(HaikuRow::from(haiku))?;
    }
    csv_writer
        .flush()
        .map_err(|e| HaikuError::io("<haiku table>", e))?;
    Ok(())
}

/// Read a mined table back. Any row with an unreadable syllable list fails
/// the whole load.
pub fn read_haiku_table<R: Read>(reader: R) -> Result<Vec<ParsedHaiku>, HaikuError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut haikus = Vec::new();
    for (idx, result) in csv_reader.deserialize::<HaikuRow>().enumerate() {
        let row = result?;
        haikus.push(row.into_haiku(idx + 1)?);
    }
    Ok(haikus)
}

/// Saves the mined haikus to a CSV file.
pub fn save_haiku_table(haikus: &[ParsedHaiku], file_path: &Path) -> Result<(), HaikuError> {
    let file = File::create(file_path).map_err(|e| HaikuError::io(file_path, e))?;
    write_haiku_table(BufWriter::new(file), haikus)
}

/// Loads mined haikus from a CSV file written by `save_haiku_table`.
pub fn load_haiku_table(file_path: &Path) -> Result<Vec<ParsedHaiku>, HaikuError> {
    let file = File::open(file_path).map_err(|e| HaikuError::io(file_path, e))?;
    read_haiku_table(BufReader::new(file))
}
