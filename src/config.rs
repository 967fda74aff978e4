use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HaikuError;
use crate::types::dialogue::SyllablePattern;

pub const DEFAULT_MAX_WINDOW: usize = 16;

pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "Mr.", "Mrs.", "Ms.", "Dr.", "St.", "Jr.", "Sr.", "Prof.", "Rev.", "Capt.", "Lt.", "Sgt.",
    "Mt.", "vs.", "F.B.I.", "C.I.A.", "U.S.A.", "U.S.", "T.V.", "P.S.", "A.M.", "P.M.",
];

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub corpus: CorpusConfig,
    pub lexicon: LexiconConfig,
    pub mining: MiningConfig,
    pub output: OutputConfig,
    pub sampling: SamplingConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CorpusConfig {
    pub script_lines_path: Option<PathBuf>,
    pub episodes_path: Option<PathBuf>,
    pub speaking_only: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        CorpusConfig {
            script_lines_path: None,
            episodes_path: None,
            speaking_only: true,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct LexiconConfig {
    pub overrides_path: Option<PathBuf>,
    pub pronouncing_path: Option<PathBuf>,
    pub secondary_path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MiningConfig {
    /// Longest run of fragments a single haiku may span.
    pub max_window: usize,
    pub pattern: SyllablePattern,
    pub split_on_colon: bool,
    pub split_on_semicolon: bool,
    pub abbreviations: Vec<String>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        MiningConfig {
            max_window: DEFAULT_MAX_WINDOW,
            pattern: SyllablePattern::haiku(),
            split_on_colon: false,
            split_on_semicolon: false,
            abbreviations: DEFAULT_ABBREVIATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub table_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            table_path: PathBuf::from("haiku_table.csv"),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SamplingConfig {
    pub era_cutoff: Option<u32>,
    pub shapes: Option<Vec<Vec<u32>>>,
    pub add_metadata: bool,
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self, HaikuError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HaikuError> {
        if self.mining.max_window == 0 {
            return Err(HaikuError::InvalidConfig(
                "mining.max_window must be at least 1".to_string(),
            ));
        }
        if let Some(path) = &self.corpus.script_lines_path {
            if !path.is_file() {
                return Err(HaikuError::InvalidConfig(format!(
                    "corpus.script_lines_path ('{}') is not a file",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

pub fn load_config_from_file(file_path: &Path) -> Result<Config, HaikuError> {
    let contents = fs::read_to_string(file_path).map_err(|e| HaikuError::io(file_path, e))?;
    Config::from_toml_str(&contents)
}
