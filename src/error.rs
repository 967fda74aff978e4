use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HaikuError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid syllable pattern: {0}")]
    InvalidPattern(String),

    /// A persisted haiku row whose syllable list cannot be read back.
    #[error("row {row}: malformed syllable list '{value}'")]
    MalformedSyllableList { row: usize, value: String },

    #[error("no haiku left after filtering")]
    EmptyCandidateSet,

    #[error("publish failed: {0}")]
    Publish(String),
}

impl HaikuError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HaikuError::Io {
            path: path.into(),
            source,
        }
    }
}
