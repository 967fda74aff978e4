// Haiku mining over transcribed dialogue.
//
// The pipeline runs leaf first: lexicon -> line counter -> preprocessor ->
// miner -> sampler, with CSV adapters on either side and a publish step at
// the end.

pub mod config;
pub mod error;
pub mod types {
    pub mod dialogue;
}
pub mod parsing;
pub mod mining;
pub mod haiku_io;
pub mod publish;
pub mod pipeline;

pub use error::HaikuError;
pub use types::dialogue::{
    DialogueRecord, EpisodeMeta, Fragment, HaikuCandidate, ParsedHaiku, SyllablePattern,
};
