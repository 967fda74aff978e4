pub mod estimator;
pub mod lexicon;
pub mod miner;
pub mod preprocessor;
pub mod sampler;
pub mod syllables;

pub use lexicon::{Lexicon, SyllableResolver, SyllableSource};
pub use miner::{HaikuMiner, MiningResult, MiningStats};
pub use preprocessor::Preprocessor;
pub use sampler::{split_lines, HaikuSampler, SampleFilter, SampledHaiku};
pub use syllables::{count_line, cumulative_counts, is_parsable};
