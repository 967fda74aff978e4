use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::HaikuError;
use crate::haiku_io::{load_haiku_table, save_haiku_table};
use crate::mining::{
    HaikuMiner, HaikuSampler, Lexicon, MiningStats, Preprocessor, SampleFilter, SampledHaiku,
    SyllableResolver,
};
use crate::parsing::script_csv::{load_script_lines, EpisodeCatalog};
use crate::publish::{publish_haiku, ConsolePoster, PostFormat};
use crate::types::dialogue::{DialogueRecord, ParsedHaiku};

#[derive(Debug, Clone, Default)]
pub struct MiningArgs {
    /// Overrides `output.table_path` when set.
    pub output_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct SamplingArgs {
    pub table_path: Option<PathBuf>,
    pub era_cutoff: Option<u32>,
    pub shapes: Option<Vec<Vec<u32>>>,
    pub seed: Option<u64>,
    pub add_metadata: bool,
}

#[derive(Debug, Clone)]
pub struct MiningSummary {
    pub records: usize,
    pub fragments: usize,
    pub stats: MiningStats,
    pub with_metadata: usize,
    pub table_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct MinedCorpus {
    pub haikus: Vec<ParsedHaiku>,
    pub fragments: usize,
    pub stats: MiningStats,
    pub with_metadata: usize,
}

/// Preprocess and mine already-loaded records. Pure in-memory step.
pub fn mine_records(
    config: &Config,
    resolver: &SyllableResolver,
    records: &[DialogueRecord],
    catalog: Option<&EpisodeCatalog>,
) -> Result<MinedCorpus, HaikuError> {
    let preprocessor = Preprocessor::from_config(&config.mining)?;
    let fragments = preprocessor.to_fragments(records, resolver);
    info!(fragments = fragments.len(), "corpus split into fragments");

    let miner = HaikuMiner::from_config(resolver, &config.mining);
    let mut result = miner.mine(&fragments);
    let with_metadata = match catalog {
        Some(catalog) => catalog.attach(&mut result.haikus),
        None => 0,
    };
    Ok(MinedCorpus {
        haikus: result.haikus,
        fragments: fragments.len(),
        stats: result.stats,
        with_metadata,
    })
}

pub fn run_mining(config: &Config, args: &MiningArgs) -> Result<MiningSummary, Box<dyn Error>> {
    info!("starting haiku mining run");
    let lexicon = Lexicon::load(&config.lexicon)?;
    let resolver = SyllableResolver::new(&lexicon);

    let script_path = config
        .corpus
        .script_lines_path
        .as_ref()
        .ok_or("corpus.script_lines_path is not set")?;
    let records = load_script_lines(script_path, config.corpus.speaking_only)?;

    let catalog = match &config.corpus.episodes_path {
        Some(path) => Some(EpisodeCatalog::load(path)?),
        None => {
            warn!("no episodes table configured, haikus will carry no metadata");
            None
        }
    };

    let mined = mine_records(config, &resolver, &records, catalog.as_ref())?;

    let table_path = args
        .output_path
        .clone()
        .unwrap_or_else(|| config.output.table_path.clone());
    save_haiku_table(&mined.haikus, &table_path)?;
    info!(
        haikus = mined.haikus.len(),
        path = %table_path.display(),
        "haiku table saved"
    );

    Ok(MiningSummary {
        records: records.len(),
        fragments: mined.fragments,
        stats: mined.stats,
        with_metadata: mined.with_metadata,
        table_path,
    })
}

pub fn sample_filter(config: &Config, args: &SamplingArgs) -> SampleFilter {
    SampleFilter {
        shapes: args.shapes.clone().or_else(|| config.sampling.shapes.clone()),
        era_cutoff: args.era_cutoff.or(config.sampling.era_cutoff),
    }
}

/// Sample one haiku from the saved table, mining first if the table is missing,
/// and post it to the console.
pub fn run_sampling(config: &Config, args: &SamplingArgs) -> Result<SampledHaiku, Box<dyn Error>> {
    let lexicon = Lexicon::load(&config.lexicon)?;
    let resolver = SyllableResolver::new(&lexicon);

    let table_path = args
        .table_path
        .clone()
        .unwrap_or_else(|| config.output.table_path.clone());
    if !table_path.exists() {
        info!(path = %table_path.display(), "no haiku table yet, mining first");
        run_mining(
            config,
            &MiningArgs {
                output_path: Some(table_path.clone()),
            },
        )?;
    }
    let corpus = load_haiku_table(&table_path)?;
    info!(haikus = corpus.len(), "haiku table loaded");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sampler = HaikuSampler::new(&resolver, config.mining.pattern.clone());
    let sampled = sampler.sample(&corpus, &sample_filter(config, args), &mut rng)?;

    let format = PostFormat {
        add_metadata: args.add_metadata || config.sampling.add_metadata,
    };
    let mut poster = ConsolePoster::default();
    publish_haiku(&sampled, format, &mut poster, None, &mut rng)?;
    Ok(sampled)
}
