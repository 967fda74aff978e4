use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use dialogue_haiku::config::{self, Config};
use dialogue_haiku::mining::{count_line, cumulative_counts, Lexicon, SyllableResolver};
use dialogue_haiku::pipeline::{run_mining, run_sampling, MiningArgs, SamplingArgs};

#[derive(Parser, Debug)]
#[command(name = "dialogue-haiku", about = "Mine and sample haikus from dialogue transcripts")]
struct Cli {
    /// Path to the TOML config; defaults apply when the file is absent.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan the corpus and write the mined haiku table.
    Mine {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Pick one haiku from the table and print it.
    Sample {
        #[arg(long)]
        table: Option<PathBuf>,
        /// Only episodes up to and including this season.
        #[arg(long)]
        era_cutoff: Option<u32>,
        /// Accepted fragment shape, e.g. `5,7,5`. Repeatable.
        #[arg(long = "shape", value_parser = parse_shape)]
        shapes: Vec<Shape>,
        #[arg(long)]
        seed: Option<u64>,
        /// Append the episode label to the post.
        #[arg(long)]
        metadata: bool,
    },
    /// Print the syllable count of a line of text.
    Count { text: String },
}

/// One `--shape` value: a per-fragment syllable list.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Shape(Vec<u32>);

fn parse_shape(value: &str) -> Result<Shape, String> {
    value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .map_err(|e| format!("bad shape '{}': {}", value, e))
        })
        .collect::<Result<Vec<u32>, String>>()
        .map(Shape)
}

fn load_config(path: &Path) -> Result<Config, Box<dyn Error>> {
    if path.exists() {
        Ok(config::load_config_from_file(path)?)
    } else {
        tracing::warn!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::default())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Command::Mine { out } => {
            let summary = run_mining(&config, &MiningArgs { output_path: out })?;
            println!(
                "{} records, {} fragments, {} windows matched, {} haikus ({} with episode data) -> {}",
                summary.records,
                summary.fragments,
                summary.stats.windows_matched,
                summary.stats.haikus,
                summary.with_metadata,
                summary.table_path.display()
            );
        }
        Command::Sample {
            table,
            era_cutoff,
            shapes,
            seed,
            metadata,
        } => {
            let args = SamplingArgs {
                table_path: table,
                era_cutoff,
                shapes: if shapes.is_empty() {
                    None
                } else {
                    Some(shapes.into_iter().map(|s| s.0).collect())
                },
                seed,
                add_metadata: metadata,
            };
            run_sampling(&config, &args)?;
        }
        Command::Count { text } => {
            let lexicon = Lexicon::load(&config.lexicon)?;
            let resolver = SyllableResolver::new(&lexicon);
            println!("{}", count_line(&resolver, &text));
            println!("{:?}", cumulative_counts(&resolver, &text));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shape() {
        assert_eq!(parse_shape("5,7,5").unwrap(), Shape(vec![5, 7, 5]));
        assert_eq!(parse_shape("17").unwrap(), Shape(vec![17]));
        assert!(parse_shape("5,x").is_err());
    }

    #[test]
    fn test_cli_parses_sample_flags() {
        let cli = Cli::try_parse_from([
            "dialogue-haiku",
            "sample",
            "--shape",
            "5,7,5",
            "--shape",
            "17",
            "--era-cutoff",
            "10",
            "--metadata",
        ])
        .unwrap();
        match cli.command {
            Command::Sample {
                shapes,
                era_cutoff,
                metadata,
                ..
            } => {
                assert_eq!(shapes, vec![Shape(vec![5, 7, 5]), Shape(vec![17])]);
                assert_eq!(era_cutoff, Some(10));
                assert!(metadata);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
