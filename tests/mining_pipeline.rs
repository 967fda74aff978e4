use std::fs;
use std::path::Path;

use dialogue_haiku::config::Config;
use dialogue_haiku::haiku_io::load_haiku_table;
use dialogue_haiku::mining::{HaikuSampler, Lexicon, SampleFilter, SyllableResolver};
use dialogue_haiku::parsing::{load_script_lines, EpisodeCatalog};
use dialogue_haiku::pipeline::{mine_records, run_mining, run_sampling, MiningArgs, SamplingArgs};
use dialogue_haiku::HaikuError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

const SCRIPT: &str = "id,episode_id,number,raw_character_text,speaking_line,spoken_words
1,1,10,Lisa Simpson,true,The old pond is still. A frog jumps into the pond. Splash! Silence again.
2,1,11,,false,
3,2,4,Homer Simpson,true,\"Mr. Burns says excellent, smithers, release the old hounds now at once please.\"
4,3,7,Marge Simpson,true,the old pond is still a frog jumps into the pond splash silence again
";

const EPISODES: &str = "id,title,season,number_in_season
1,Pond Life,2,3
2,Hound Day,4,1
3,Pond Life Again,9,14
";

const OVERRIDES: &str = r#"{
    "the": 1, "old": 1, "pond": 1, "is": 1, "still": 1, "a": 1, "frog": 1,
    "jumps": 1, "into": 2, "splash": 1, "silence": 2, "again": 2,
    "mr": 1, "burns": 1, "says": 1, "excellent": 3, "smithers": 2,
    "release": 2, "hounds": 1, "now": 1, "at": 1, "once": 1, "please": 1
}"#;

fn write_fixture(dir: &Path) -> Config {
    let script = dir.join("script_lines.csv");
    let episodes = dir.join("episodes.csv");
    let overrides = dir.join("overrides.json");
    fs::write(&script, SCRIPT).unwrap();
    fs::write(&episodes, EPISODES).unwrap();
    fs::write(&overrides, OVERRIDES).unwrap();

    let toml = format!(
        r#"
[corpus]
script_lines_path = "{}"
episodes_path = "{}"

[lexicon]
overrides_path = "{}"

[output]
table_path = "{}"
"#,
        script.display(),
        episodes.display(),
        overrides.display(),
        dir.join("haiku_table.csv").display()
    );
    Config::from_toml_str(&toml).unwrap()
}

#[test]
fn test_mine_records_from_loaded_corpus() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(dir.path());

    let lexicon = Lexicon::load(&config.lexicon).unwrap();
    let resolver = SyllableResolver::new(&lexicon);
    let records =
        load_script_lines(config.corpus.script_lines_path.as_deref().unwrap(), true).unwrap();
    assert_eq!(records.len(), 3);

    let catalog = EpisodeCatalog::load(config.corpus.episodes_path.as_deref().unwrap()).unwrap();
    let mined = mine_records(&config, &resolver, &records, Some(&catalog)).unwrap();

    // Pond haiku split over four fragments, the hounds line (skips the
    // first cut) and the single-fragment pond line.
    assert_eq!(mined.fragments, 6);
    assert_eq!(mined.stats.windows_matched, 3);
    assert_eq!(mined.stats.rejected_unparsable, 1);
    assert_eq!(mined.haikus.len(), 2);
    assert_eq!(mined.with_metadata, 2);

    assert_eq!(mined.haikus[0].syllables, vec![5, 7, 1, 4]);
    assert_eq!(mined.haikus[0].group_id, 1);
    assert_eq!(mined.haikus[1].syllables, vec![17]);
    assert_eq!(mined.haikus[1].season(), Some(9));
}

#[test]
fn test_mining_run_writes_table_that_samples_by_era() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(dir.path());

    let summary = run_mining(&config, &MiningArgs::default()).unwrap();
    assert_eq!(summary.records, 3);
    assert_eq!(summary.stats.haikus, 2);
    assert!(summary.table_path.is_file());

    let corpus = load_haiku_table(&summary.table_path).unwrap();
    assert_eq!(corpus.len(), 2);

    let lexicon = Lexicon::load(&config.lexicon).unwrap();
    let resolver = SyllableResolver::new(&lexicon);
    let sampler = HaikuSampler::new(&resolver, config.mining.pattern.clone());
    let filter = SampleFilter {
        shapes: None,
        era_cutoff: Some(5),
    };
    let mut rng = StdRng::seed_from_u64(11);
    let sampled = sampler.sample(&corpus, &filter, &mut rng).unwrap();

    assert_eq!(sampled.haiku.group_id, 1);
    assert_eq!(
        sampled.lines,
        vec![
            "The old pond is still".to_string(),
            "A frog jumps into the pond".to_string(),
            "Splash Silence again".to_string(),
        ]
    );
}

#[test]
fn test_run_sampling_mines_when_table_is_missing() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(dir.path());
    let table = dir.path().join("fresh_table.csv");

    let args = SamplingArgs {
        table_path: Some(table.clone()),
        shapes: Some(vec![vec![17]]),
        seed: Some(3),
        ..SamplingArgs::default()
    };
    let sampled = run_sampling(&config, &args).unwrap();
    assert!(table.is_file());
    assert_eq!(sampled.haiku.group_id, 3);
    assert_eq!(sampled.lines.len(), 3);
    assert_eq!(sampled.lines[2], "splash silence again");
}

#[test]
fn test_sampling_with_no_survivors_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(dir.path());
    run_mining(&config, &MiningArgs::default()).unwrap();

    let args = SamplingArgs {
        era_cutoff: Some(1),
        seed: Some(1),
        ..SamplingArgs::default()
    };
    let err = run_sampling(&config, &args).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<HaikuError>(),
        Some(HaikuError::EmptyCandidateSet)
    ));
}
