use super::RulesFormatArgs;
use crate::reports;
use clap::Args;
use keycomfort::analysis::TracingProgress;
use keycomfort::api::build_classifier;
use keycomfort::comfort::{analyze_comfort, try_analyze_comfort_stream};
use keycomfort::config::Config;
use keycomfort::error::{KcResult, KeyComfortError};
use keycomfort::loader::{self, WordBatches};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ComfortArgs {
    #[command(flatten)]
    pub config: Config,

    #[command(flatten)]
    pub format: RulesFormatArgs,

    #[arg(long)]
    pub rules: PathBuf,

    #[arg(long)]
    pub words: PathBuf,

    #[arg(long, default_value_t = false)]
    pub stream: bool,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: ComfortArgs, config: &Config) -> KcResult<()> {
    let layout = args.format.load(&args.rules)?;
    if !layout.has_fingers() {
        return Err(KeyComfortError::Config(format!(
            "layout '{}' has no finger assignments; comfort needs [penalty, finger] rules",
            layout.name
        )));
    }
    let classifier = build_classifier(&layout, &config.comfort)?;

    let histogram = if args.stream {
        let hint = loader::count_words(BufReader::new(File::open(&args.words)?))?;
        let mut progress = TracingProgress::new("comfort", config.limits.progress_every);
        try_analyze_comfort_stream(
            &classifier,
            &config.comfort,
            WordBatches::open(&args.words, config.limits.batch_size)?,
            Some(hint),
            &mut progress,
        )?
    } else {
        let words = loader::load_words(&args.words)?;
        analyze_comfort(&classifier, &words, &config.comfort, &config.limits)?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&histogram)?);
    } else {
        reports::print_comfort_report(&histogram);
    }
    Ok(())
}
