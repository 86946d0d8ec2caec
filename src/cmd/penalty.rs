use super::RulesFormatArgs;
use crate::reports;
use clap::Args;
use keycomfort::analysis::{
    analyze_text, analyze_words, try_analyze_text_stream, try_analyze_word_stream, TracingProgress,
};
use keycomfort::config::Config;
use keycomfort::error::{KcResult, KeyComfortError};
use keycomfort::loader::{self, TextChunks, WordBatches};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct PenaltyArgs {
    #[command(flatten)]
    pub config: Config,

    #[command(flatten)]
    pub format: RulesFormatArgs,

    #[arg(long)]
    pub rules: PathBuf,

    /// Whitespace-separated word list.
    #[arg(long, conflicts_with = "text", required_unless_present = "text")]
    pub words: Option<PathBuf>,

    /// Continuous text.
    #[arg(long)]
    pub text: Option<PathBuf>,

    /// Read the input in batches instead of all at once (no size limit).
    #[arg(long, default_value_t = false)]
    pub stream: bool,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: PenaltyArgs, config: &Config) -> KcResult<()> {
    let layout = args.format.load(&args.rules)?;
    let limits = &config.limits;

    let result = match (&args.words, &args.text) {
        (Some(path), _) if args.stream => {
            let hint = loader::count_words(BufReader::new(File::open(path)?))?;
            let mut progress = TracingProgress::new("words", limits.progress_every);
            try_analyze_word_stream(
                &layout,
                WordBatches::open(path, limits.batch_size)?,
                Some(hint),
                &mut progress,
            )?
        }
        (Some(path), _) => analyze_words(&layout, &loader::load_words(path)?, limits)?,
        (None, Some(path)) if args.stream => {
            let mut progress = TracingProgress::new("text", limits.progress_every);
            try_analyze_text_stream(
                &layout,
                TextChunks::open(path, limits.chunk_size)?,
                None,
                &mut progress,
            )?
        }
        (None, Some(path)) => analyze_text(&layout, &loader::load_text(path)?, limits)?,
        (None, None) => {
            return Err(KeyComfortError::Config(
                "either --words or --text is required".to_string(),
            ))
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        reports::print_penalty_report(&result);
    }
    Ok(())
}
