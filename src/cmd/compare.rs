use super::RulesFormatArgs;
use crate::reports;
use clap::Args;
use keycomfort::api::compare_layouts;
use keycomfort::config::Config;
use keycomfort::error::KcResult;
use keycomfort::loader;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub config: Config,

    #[command(flatten)]
    pub format: RulesFormatArgs,

    #[arg(long, required = true, num_args = 1..)]
    pub rules: Vec<PathBuf>,

    #[arg(long)]
    pub words: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: CompareArgs, config: &Config) -> KcResult<()> {
    let layouts = args
        .rules
        .iter()
        .map(|path| args.format.load(path))
        .collect::<KcResult<Vec<_>>>()?;
    let words = loader::load_words(&args.words)?;

    let results = compare_layouts(&layouts, &words, config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        reports::print_comparison_report(&results);
    }
    Ok(())
}
