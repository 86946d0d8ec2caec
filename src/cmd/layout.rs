use super::RulesFormatArgs;
use crate::reports;
use clap::Args;
use keycomfort::api::layout_stats;
use keycomfort::config::Config;
use keycomfort::error::KcResult;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub config: Config,

    #[command(flatten)]
    pub format: RulesFormatArgs,

    #[arg(long)]
    pub rules: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: LayoutArgs, config: &Config) -> KcResult<()> {
    let layout = args.format.load(&args.rules)?;
    let stats = layout_stats(&layout, &config.comfort)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        reports::print_layout_report(&layout.name, &stats);
    }
    Ok(())
}
