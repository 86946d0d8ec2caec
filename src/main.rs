use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use keycomfort::config::Config;
use std::process;
use tracing::Level;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with limits and comfort settings; explicit flags win.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Total and average typing penalty over a corpus.
    Penalty(cmd::penalty::PenaltyArgs),
    /// Comfort histogram of 2..5 symbol runs.
    Comfort(cmd::comfort::ComfortArgs),
    /// Several layouts over the same word list.
    Compare(cmd::compare::CompareArgs),
    /// Static finger load, reach and modifier statistics.
    Layout(cmd::layout::LayoutArgs),
}

fn main() {
    // Raw matches tell user input apart from defaults
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let cli_config = match &cli.command {
        Commands::Penalty(args) => &args.config,
        Commands::Comfort(args) => &args.config,
        Commands::Compare(args) => &args.config,
        Commands::Layout(args) => &args.config,
    };

    let config = match &cli.config {
        Some(path) => {
            let mut file_config = Config::load_from_file(path).unwrap_or_else(|e| {
                eprintln!("❌ {}", e);
                process::exit(1);
            });
            // Flags live on the subcommand's matches, not the root
            if let Some((_, sub_matches)) = matches.subcommand() {
                file_config.merge_from_cli(cli_config, sub_matches);
            }
            file_config
        }
        None => cli_config.clone(),
    };

    let outcome = match cli.command {
        Commands::Penalty(args) => cmd::penalty::run(args, &config),
        Commands::Comfort(args) => cmd::comfort::run(args, &config),
        Commands::Compare(args) => cmd::compare::run(args, &config),
        Commands::Layout(args) => cmd::layout::run(args, &config),
    };

    if let Err(e) = outcome {
        eprintln!("\n❌ {}", e);
        process::exit(1);
    }
}
