use clap::{Args, CommandFactory, FromArgMatches, Parser};
use keycomfort::comfort::CrossHandPolicy;
use keycomfort::config::{AnalysisLimits, ComfortSettings, Config};
use keycomfort::error::KeyComfortError;
use keycomfort::layout::{Finger, FingerId, Hand, Modifier};
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Parser, Debug)]
struct TestCli {
    #[command(flatten)]
    config: Config,
}

fn parse_cli(args: &[&str]) -> (Config, clap::ArgMatches) {
    let mut argv = vec!["test"];
    argv.extend_from_slice(args);
    let matches = TestCli::command().get_matches_from(argv);
    let cli = TestCli::from_arg_matches(&matches).unwrap();
    (cli.config, matches)
}

#[test]
fn test_defaults_match_clap_defaults() {
    let (from_cli, _) = parse_cli(&[]);
    assert_eq!(from_cli.limits, AnalysisLimits::default());
    assert_eq!(from_cli.comfort, ComfortSettings::default());
    assert_eq!(from_cli.limits.max_words, 10_000);
    assert_eq!(from_cli.limits.max_chars, 100_000);
    assert_eq!(from_cli.comfort.example_limit, 10);
    assert_eq!(from_cli.comfort.cross_hand, CrossHandPolicy::Uncomfortable);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"limits": {{"max_words": 50}}, "comfort": {{"cross_hand": "comfortable"}}}}"#
    )
    .unwrap();

    let config = Config::load_from_file(file.path()).unwrap();
    assert_eq!(config.limits.max_words, 50);
    assert_eq!(config.limits.batch_size, 1_000);
    assert_eq!(config.comfort.cross_hand, CrossHandPolicy::Comfortable);
    assert_eq!(config.comfort.top_sequences, 20);
}

#[test]
fn test_bad_config_file_is_a_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"limits": {{"max_words": "lots"}}}}"#).unwrap();
    let err = Config::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, KeyComfortError::Config(_)));
}

#[test]
fn test_cli_overrides_only_explicit_flags() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"limits": {{"max_words": 50, "batch_size": 7}}, "comfort": {{"example_limit": 3}}}}"#
    )
    .unwrap();
    let mut config = Config::load_from_file(file.path()).unwrap();

    let (cli, matches) = parse_cli(&["--max-words", "99", "--cross-hand", "comfortable"]);
    config.merge_from_cli(&cli, &matches);

    assert_eq!(config.limits.max_words, 99);
    // File values survive clap defaults.
    assert_eq!(config.limits.batch_size, 7);
    assert_eq!(config.comfort.example_limit, 3);
    assert_eq!(config.comfort.cross_hand, CrossHandPolicy::Comfortable);
}

#[test]
fn test_finger_order_and_modifier_tables() {
    let settings = ComfortSettings {
        finger_order: "index:1,middle:2".to_string(),
        shift_finger: "left_pinky".to_string(),
        alt_finger: "thumb".to_string(),
        ..Default::default()
    };
    let order = settings.finger_order_table().unwrap();
    assert_eq!(order.rank(Finger::Index), Some(1));
    assert_eq!(order.rank(Finger::Pinky), None);

    let mods = settings.modifier_table().unwrap();
    assert_eq!(
        mods.finger_for(Modifier::Shift, Hand::Right),
        FingerId::new(Hand::Left, Finger::Pinky)
    );
    assert_eq!(
        mods.finger_for(Modifier::Alt, Hand::Right),
        FingerId::new(Hand::Right, Finger::Thumb)
    );
}

#[test]
fn test_bad_modifier_finger_is_a_config_error() {
    let settings = ComfortSettings {
        shift_finger: "elbow".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        settings.modifier_table(),
        Err(KeyComfortError::Config(_))
    ));
}

// Config must stay flattenable into any subcommand.
#[derive(Args, Debug)]
struct Nested {
    #[command(flatten)]
    config: Config,
}

#[test]
fn test_config_flattens_into_subcommands() {
    #[derive(Parser, Debug)]
    struct Outer {
        #[command(subcommand)]
        cmd: Sub,
    }
    #[derive(clap::Subcommand, Debug)]
    enum Sub {
        Run(Nested),
    }

    let outer = Outer::try_parse_from(["test", "run", "--example-limit", "4"]).unwrap();
    let Sub::Run(nested) = outer.cmd;
    assert_eq!(nested.config.comfort.example_limit, 4);
}
