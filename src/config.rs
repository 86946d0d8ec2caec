use crate::comfort::{CrossHandPolicy, FingerOrderTable};
use crate::consts::{
    DEFAULT_BATCH_SIZE, DEFAULT_CHUNK_SIZE, DEFAULT_EXAMPLE_LIMIT, DEFAULT_MAX_CHARS,
    DEFAULT_MAX_WORDS, DEFAULT_PROGRESS_EVERY, DEFAULT_TOP_SEQUENCES,
};
use crate::error::{KcResult, KeyComfortError};
use crate::layout::{ModifierFinger, ModifierTable};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub limits: AnalysisLimits,
    #[command(flatten)]
    pub comfort: ComfortSettings,
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisLimits {
    /// Largest word list the bounded entry point accepts.
    #[arg(long, default_value_t = DEFAULT_MAX_WORDS)]
    pub max_words: usize,
    /// Largest text (in characters) the bounded entry point accepts.
    #[arg(long, default_value_t = DEFAULT_MAX_CHARS)]
    pub max_chars: usize,

    // Streaming
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
    #[arg(long, default_value_t = DEFAULT_PROGRESS_EVERY)]
    pub progress_every: usize,
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
            max_chars: DEFAULT_MAX_CHARS,
            batch_size: DEFAULT_BATCH_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComfortSettings {
    /// How runs spanning both hands are scored.
    #[arg(long, value_enum, default_value_t = CrossHandPolicy::Uncomfortable)]
    pub cross_hand: CrossHandPolicy,
    #[arg(long, default_value_t = DEFAULT_EXAMPLE_LIMIT)]
    pub example_limit: usize,
    #[arg(long, default_value_t = DEFAULT_TOP_SEQUENCES)]
    pub top_sequences: usize,

    // Finger ranks, outermost = 1. Thumb is unranked unless listed.
    #[arg(long, default_value = "pinky:1,ring:2,middle:3,index:4")]
    pub finger_order: String,

    // `pinky` = same hand as the key, `right_pinky` = always that finger.
    #[arg(long, default_value = "pinky")]
    pub shift_finger: String,
    #[arg(long, default_value = "right_pinky")]
    pub alt_finger: String,
}

impl Default for ComfortSettings {
    fn default() -> Self {
        Self {
            cross_hand: CrossHandPolicy::Uncomfortable,
            example_limit: DEFAULT_EXAMPLE_LIMIT,
            top_sequences: DEFAULT_TOP_SEQUENCES,
            finger_order: "pinky:1,ring:2,middle:3,index:4".to_string(),
            shift_finger: "pinky".to_string(),
            alt_finger: "right_pinky".to_string(),
        }
    }
}

impl ComfortSettings {
    pub fn finger_order_table(&self) -> KcResult<FingerOrderTable> {
        self.finger_order.parse()
    }

    pub fn modifier_table(&self) -> KcResult<ModifierTable> {
        let parse = |s: &str, name: &str| {
            ModifierFinger::from_str(s).map_err(|e| {
                KeyComfortError::Config(format!("--{}: {}", name, e))
            })
        };
        Ok(ModifierTable {
            shift: parse(&self.shift_finger, "shift-finger")?,
            alt: parse(&self.alt_finger, "alt-finger")?,
        })
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KcResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            KeyComfortError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Copies every argument the user typed onto `self`; defaults from clap
    /// never override values loaded from a file.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(limits.max_words);
        update_if_present!(limits.max_chars);
        update_if_present!(limits.batch_size);
        update_if_present!(limits.chunk_size);
        update_if_present!(limits.progress_every);

        update_if_present!(comfort.cross_hand);
        update_if_present!(comfort.example_limit);
        update_if_present!(comfort.top_sequences);
        update_if_present!(comfort.finger_order);
        update_if_present!(comfort.shift_finger);
        update_if_present!(comfort.alt_finger);
    }
}
