pub mod comfort;
pub mod compare;
pub mod layout;
pub mod penalty;

use clap::Args;
use keycomfort::error::{KcResult, KeyComfortError};
use keycomfort::layout::LayoutModel;
use keycomfort::loader::{self, RulesFormat};
use std::path::Path;

/// How rule files are read.
#[derive(Args, Debug, Clone)]
pub struct RulesFormatArgs {
    #[arg(long, value_enum, default_value_t = RulesFormat::Json)]
    pub rules_format: RulesFormat,

    /// Field separator for CSV rule tables (`,` or `;`).
    #[arg(long, default_value_t = ',')]
    pub csv_delimiter: char,
}

impl RulesFormatArgs {
    pub fn load(&self, path: &Path) -> KcResult<LayoutModel> {
        if !self.csv_delimiter.is_ascii() {
            return Err(KeyComfortError::Config(format!(
                "CSV delimiter '{}' must be a single ASCII character",
                self.csv_delimiter
            )));
        }
        loader::load_layout(path, self.rules_format, self.csv_delimiter as u8)
    }
}
