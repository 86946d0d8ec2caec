use strum_macros::Display;
use thiserror::Error;

/// Which bound of a non-streaming entry point was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum InputUnit {
    Words,
    Characters,
}

#[derive(Error, Debug)]
pub enum KeyComfortError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Invalid rule for '{symbol}': {reason}")]
    InvalidRule { symbol: String, reason: String },

    #[error("Input too large: {size} {unit} exceeds the limit of {limit}; use the streaming variant")]
    InputTooLarge {
        unit: InputUnit,
        size: usize,
        limit: usize,
    },
}

impl KeyComfortError {
    pub(crate) fn invalid_rule(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        KeyComfortError::InvalidRule {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

pub type KcResult<T> = Result<T, KeyComfortError>;
