pub mod analysis;
pub mod api;
pub mod comfort;
pub mod config;
pub mod consts;
pub mod error;
pub mod layout;
pub mod loader;

pub use error::{KcResult, KeyComfortError};
