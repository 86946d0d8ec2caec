pub mod finger;
pub mod rules;
pub mod stats;

pub use self::finger::{
    Finger, FingerId, Hand, KeyPosition, Modifier, ModifierFinger, ModifierTable,
};
pub use self::rules::{KeyAssignment, LayoutModel, LayoutRule, RawRuleTable};
pub use self::stats::{LayoutStats, ModifierStats};
