use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Hand {
    Left,
    Right,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

/// A canonical finger tag: hand plus finger class, written `left_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FingerId {
    pub hand: Hand,
    pub finger: Finger,
}

impl FingerId {
    pub const fn new(hand: Hand, finger: Finger) -> Self {
        Self { hand, finger }
    }
}

impl fmt::Display for FingerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.hand, self.finger)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerTagError(pub String);

impl fmt::Display for FingerTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not a finger tag (expected <left|right>_<thumb|index|middle|ring|pinky>)",
            self.0
        )
    }
}

impl FromStr for FingerId {
    type Err = FingerTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        let (hand, finger) = tag
            .split_once('_')
            .ok_or_else(|| FingerTagError(tag.to_string()))?;
        let hand = Hand::from_str(hand).map_err(|_| FingerTagError(tag.to_string()))?;
        let finger = Finger::from_str(finger).map_err(|_| FingerTagError(tag.to_string()))?;
        Ok(FingerId { hand, finger })
    }
}

// Finger ids appear as map keys in exported results, so they travel as plain strings.
impl Serialize for FingerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FingerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A key that must be held while the symbol is typed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Shift,
    Alt,
}

/// Physical row/column of a key, used for reach statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPosition {
    pub row: i32,
    pub column: i32,
}

impl KeyPosition {
    pub fn manhattan(&self, other: &KeyPosition) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }
}

/// Which finger performs the implicit press of a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierFinger {
    /// The given finger on the same hand as the base symbol.
    SameHand(Finger),
    /// Always this finger, regardless of the base symbol.
    Fixed(FingerId),
}

impl ModifierFinger {
    pub fn resolve(self, base_hand: Hand) -> FingerId {
        match self {
            ModifierFinger::SameHand(finger) => FingerId::new(base_hand, finger),
            ModifierFinger::Fixed(id) => id,
        }
    }
}

impl FromStr for ModifierFinger {
    type Err = FingerTagError;

    /// `pinky` -> same-hand pinky, `right_pinky` -> fixed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(finger) = Finger::from_str(s) {
            return Ok(ModifierFinger::SameHand(finger));
        }
        FingerId::from_str(s).map(ModifierFinger::Fixed)
    }
}

/// Default fingers for implicit modifier presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierTable {
    pub shift: ModifierFinger,
    pub alt: ModifierFinger,
}

impl Default for ModifierTable {
    fn default() -> Self {
        Self {
            shift: ModifierFinger::SameHand(Finger::Pinky),
            alt: ModifierFinger::Fixed(FingerId::new(Hand::Right, Finger::Pinky)),
        }
    }
}

impl ModifierTable {
    pub fn finger_for(&self, modifier: Modifier, base_hand: Hand) -> FingerId {
        match modifier {
            Modifier::Shift => self.shift.resolve(base_hand),
            Modifier::Alt => self.alt.resolve(base_hand),
        }
    }
}
