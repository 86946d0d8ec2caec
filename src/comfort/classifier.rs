use crate::consts::{MAX_SEQUENCE_LEN, MIN_SEQUENCE_LEN};
use crate::error::{KcResult, KeyComfortError};
use crate::layout::{Finger, Hand, KeyAssignment, LayoutModel, ModifierTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

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
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Comfort {
    Comfortable,
    Partial,
    Uncomfortable,
}

/// Which hands a run is typed with, modifier presses included.
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
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HandSpan {
    Left,
    Right,
    Both,
}

impl From<Hand> for HandSpan {
    fn from(h: Hand) -> Self {
        match h {
            Hand::Left => HandSpan::Left,
            Hand::Right => HandSpan::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ComfortReason {
    /// Run spans both hands, scored uncomfortable.
    DifferentHands,
    /// Run spans both hands, scored comfortable.
    HandAlternation,
    SameFinger,
    OutsideToInside,
    InsideToOutside,
    DirectionChanges,
}

/// Movement between two consecutive presses on one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    /// Towards the index finger.
    OutsideToInside,
    /// Towards the pinky.
    InsideToOutside,
    SameFinger,
}

/// How runs that use both hands are scored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CrossHandPolicy {
    #[default]
    Uncomfortable,
    Comfortable,
}

/// Rank of each finger class, outermost = 1. Unranked fingers make a run's
/// direction unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerOrderTable {
    ranks: [Option<u8>; 5],
}

impl Default for FingerOrderTable {
    fn default() -> Self {
        let mut table = Self { ranks: [None; 5] };
        table.set(Finger::Pinky, Some(1));
        table.set(Finger::Ring, Some(2));
        table.set(Finger::Middle, Some(3));
        table.set(Finger::Index, Some(4));
        table
    }
}

impl FingerOrderTable {
    fn slot(finger: Finger) -> usize {
        match finger {
            Finger::Thumb => 0,
            Finger::Index => 1,
            Finger::Middle => 2,
            Finger::Ring => 3,
            Finger::Pinky => 4,
        }
    }

    pub fn set(&mut self, finger: Finger, rank: Option<u8>) {
        self.ranks[Self::slot(finger)] = rank;
    }

    #[inline(always)]
    pub fn rank(&self, finger: Finger) -> Option<u8> {
        self.ranks[Self::slot(finger)]
    }

    pub fn direction(&self, from: Finger, to: Finger) -> Option<Direction> {
        let (a, b) = (self.rank(from)?, self.rank(to)?);
        Some(match a.cmp(&b) {
            std::cmp::Ordering::Less => Direction::OutsideToInside,
            std::cmp::Ordering::Greater => Direction::InsideToOutside,
            std::cmp::Ordering::Equal => Direction::SameFinger,
        })
    }
}

impl FromStr for FingerOrderTable {
    type Err = KeyComfortError;

    /// `pinky:1,ring:2,middle:3,index:4`. Fingers not listed are unranked.
    fn from_str(s: &str) -> KcResult<Self> {
        let mut table = Self { ranks: [None; 5] };
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, rank) = part.split_once(':').ok_or_else(|| {
                KeyComfortError::Config(format!("finger order entry '{}' is not finger:rank", part))
            })?;
            let finger = Finger::from_str(name.trim()).map_err(|_| {
                KeyComfortError::Config(format!("unknown finger '{}' in finger order", name))
            })?;
            let rank: u8 = rank.trim().parse().map_err(|_| {
                KeyComfortError::Config(format!("invalid rank '{}' for {}", rank, finger))
            })?;
            table.set(finger, Some(rank));
        }
        Ok(table)
    }
}

impl fmt::Display for FingerOrderTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Finger::iter()
            .filter_map(|finger| self.rank(finger).map(|r| format!("{}:{}", finger, r)))
            .collect();
        f.write_str(&parts.join(","))
    }
}

/// Verdict for one substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceClassification {
    pub sequence: String,
    pub length: usize,
    pub hand: HandSpan,
    pub comfort: Comfort,
    pub reason: ComfortReason,
    pub has_modifiers: bool,
    /// Number of adjacent direction flips; non-zero only for mixed runs.
    pub direction_changes: usize,
}

pub struct SequenceClassifier<'a> {
    layout: &'a LayoutModel,
    order: FingerOrderTable,
    modifiers: ModifierTable,
    cross_hand: CrossHandPolicy,
}

impl<'a> SequenceClassifier<'a> {
    pub fn new(layout: &'a LayoutModel) -> Self {
        Self {
            layout,
            order: FingerOrderTable::default(),
            modifiers: ModifierTable::default(),
            cross_hand: CrossHandPolicy::default(),
        }
    }

    pub fn with_finger_order(mut self, order: FingerOrderTable) -> Self {
        self.order = order;
        self
    }

    pub fn with_modifiers(mut self, modifiers: ModifierTable) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_cross_hand(mut self, policy: CrossHandPolicy) -> Self {
        self.cross_hand = policy;
        self
    }

    pub fn layout(&self) -> &LayoutModel {
        self.layout
    }

    /// Classifies one run of 2..=5 symbols. `None` when the run is out of
    /// range, touches an unmapped symbol, or its direction is unknown.
    pub fn classify_sequence(&self, sequence: &str) -> Option<SequenceClassification> {
        let chars: Vec<char> = sequence.chars().collect();
        if !(MIN_SEQUENCE_LEN..=MAX_SEQUENCE_LEN).contains(&chars.len()) {
            return None;
        }
        let keys = chars
            .iter()
            .map(|&c| self.layout.assignment(c))
            .collect::<Option<Vec<_>>>()?;
        self.classify_window(&chars, &keys)
    }

    /// Feeds every classifiable substring of `word` (lengths 2..=5, shortest
    /// first, left to right) to `sink`.
    pub fn for_each_sequence<F>(&self, word: &str, mut sink: F)
    where
        F: FnMut(SequenceClassification),
    {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() < MIN_SEQUENCE_LEN {
            return;
        }
        let keys: Vec<Option<&KeyAssignment>> =
            chars.iter().map(|&c| self.layout.assignment(c)).collect();

        for len in MIN_SEQUENCE_LEN..=MAX_SEQUENCE_LEN.min(chars.len()) {
            for start in 0..=chars.len() - len {
                let window = &keys[start..start + len];
                let Some(resolved) = window.iter().copied().collect::<Option<Vec<_>>>() else {
                    continue;
                };
                if let Some(c) = self.classify_window(&chars[start..start + len], &resolved) {
                    sink(c);
                }
            }
        }
    }

    pub fn classify_word(&self, word: &str) -> Vec<SequenceClassification> {
        let mut out = Vec::new();
        self.for_each_sequence(word, |c| out.push(c));
        out
    }

    fn classify_window(
        &self,
        chars: &[char],
        keys: &[&KeyAssignment],
    ) -> Option<SequenceClassification> {
        let first_hand = keys.first()?.finger.hand;
        let has_modifiers = keys.iter().any(|k| !k.modifiers.is_empty());

        // Implicit modifier presses count for hand uniformity only.
        let one_hand = keys.iter().all(|k| {
            k.finger.hand == first_hand
                && k.modifiers
                    .iter()
                    .all(|&m| self.modifiers.finger_for(m, k.finger.hand).hand == first_hand)
        });

        let verdict = |hand: HandSpan,
                       comfort: Comfort,
                       reason: ComfortReason,
                       direction_changes: usize| SequenceClassification {
            sequence: chars.iter().collect(),
            length: chars.len(),
            hand,
            comfort,
            reason,
            has_modifiers,
            direction_changes,
        };

        if !one_hand {
            let (comfort, reason) = match self.cross_hand {
                CrossHandPolicy::Uncomfortable => {
                    (Comfort::Uncomfortable, ComfortReason::DifferentHands)
                }
                CrossHandPolicy::Comfortable => (Comfort::Comfortable, ComfortReason::HandAlternation),
            };
            return Some(verdict(HandSpan::Both, comfort, reason, 0));
        }

        let hand = HandSpan::from(first_hand);
        let first_finger = keys[0].finger;
        if keys.iter().all(|k| k.finger == first_finger) {
            return Some(verdict(
                hand,
                Comfort::Uncomfortable,
                ComfortReason::SameFinger,
                0,
            ));
        }

        let directions = keys
            .windows(2)
            .map(|w| self.order.direction(w[0].finger.finger, w[1].finger.finger))
            .collect::<Option<Vec<_>>>()?;

        let changes = directions.windows(2).filter(|d| d[0] != d[1]).count();
        if changes > 0 {
            return Some(verdict(
                hand,
                Comfort::Uncomfortable,
                ComfortReason::DirectionChanges,
                changes,
            ));
        }

        Some(match directions[0] {
            Direction::OutsideToInside => {
                verdict(hand, Comfort::Comfortable, ComfortReason::OutsideToInside, 0)
            }
            Direction::InsideToOutside => {
                verdict(hand, Comfort::Partial, ComfortReason::InsideToOutside, 0)
            }
            // Distinct fingers sharing a rank.
            Direction::SameFinger => {
                verdict(hand, Comfort::Uncomfortable, ComfortReason::SameFinger, 0)
            }
        })
    }
}
