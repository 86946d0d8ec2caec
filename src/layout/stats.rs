use super::finger::{FingerId, KeyPosition, Modifier, ModifierTable};
use super::rules::LayoutModel;
use crate::consts::{MODIFIER_LOAD_WEIGHT, REACH_NORMALIZER};
use serde::Serialize;
use std::collections::BTreeMap;

/// How many symbols in the table need which modifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModifierStats {
    pub total_symbols: usize,
    pub with_shift: usize,
    pub with_alt: usize,
    pub with_both: usize,
    pub no_modifiers: usize,
    pub shift_percent: f64,
    pub alt_percent: f64,
}

/// Static properties of a layout, independent of any corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutStats {
    /// Share of symbols (in percent) each finger is responsible for.
    pub finger_load: BTreeMap<FingerId, f64>,
    pub top_two_load: f64,
    /// Largest row + column distance between two keys of the same finger.
    pub max_reach: BTreeMap<FingerId, u32>,
    pub overall_max_reach: u32,
    /// Lower is better.
    pub goodness_score: f64,
    /// `1 / (1 + goodness_score)`, higher is better.
    pub normalized_score: f64,
    pub modifiers: ModifierStats,
}

impl LayoutStats {
    pub fn compute(layout: &LayoutModel, modifier_fingers: &ModifierTable) -> Self {
        let mut weights: BTreeMap<FingerId, f64> = BTreeMap::new();
        let mut positions: BTreeMap<FingerId, Vec<KeyPosition>> = BTreeMap::new();

        for (_, rule) in layout.iter_sorted() {
            let Some(a) = rule.assignment() else {
                continue;
            };
            *weights.entry(a.finger).or_default() += 1.0;
            if let Some(pos) = a.position {
                positions.entry(a.finger).or_default().push(pos);
            }
            for &m in &a.modifiers {
                let f = modifier_fingers.finger_for(m, a.finger.hand);
                *weights.entry(f).or_default() += MODIFIER_LOAD_WEIGHT;
            }
        }

        let total_weight: f64 = weights.values().sum();
        let finger_load: BTreeMap<FingerId, f64> = weights
            .into_iter()
            .map(|(f, w)| {
                let pct = if total_weight > 0.0 {
                    w / total_weight * 100.0
                } else {
                    0.0
                };
                (f, pct)
            })
            .collect();

        let mut ranked: Vec<f64> = finger_load.values().copied().collect();
        ranked.sort_by(|a, b| b.total_cmp(a));
        let top_two_load: f64 = ranked.iter().take(2).sum();

        let max_reach: BTreeMap<FingerId, u32> = positions
            .into_iter()
            .map(|(f, keys)| (f, max_pairwise_distance(&keys)))
            .collect();
        let overall_max_reach = max_reach.values().copied().max().unwrap_or(0);

        let goodness_score = top_two_load / 100.0 + overall_max_reach as f64 / REACH_NORMALIZER;

        Self {
            finger_load,
            top_two_load,
            max_reach,
            overall_max_reach,
            goodness_score,
            normalized_score: 1.0 / (1.0 + goodness_score),
            modifiers: ModifierStats::compute(layout),
        }
    }
}

fn max_pairwise_distance(keys: &[KeyPosition]) -> u32 {
    let mut best = 0;
    for (i, a) in keys.iter().enumerate() {
        for b in &keys[i + 1..] {
            best = best.max(a.manhattan(b));
        }
    }
    best
}

impl ModifierStats {
    pub fn compute(layout: &LayoutModel) -> Self {
        let mut stats = ModifierStats {
            total_symbols: layout.len(),
            ..Default::default()
        };

        for (_, rule) in layout.iter_sorted() {
            let mods = rule
                .assignment()
                .map(|a| a.modifiers.as_slice())
                .unwrap_or(&[]);
            let shift = mods.contains(&Modifier::Shift);
            let alt = mods.contains(&Modifier::Alt);
            match (shift, alt) {
                (true, true) => stats.with_both += 1,
                (true, false) => stats.with_shift += 1,
                (false, true) => stats.with_alt += 1,
                (false, false) => stats.no_modifiers += 1,
            }
        }

        if stats.total_symbols > 0 {
            let total = stats.total_symbols as f64;
            stats.shift_percent = stats.with_shift as f64 / total * 100.0;
            stats.alt_percent = stats.with_alt as f64 / total * 100.0;
        }
        stats
    }
}
