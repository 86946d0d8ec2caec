use crate::analysis::{analyze_words, AnalysisResult};
use crate::comfort::{analyze_comfort, ComfortHistogram, SequenceClassifier};
use crate::config::{ComfortSettings, Config};
use crate::error::KcResult;
use crate::layout::{LayoutModel, LayoutStats};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

/// Everything known about one layout over one corpus.
#[derive(Serialize, Debug, Clone)]
pub struct LayoutReport {
    pub layout_name: String,
    pub penalty: AnalysisResult,
    /// Absent for legacy (penalty-only) layouts.
    pub comfort: Option<ComfortHistogram>,
    pub stats: LayoutStats,
}

/// Builds a classifier configured from `settings`.
pub fn build_classifier<'a>(
    layout: &'a LayoutModel,
    settings: &ComfortSettings,
) -> KcResult<SequenceClassifier<'a>> {
    Ok(SequenceClassifier::new(layout)
        .with_finger_order(settings.finger_order_table()?)
        .with_modifiers(settings.modifier_table()?)
        .with_cross_hand(settings.cross_hand))
}

pub fn layout_stats(layout: &LayoutModel, settings: &ComfortSettings) -> KcResult<LayoutStats> {
    Ok(LayoutStats::compute(layout, &settings.modifier_table()?))
}

/// Penalty run, comfort pass and static statistics for one layout.
pub fn analyze_layout<S>(layout: &LayoutModel, words: &[S], config: &Config) -> KcResult<LayoutReport>
where
    S: AsRef<str>,
{
    let penalty = analyze_words(layout, words, &config.limits)?;

    let comfort = if layout.has_fingers() {
        let classifier = build_classifier(layout, &config.comfort)?;
        Some(analyze_comfort(
            &classifier,
            words,
            &config.comfort,
            &config.limits,
        )?)
    } else {
        None
    };

    Ok(LayoutReport {
        layout_name: layout.name.clone(),
        penalty,
        comfort,
        stats: layout_stats(layout, &config.comfort)?,
    })
}

/// Analyzes several layouts over the same corpus in parallel. Each run owns
/// its state; results come back in input order.
pub fn compare_layouts<S>(
    layouts: &[LayoutModel],
    words: &[S],
    config: &Config,
) -> KcResult<Vec<LayoutReport>>
where
    S: AsRef<str> + Sync,
{
    info!(
        "⚖️  Comparing {} layouts over {} words",
        layouts.len(),
        words.len()
    );
    layouts
        .par_iter()
        .map(|layout| analyze_layout(layout, words, config))
        .collect()
}
