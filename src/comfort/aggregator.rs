use super::classifier::{Comfort, HandSpan, SequenceClassification, SequenceClassifier};
use crate::analysis::ProgressObserver;
use crate::config::{AnalysisLimits, ComfortSettings};
use crate::consts::{MAX_SEQUENCE_LEN, MIN_SEQUENCE_LEN, SEQUENCE_LEN_BUCKETS, TOP_SEQUENCE_SLACK};
use crate::error::{InputUnit, KcResult, KeyComfortError};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use strum::IntoEnumIterator;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ComfortCounts {
    comfortable: u64,
    partial: u64,
    uncomfortable: u64,
}

impl ComfortCounts {
    #[inline(always)]
    fn add(&mut self, comfort: Comfort) {
        match comfort {
            Comfort::Comfortable => self.comfortable += 1,
            Comfort::Partial => self.partial += 1,
            Comfort::Uncomfortable => self.uncomfortable += 1,
        }
    }

    fn merge(&mut self, other: &ComfortCounts) {
        self.comfortable += other.comfortable;
        self.partial += other.partial;
        self.uncomfortable += other.uncomfortable;
    }

    fn total(&self) -> u64 {
        self.comfortable + self.partial + self.uncomfortable
    }
}

fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Space-saving heavy-hitter counter holding at most `capacity` keys.
///
/// Counts are exact while fewer than `capacity` distinct keys have been
/// seen. Past that, a new key replaces the smallest entry (largest string on
/// ties) and inherits its count plus one, so counts become upper bounds.
#[derive(Debug, Clone)]
struct SequenceCounter {
    capacity: usize,
    counts: HashMap<String, u64>,
}

impl SequenceCounter {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            counts: HashMap::with_capacity(capacity),
        }
    }

    fn add(&mut self, sequence: &str) {
        if let Some(n) = self.counts.get_mut(sequence) {
            *n += 1;
            return;
        }
        if self.counts.len() < self.capacity {
            self.counts.insert(sequence.to_string(), 1);
            return;
        }
        let evicted = self
            .counts
            .iter()
            .min_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(s, n)| (s.clone(), *n));
        if let Some((victim, floor)) = evicted {
            self.counts.remove(&victim);
            self.counts.insert(sequence.to_string(), floor + 1);
        }
    }

    fn len(&self) -> usize {
        self.counts.len()
    }

    fn ranked(&self, limit: usize) -> Vec<(String, u64)> {
        let mut ranked: Vec<(String, u64)> =
            self.counts.iter().map(|(s, n)| (s.clone(), *n)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }
}

/// Counts and shares for one bucket (a length, a hand, or everything).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ComfortBucket {
    pub comfortable: u64,
    pub partial: u64,
    pub uncomfortable: u64,
    pub total: u64,
    pub comfortable_percent: f64,
    pub partial_percent: f64,
    pub uncomfortable_percent: f64,
}

impl ComfortBucket {
    fn from_counts(c: &ComfortCounts) -> Self {
        let total = c.total();
        Self {
            comfortable: c.comfortable,
            partial: c.partial,
            uncomfortable: c.uncomfortable,
            total,
            comfortable_percent: percent(c.comfortable, total),
            partial_percent: percent(c.partial, total),
            uncomfortable_percent: percent(c.uncomfortable, total),
        }
    }

    pub fn count(&self, comfort: Comfort) -> u64 {
        match comfort {
            Comfort::Comfortable => self.comfortable,
            Comfort::Partial => self.partial,
            Comfort::Uncomfortable => self.uncomfortable,
        }
    }

    pub fn percent(&self, comfort: Comfort) -> f64 {
        match comfort {
            Comfort::Comfortable => self.comfortable_percent,
            Comfort::Partial => self.partial_percent,
            Comfort::Uncomfortable => self.uncomfortable_percent,
        }
    }
}

/// Corpus-wide comfort snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComfortHistogram {
    pub layout_name: String,
    pub by_length: BTreeMap<usize, ComfortBucket>,
    pub by_hand: BTreeMap<HandSpan, ComfortBucket>,
    pub overall: ComfortBucket,
    pub sequences_with_modifiers: u64,
    pub modifiers_percent: f64,
    /// First distinct sequences met per class, in input order.
    pub examples: BTreeMap<Comfort, Vec<SequenceClassification>>,
    /// Most frequent sequences per class, count descending. Counts are exact
    /// until a class meets more distinct sequences than it can track.
    pub top_sequences: BTreeMap<Comfort, Vec<(String, u64)>>,
    pub total_words: u64,
    pub words_analyzed: u64,
    pub analysis_percent: f64,
}

/// Folds classifications from one corpus pass.
#[derive(Debug, Clone)]
pub struct ComfortAggregator {
    by_length: [ComfortCounts; SEQUENCE_LEN_BUCKETS],
    by_hand: BTreeMap<HandSpan, ComfortCounts>,
    sequences_with_modifiers: u64,
    examples: BTreeMap<Comfort, Vec<SequenceClassification>>,
    frequencies: BTreeMap<Comfort, SequenceCounter>,
    words_seen: u64,
    words_analyzed: u64,
    example_limit: usize,
    top_sequences: usize,
}

impl Default for ComfortAggregator {
    fn default() -> Self {
        Self::new(&ComfortSettings::default())
    }
}

impl ComfortAggregator {
    pub fn new(settings: &ComfortSettings) -> Self {
        Self {
            by_length: [ComfortCounts::default(); SEQUENCE_LEN_BUCKETS],
            by_hand: HandSpan::iter().map(|h| (h, ComfortCounts::default())).collect(),
            sequences_with_modifiers: 0,
            examples: Comfort::iter().map(|c| (c, Vec::new())).collect(),
            frequencies: Comfort::iter()
                .map(|c| {
                    let capacity = settings.top_sequences.saturating_mul(TOP_SEQUENCE_SLACK);
                    (c, SequenceCounter::new(capacity))
                })
                .collect(),
            words_seen: 0,
            words_analyzed: 0,
            example_limit: settings.example_limit,
            top_sequences: settings.top_sequences,
        }
    }

    pub fn fold(&mut self, c: SequenceClassification) {
        if !(MIN_SEQUENCE_LEN..=MAX_SEQUENCE_LEN).contains(&c.length) {
            return;
        }
        self.by_length[c.length - MIN_SEQUENCE_LEN].add(c.comfort);
        self.by_hand.entry(c.hand).or_default().add(c.comfort);
        if c.has_modifiers {
            self.sequences_with_modifiers += 1;
        }

        if self.top_sequences > 0 {
            if let Some(counter) = self.frequencies.get_mut(&c.comfort) {
                counter.add(&c.sequence);
            }
        }

        let examples = self.examples.entry(c.comfort).or_default();
        if examples.len() < self.example_limit && !examples.iter().any(|e| e.sequence == c.sequence)
        {
            examples.push(c);
        }
    }

    /// Classifies and folds every sequence of `word`.
    pub fn fold_word(&mut self, classifier: &SequenceClassifier<'_>, word: &str) {
        self.words_seen += 1;
        let mut produced = false;
        classifier.for_each_sequence(word, |c| {
            produced = true;
            self.fold(c);
        });
        if produced {
            self.words_analyzed += 1;
        }
    }

    pub fn fold_batch<S: AsRef<str>>(&mut self, classifier: &SequenceClassifier<'_>, words: &[S]) {
        for w in words {
            self.fold_word(classifier, w.as_ref());
        }
    }

    pub fn words_seen(&self) -> u64 {
        self.words_seen
    }

    /// Distinct sequence strings currently held for top-sequence ranking.
    pub fn tracked_sequences(&self) -> usize {
        self.frequencies.values().map(SequenceCounter::len).sum()
    }

    /// Builds the snapshot. `word_count` is the corpus size reported as
    /// `total_words`.
    pub fn finalize(&self, layout_name: &str, word_count: u64) -> ComfortHistogram {
        let by_length: BTreeMap<usize, ComfortBucket> = self
            .by_length
            .iter()
            .enumerate()
            .map(|(i, c)| (i + MIN_SEQUENCE_LEN, ComfortBucket::from_counts(c)))
            .collect();

        let by_hand: BTreeMap<HandSpan, ComfortBucket> = self
            .by_hand
            .iter()
            .map(|(h, c)| (*h, ComfortBucket::from_counts(c)))
            .collect();

        let mut overall_counts = ComfortCounts::default();
        for c in &self.by_length {
            overall_counts.merge(c);
        }
        let overall = ComfortBucket::from_counts(&overall_counts);

        let top_sequences = self
            .frequencies
            .iter()
            .map(|(comfort, counter)| (*comfort, counter.ranked(self.top_sequences)))
            .collect();

        debug!(
            "Comfort histogram for '{}': {} sequences from {} words",
            layout_name, overall.total, self.words_analyzed
        );

        ComfortHistogram {
            layout_name: layout_name.to_string(),
            by_length,
            by_hand,
            overall,
            sequences_with_modifiers: self.sequences_with_modifiers,
            modifiers_percent: percent(self.sequences_with_modifiers, overall.total),
            examples: self.examples.clone(),
            top_sequences,
            total_words: word_count,
            words_analyzed: self.words_analyzed,
            analysis_percent: percent(self.words_analyzed, word_count),
        }
    }
}

/// Bounded entry point for an in-memory word list.
pub fn analyze_comfort<S: AsRef<str>>(
    classifier: &SequenceClassifier<'_>,
    words: &[S],
    settings: &ComfortSettings,
    limits: &AnalysisLimits,
) -> KcResult<ComfortHistogram> {
    if words.len() > limits.max_words {
        return Err(KeyComfortError::InputTooLarge {
            unit: InputUnit::Words,
            size: words.len(),
            limit: limits.max_words,
        });
    }
    let mut agg = ComfortAggregator::new(settings);
    agg.fold_batch(classifier, words);
    Ok(agg.finalize(&classifier.layout().name, agg.words_seen()))
}

/// Folds batches of words. The first adapter error aborts the pass.
pub fn try_analyze_comfort_stream<I, B, S, E>(
    classifier: &SequenceClassifier<'_>,
    settings: &ComfortSettings,
    batches: I,
    total_hint: Option<u64>,
    observer: &mut dyn ProgressObserver,
) -> Result<ComfortHistogram, E>
where
    I: IntoIterator<Item = Result<B, E>>,
    B: AsRef<[S]>,
    S: AsRef<str>,
{
    let name = &classifier.layout().name;
    info!("🖐️  Comfort pass over word stream ('{}')", name);
    let mut agg = ComfortAggregator::new(settings);
    observer.on_start(total_hint);

    for batch in batches {
        let batch = batch?;
        let words = batch.as_ref();
        agg.fold_batch(classifier, words);
        observer.on_batch(words.len() as u64);
    }

    observer.on_finish();
    Ok(agg.finalize(name, agg.words_seen()))
}

pub fn analyze_comfort_stream<I, B, S>(
    classifier: &SequenceClassifier<'_>,
    settings: &ComfortSettings,
    batches: I,
    total_hint: Option<u64>,
    observer: &mut dyn ProgressObserver,
) -> ComfortHistogram
where
    I: IntoIterator<Item = B>,
    B: AsRef<[S]>,
    S: AsRef<str>,
{
    let batches = batches.into_iter().map(Ok::<B, Infallible>);
    match try_analyze_comfort_stream(classifier, settings, batches, total_hint, observer) {
        Ok(h) => h,
        Err(never) => match never {},
    }
}
