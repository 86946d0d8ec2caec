use super::progress::ProgressObserver;
use crate::config::AnalysisLimits;
use crate::error::{InputUnit, KcResult, KeyComfortError};
use crate::layout::{FingerId, LayoutModel};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::convert::Infallible;
use strum_macros::Display;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InputKind {
    /// A list of separate words.
    Words,
    /// Continuous text; words are whitespace-delimited.
    Text,
}

/// Final, immutable outcome of one penalty run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub layout_name: String,
    pub input_kind: InputKind,
    pub total_penalty: f64,
    pub word_count: u64,
    pub total_symbol_count: u64,
    pub processed_symbol_count: u64,
    pub unknown_symbols: BTreeSet<char>,
    pub finger_press_counts: BTreeMap<FingerId, u64>,
    pub avg_penalty_per_word: f64,
    pub avg_penalty_per_symbol: f64,
    /// Fraction of input symbols that had a rule.
    pub coverage: f64,
}

/// Running totals for one penalty run. Owned by exactly one caller.
#[derive(Debug, Clone)]
pub struct AccumulatorState<'a> {
    layout: &'a LayoutModel,
    input_kind: InputKind,
    total_penalty: f64,
    word_count: u64,
    processed_symbol_count: u64,
    total_symbol_count: u64,
    unknown_symbols: BTreeSet<char>,
    finger_press_counts: BTreeMap<FingerId, u64>,
    // Text mode: whether the previous chunk ended inside a word.
    in_word: bool,
}

impl<'a> AccumulatorState<'a> {
    pub fn begin_run(layout: &'a LayoutModel) -> Self {
        Self {
            layout,
            input_kind: InputKind::Words,
            total_penalty: 0.0,
            word_count: 0,
            processed_symbol_count: 0,
            total_symbol_count: 0,
            unknown_symbols: BTreeSet::new(),
            finger_press_counts: BTreeMap::new(),
            in_word: false,
        }
    }

    #[inline(always)]
    fn consume_symbol(&mut self, c: char) {
        self.total_symbol_count += 1;
        match self.layout.get(c) {
            Some(rule) => {
                self.total_penalty += rule.penalty();
                self.processed_symbol_count += 1;
                if let Some(finger) = rule.finger() {
                    *self.finger_press_counts.entry(finger).or_default() += 1;
                }
            }
            None => {
                self.unknown_symbols.insert(c);
            }
        }
    }

    pub fn consume_word(&mut self, word: &str) {
        self.word_count += 1;
        // A separate word always ends any text word in progress.
        self.in_word = false;
        for c in word.chars() {
            self.consume_symbol(c);
        }
    }

    pub fn consume_batch<S: AsRef<str>>(&mut self, words: &[S]) {
        for w in words {
            self.consume_word(w.as_ref());
        }
    }

    /// Consumes a piece of continuous text. Chunks may split words; a word
    /// spanning two chunks is counted once.
    pub fn consume_text(&mut self, text: &str) {
        self.input_kind = InputKind::Text;
        for c in text.chars() {
            if c.is_whitespace() {
                self.in_word = false;
            } else if !self.in_word {
                self.in_word = true;
                self.word_count += 1;
            }
            self.consume_symbol(c);
        }
    }

    pub fn total_penalty(&self) -> f64 {
        self.total_penalty
    }

    pub fn word_count(&self) -> u64 {
        self.word_count
    }

    pub fn processed_symbol_count(&self) -> u64 {
        self.processed_symbol_count
    }

    pub fn total_symbol_count(&self) -> u64 {
        self.total_symbol_count
    }

    pub fn unknown_symbols(&self) -> &BTreeSet<char> {
        &self.unknown_symbols
    }

    /// Derives the averages. Does not mutate the state, so calling it twice
    /// yields the same result.
    pub fn finish(&self) -> AnalysisResult {
        let avg_penalty_per_word = if self.word_count > 0 {
            self.total_penalty / self.word_count as f64
        } else {
            0.0
        };
        let avg_penalty_per_symbol = if self.processed_symbol_count > 0 {
            self.total_penalty / self.processed_symbol_count as f64
        } else {
            0.0
        };
        let coverage = if self.total_symbol_count > 0 {
            self.processed_symbol_count as f64 / self.total_symbol_count as f64
        } else {
            0.0
        };

        AnalysisResult {
            layout_name: self.layout.name.clone(),
            input_kind: self.input_kind,
            total_penalty: self.total_penalty,
            word_count: self.word_count,
            total_symbol_count: self.total_symbol_count,
            processed_symbol_count: self.processed_symbol_count,
            unknown_symbols: self.unknown_symbols.clone(),
            finger_press_counts: self.finger_press_counts.clone(),
            avg_penalty_per_word,
            avg_penalty_per_symbol,
            coverage,
        }
    }
}

/// Bounded entry point for an in-memory word list.
pub fn analyze_words<S: AsRef<str>>(
    layout: &LayoutModel,
    words: &[S],
    limits: &AnalysisLimits,
) -> KcResult<AnalysisResult> {
    if words.len() > limits.max_words {
        return Err(KeyComfortError::InputTooLarge {
            unit: InputUnit::Words,
            size: words.len(),
            limit: limits.max_words,
        });
    }
    let mut state = AccumulatorState::begin_run(layout);
    state.consume_batch(words);
    Ok(state.finish())
}

/// Bounded entry point for an in-memory text.
pub fn analyze_text(
    layout: &LayoutModel,
    text: &str,
    limits: &AnalysisLimits,
) -> KcResult<AnalysisResult> {
    let size = text.chars().count();
    if size > limits.max_chars {
        return Err(KeyComfortError::InputTooLarge {
            unit: InputUnit::Characters,
            size,
            limit: limits.max_chars,
        });
    }
    let mut state = AccumulatorState::begin_run(layout);
    state.consume_text(text);
    Ok(state.finish())
}

/// Streams batches of words. The first adapter error aborts the run.
pub fn try_analyze_word_stream<I, B, S, E>(
    layout: &LayoutModel,
    batches: I,
    total_hint: Option<u64>,
    observer: &mut dyn ProgressObserver,
) -> Result<AnalysisResult, E>
where
    I: IntoIterator<Item = Result<B, E>>,
    B: AsRef<[S]>,
    S: AsRef<str>,
{
    info!("📊 Penalty run over word stream ('{}')", layout.name);
    let mut state = AccumulatorState::begin_run(layout);
    observer.on_start(total_hint);

    let mut batch_count = 0usize;
    for batch in batches {
        let batch = batch?;
        let words = batch.as_ref();
        state.consume_batch(words);
        batch_count += 1;
        observer.on_batch(words.len() as u64);
    }

    observer.on_finish();
    debug!(
        "Word stream finished: {} batches, {} words",
        batch_count,
        state.word_count()
    );
    Ok(state.finish())
}

pub fn analyze_word_stream<I, B, S>(
    layout: &LayoutModel,
    batches: I,
    total_hint: Option<u64>,
    observer: &mut dyn ProgressObserver,
) -> AnalysisResult
where
    I: IntoIterator<Item = B>,
    B: AsRef<[S]>,
    S: AsRef<str>,
{
    let batches = batches.into_iter().map(Ok::<B, Infallible>);
    match try_analyze_word_stream(layout, batches, total_hint, observer) {
        Ok(result) => result,
        Err(never) => match never {},
    }
}

/// Streams chunks of continuous text. The first adapter error aborts the run.
pub fn try_analyze_text_stream<I, S, E>(
    layout: &LayoutModel,
    chunks: I,
    total_hint: Option<u64>,
    observer: &mut dyn ProgressObserver,
) -> Result<AnalysisResult, E>
where
    I: IntoIterator<Item = Result<S, E>>,
    S: AsRef<str>,
{
    info!("📊 Penalty run over text stream ('{}')", layout.name);
    let mut state = AccumulatorState::begin_run(layout);
    // An empty stream is still a text run.
    state.input_kind = InputKind::Text;
    observer.on_start(total_hint);

    let mut chunk_count = 0usize;
    for chunk in chunks {
        let chunk = chunk?;
        let before = state.total_symbol_count();
        state.consume_text(chunk.as_ref());
        chunk_count += 1;
        observer.on_batch(state.total_symbol_count() - before);
    }

    observer.on_finish();
    debug!(
        "Text stream finished: {} chunks, {} symbols",
        chunk_count,
        state.total_symbol_count()
    );
    Ok(state.finish())
}

pub fn analyze_text_stream<I, S>(
    layout: &LayoutModel,
    chunks: I,
    total_hint: Option<u64>,
    observer: &mut dyn ProgressObserver,
) -> AnalysisResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let chunks = chunks.into_iter().map(Ok::<S, Infallible>);
    match try_analyze_text_stream(layout, chunks, total_hint, observer) {
        Ok(result) => result,
        Err(never) => match never {},
    }
}
