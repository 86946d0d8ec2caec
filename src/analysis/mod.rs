pub mod accumulator;
pub mod progress;

pub use self::accumulator::{
    analyze_text, analyze_text_stream, analyze_word_stream, analyze_words,
    try_analyze_text_stream, try_analyze_word_stream, AccumulatorState, AnalysisResult, InputKind,
};
pub use self::progress::{NoProgress, ProgressObserver, TracingProgress};
