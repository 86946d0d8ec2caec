pub mod aggregator;
pub mod classifier;

pub use self::aggregator::{
    analyze_comfort, analyze_comfort_stream, try_analyze_comfort_stream, ComfortAggregator,
    ComfortBucket, ComfortHistogram,
};
pub use self::classifier::{
    Comfort, ComfortReason, CrossHandPolicy, Direction, FingerOrderTable, HandSpan,
    SequenceClassification, SequenceClassifier,
};
