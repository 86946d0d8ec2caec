/// Shortest run the comfort classifier scores.
pub const MIN_SEQUENCE_LEN: usize = 2;
/// Longest run the comfort classifier scores.
pub const MAX_SEQUENCE_LEN: usize = 5;

/// Number of distinct window lengths (2, 3, 4, 5).
pub const SEQUENCE_LEN_BUCKETS: usize = MAX_SEQUENCE_LEN - MIN_SEQUENCE_LEN + 1;

// Bounded entry point thresholds
pub const DEFAULT_MAX_WORDS: usize = 10_000;
pub const DEFAULT_MAX_CHARS: usize = 100_000;

// Streaming adapter sizing
pub const DEFAULT_BATCH_SIZE: usize = 1_000;
pub const DEFAULT_CHUNK_SIZE: usize = 8_192;
pub const DEFAULT_PROGRESS_EVERY: usize = 50;

pub const DEFAULT_EXAMPLE_LIMIT: usize = 10;
pub const DEFAULT_TOP_SEQUENCES: usize = 20;
/// Sequences tracked per comfort class, as a multiple of `top_sequences`.
pub const TOP_SEQUENCE_SLACK: usize = 10;

/// Modifier presses count half a keypress in layout finger-load statistics.
pub const MODIFIER_LOAD_WEIGHT: f64 = 0.5;
/// Reach (in rows + columns) that normalizes the goodness score.
pub const REACH_NORMALIZER: f64 = 20.0;
