use keycomfort::analysis::{
    analyze_text, analyze_text_stream, analyze_word_stream, analyze_words, AccumulatorState,
    InputKind, NoProgress,
};
use keycomfort::config::AnalysisLimits;
use keycomfort::error::{InputUnit, KeyComfortError};
use keycomfort::layout::{Finger, FingerId, Hand, LayoutModel};
use serde_json::json;
use std::collections::BTreeSet;

fn layout(v: serde_json::Value) -> LayoutModel {
    LayoutModel::from_json_value(&v).unwrap()
}

fn cyrillic() -> LayoutModel {
    layout(json!({
        "т": 1, "е": 2, "с": 1, "п": 3, "р": 2, "и": 1, "м": 3
    }))
}

#[test]
fn test_legacy_rules_sum_penalties() {
    let l = layout(json!({"a": 1, "b": 2}));
    let r = analyze_words(&l, &["aab"], &AnalysisLimits::default()).unwrap();
    assert_eq!(r.total_penalty, 4.0);
    assert_eq!(r.processed_symbol_count, 3);
    assert_eq!(r.total_symbol_count, 3);
    assert!(r.unknown_symbols.is_empty());
    assert!(r.finger_press_counts.is_empty());
    assert_eq!(r.input_kind, InputKind::Words);
}

#[test]
fn test_unknown_symbols_are_recorded_not_fatal() {
    let l = layout(json!({"a": 1}));
    let r = analyze_words(&l, &["ab"], &AnalysisLimits::default()).unwrap();
    assert_eq!(r.total_penalty, 1.0);
    assert_eq!(r.unknown_symbols, BTreeSet::from(['b']));
    assert_eq!(r.processed_symbol_count, 1);
    assert_eq!(r.total_symbol_count, 2);
    assert_eq!(r.coverage, 0.5);
}

#[test]
fn test_word_list_over_limit_is_rejected() {
    let l = layout(json!({"a": 1}));
    let words = vec!["a"; 10_001];
    let err = analyze_words(&l, &words, &AnalysisLimits::default()).unwrap_err();
    match err {
        KeyComfortError::InputTooLarge { unit, size, limit } => {
            assert_eq!(unit, InputUnit::Words);
            assert_eq!(size, 10_001);
            assert_eq!(limit, 10_000);
        }
        other => panic!("Expected InputTooLarge, got {:?}", other),
    }
}

#[test]
fn test_word_list_at_limit_is_accepted() {
    let l = layout(json!({"a": 1}));
    let words = vec!["a"; 10_000];
    let r = analyze_words(&l, &words, &AnalysisLimits::default()).unwrap();
    assert_eq!(r.word_count, 10_000);
}

#[test]
fn test_text_over_limit_is_rejected() {
    let l = layout(json!({"a": 1}));
    let limits = AnalysisLimits {
        max_chars: 5,
        ..Default::default()
    };
    let err = analyze_text(&l, "aaaaaa", &limits).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Input too large: 6 characters exceeds the limit of 5; use the streaming variant"
    );
    assert!(matches!(
        err,
        KeyComfortError::InputTooLarge {
            unit: InputUnit::Characters,
            size: 6,
            limit: 5
        }
    ));
}

#[test]
fn test_cyrillic_word_list() {
    // тест = 1+2+1+1, пример = 3+2+1+3+2+2
    let r = analyze_words(&cyrillic(), &["тест", "пример"], &AnalysisLimits::default()).unwrap();
    assert_eq!(r.total_penalty, 18.0);
    assert_eq!(r.word_count, 2);
    assert_eq!(r.processed_symbol_count, 10);
    assert_eq!(r.avg_penalty_per_word, 9.0);
    assert_eq!(r.avg_penalty_per_symbol, 1.8);
}

#[test]
fn test_text_counts_spaces_as_symbols() {
    let r = analyze_text(&cyrillic(), "тест пример", &AnalysisLimits::default()).unwrap();
    assert_eq!(r.input_kind, InputKind::Text);
    assert_eq!(r.word_count, 2);
    assert_eq!(r.total_symbol_count, 11);
    assert_eq!(r.processed_symbol_count, 10);
    assert_eq!(r.unknown_symbols, BTreeSet::from([' ']));
}

#[test]
fn test_text_stream_matches_bounded_text() {
    let l = cyrillic();
    let bounded = analyze_text(&l, "тест пример", &AnalysisLimits::default()).unwrap();
    let streamed = analyze_text_stream(&l, ["тест ", "пример"], None, &mut NoProgress);
    assert_eq!(bounded, streamed);
}

#[test]
fn test_word_stream_matches_bounded_words() {
    let l = layout(json!({"a": [1, "left_pinky"], "b": [2, "left_index"]}));
    let words = ["ab", "ba", "abc", "", "bb"];
    let bounded = analyze_words(&l, &words, &AnalysisLimits::default()).unwrap();
    let batches: Vec<&[&str]> = words.chunks(2).collect();
    let streamed = analyze_word_stream::<_, _, &str>(&l, batches, Some(5), &mut NoProgress);
    assert_eq!(bounded, streamed);
}

#[test]
fn test_finger_press_counts() {
    let l = layout(json!({"a": [1, "left_pinky"], "b": [2, "left_index"], "c": 1}));
    let r = analyze_words(&l, &["abac"], &AnalysisLimits::default()).unwrap();
    assert_eq!(
        r.finger_press_counts.get(&FingerId::new(Hand::Left, Finger::Pinky)),
        Some(&2)
    );
    assert_eq!(
        r.finger_press_counts.get(&FingerId::new(Hand::Left, Finger::Index)),
        Some(&1)
    );
    // Legacy rule: penalty counted, no finger.
    assert_eq!(r.finger_press_counts.values().sum::<u64>(), 3);
    assert_eq!(r.total_penalty, 5.0);
}

#[test]
fn test_empty_input_has_zero_averages() {
    let l = layout(json!({"a": 1}));
    let r = analyze_words::<&str>(&l, &[], &AnalysisLimits::default()).unwrap();
    assert_eq!(r.word_count, 0);
    assert_eq!(r.avg_penalty_per_word, 0.0);
    assert_eq!(r.avg_penalty_per_symbol, 0.0);
    assert_eq!(r.coverage, 0.0);
}

#[test]
fn test_incremental_consumption() {
    let l = layout(json!({"a": 1, "b": 2}));
    let mut state = AccumulatorState::begin_run(&l);
    state.consume_word("ab");
    assert_eq!(state.total_penalty(), 3.0);
    state.consume_batch(&["b", "zz"]);
    assert_eq!(state.total_penalty(), 5.0);
    assert_eq!(state.word_count(), 3);
    assert_eq!(state.unknown_symbols(), &BTreeSet::from(['z']));
    // Unknown symbols are stored once but counted every time.
    assert_eq!(state.total_symbol_count(), 5);
    assert_eq!(state.processed_symbol_count(), 3);
}

#[test]
fn test_separate_word_ends_text_word() {
    let l = layout(json!({"a": 1, "b": 1, "c": 1, "x": 1}));
    let mut state = AccumulatorState::begin_run(&l);
    state.consume_text("ab");
    state.consume_word("x");
    state.consume_text("c");
    assert_eq!(state.word_count(), 3);
}

#[test]
fn test_result_serializes_for_reporting() {
    let l = layout(json!({"a": [1, "right_ring"]}));
    let r = analyze_words(&l, &["a"], &AnalysisLimits::default()).unwrap();
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["input_kind"], "words");
    assert_eq!(v["finger_press_counts"]["right_ring"], 1);
}
