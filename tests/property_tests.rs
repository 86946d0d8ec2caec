use keycomfort::analysis::{analyze_word_stream, analyze_words, NoProgress};
use keycomfort::comfort::{analyze_comfort, analyze_comfort_stream, Comfort, SequenceClassifier};
use keycomfort::config::{AnalysisLimits, ComfortSettings};
use keycomfort::layout::{Finger, FingerId, Hand, KeyAssignment, LayoutModel, LayoutRule};
use proptest::prelude::*;
use std::collections::HashMap;
use strum::IntoEnumIterator;

// --- STRATEGIES ---

const ALPHABET: &[char] = &['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

prop_compose! {
    fn arb_finger()(
        right in any::<bool>(),
        finger in 0usize..5
    ) -> FingerId {
        let hand = if right { Hand::Right } else { Hand::Left };
        let finger = Finger::iter().nth(finger).unwrap_or(Finger::Index);
        FingerId::new(hand, finger)
    }
}

prop_compose! {
    // Integer penalties keep the sums exact regardless of order.
    fn arb_rule()(
        penalty in 0u32..20,
        finger in proptest::option::of(arb_finger())
    ) -> LayoutRule {
        let penalty = penalty as f64;
        match finger {
            Some(finger) => LayoutRule::Extended(KeyAssignment {
                penalty,
                finger,
                position: None,
                modifiers: Vec::new(),
            }),
            None => LayoutRule::Scalar(penalty),
        }
    }
}

prop_compose! {
    // Maps a non-empty subset of the alphabet; the rest stays unknown.
    fn arb_layout()(
        rules in proptest::collection::vec(proptest::option::of(arb_rule()), ALPHABET.len())
            .prop_filter("at least one rule", |r| r.iter().any(Option::is_some))
    ) -> LayoutModel {
        let rules = ALPHABET
            .iter()
            .zip(rules)
            .filter_map(|(&c, r)| r.map(|r| (c, r)));
        LayoutModel::from_rules(rules).unwrap()
    }
}

fn arb_words() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-hxyz]{0,7}", 0..60)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn test_penalty_is_batch_size_invariant(
        layout in arb_layout(),
        words in arb_words(),
        batch in 1usize..17
    ) {
        let whole = analyze_words(&layout, &words, &AnalysisLimits::default()).unwrap();
        let batches: Vec<Vec<String>> = words.chunks(batch).map(|c| c.to_vec()).collect();
        let streamed = analyze_word_stream(&layout, batches, None, &mut NoProgress);
        prop_assert_eq!(whole, streamed);
    }

    #[test]
    fn test_penalty_is_sum_over_processed_symbols(
        layout in arb_layout(),
        words in arb_words()
    ) {
        let r = analyze_words(&layout, &words, &AnalysisLimits::default()).unwrap();

        let mut expected = 0.0;
        let mut unmapped = 0u64;
        let mut fingers: HashMap<FingerId, u64> = HashMap::new();
        for c in words.iter().flat_map(|w| w.chars()) {
            match layout.get(c) {
                Some(rule) => {
                    expected += rule.penalty();
                    if let Some(f) = rule.finger() {
                        *fingers.entry(f).or_default() += 1;
                    }
                }
                None => unmapped += 1,
            }
        }

        prop_assert_eq!(r.total_penalty, expected);
        prop_assert_eq!(r.processed_symbol_count, r.total_symbol_count - unmapped);
        prop_assert!(r.unknown_symbols.iter().all(|c| layout.get(*c).is_none()));
        prop_assert_eq!(r.finger_press_counts.values().sum::<u64>(), fingers.values().sum::<u64>());
        prop_assert!(r.coverage >= 0.0 && r.coverage <= 1.0);
    }

    #[test]
    fn test_comfort_is_batch_size_invariant(
        layout in arb_layout(),
        words in arb_words(),
        batch in 1usize..17
    ) {
        let classifier = SequenceClassifier::new(&layout);
        let settings = ComfortSettings::default();
        let whole = analyze_comfort(&classifier, &words, &settings, &AnalysisLimits::default()).unwrap();
        let batches: Vec<Vec<String>> = words.chunks(batch).map(|c| c.to_vec()).collect();
        let streamed = analyze_comfort_stream(&classifier, &settings, batches, None, &mut NoProgress);
        prop_assert_eq!(whole, streamed);
    }

    #[test]
    fn test_comfort_buckets_are_consistent(
        layout in arb_layout(),
        words in arb_words()
    ) {
        let classifier = SequenceClassifier::new(&layout);
        let h = analyze_comfort(
            &classifier,
            &words,
            &ComfortSettings::default(),
            &AnalysisLimits::default(),
        ).unwrap();

        let by_length: u64 = h.by_length.values().map(|b| b.total).sum();
        let by_hand: u64 = h.by_hand.values().map(|b| b.total).sum();
        prop_assert_eq!(by_length, h.overall.total);
        prop_assert_eq!(by_hand, h.overall.total);

        for b in h.by_length.values().chain(h.by_hand.values()) {
            prop_assert_eq!(b.comfortable + b.partial + b.uncomfortable, b.total);
            if b.total > 0 {
                let pct = b.comfortable_percent + b.partial_percent + b.uncomfortable_percent;
                prop_assert!((pct - 100.0).abs() < 1e-9);
            }
        }
        for c in Comfort::iter() {
            prop_assert!(h.examples[&c].len() <= 10);
            prop_assert!(h.top_sequences[&c].len() <= 20);
        }
        prop_assert!(h.words_analyzed <= h.total_words);
    }
}
