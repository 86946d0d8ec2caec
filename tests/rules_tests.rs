use keycomfort::error::KeyComfortError;
use keycomfort::layout::{Finger, FingerId, Hand, LayoutModel, LayoutRule, Modifier};
use rstest::rstest;
use serde_json::{json, Value};

fn parse(v: Value) -> Result<LayoutModel, KeyComfortError> {
    LayoutModel::from_json_value(&v)
}

// --- REJECTED TABLES ---
#[rstest]
#[case(json!({}), "empty table")]
#[case(json!({"a": -1}), "negative penalty")]
#[case(json!({"a": "1"}), "string penalty")]
#[case(json!({"a": true}), "boolean penalty")]
#[case(json!({"a": null}), "null penalty")]
#[case(json!({"a": [-0.5, "left_index"]}), "negative extended penalty")]
#[case(json!({"a": [1, ""]}), "empty finger tag")]
#[case(json!({"a": [1, "   "]}), "blank finger tag")]
#[case(json!({"a": [1, "left_toe"]}), "unknown finger")]
#[case(json!({"a": [1, "middle"]}), "finger without hand")]
#[case(json!({"a": [1, 2]}), "non-string finger tag")]
#[case(json!({"a": [1, "left_index", "hyper"]}), "unknown modifier")]
#[case(json!({"a": []}), "empty rule list")]
#[case(json!({"ab": 1}), "multi-character key")]
#[case(json!({"": 1}), "empty key")]
#[case(json!({"a": {"finger": "left_index"}}), "object without penalty")]
#[case(json!({"a": {"penalty": 1, "finger": "left_index", "modifiers": "shift"}}), "modifiers not a list")]
#[case(json!([1, 2, 3]), "not an object")]
fn test_invalid_tables_are_rejected(#[case] doc: Value, #[case] what: &str) {
    match parse(doc) {
        Err(KeyComfortError::InvalidRule { .. }) => {}
        other => panic!("{}: expected InvalidRule, got {:?}", what, other),
    }
}

// --- ACCEPTED SHAPES ---
#[rstest]
#[case(json!({"a": 0}), 0.0, None)]
#[case(json!({"a": 1.5}), 1.5, None)]
#[case(json!({"a": [2]}), 2.0, None)]
#[case(json!({"a": [2, "left_index"]}), 2.0, Some(FingerId::new(Hand::Left, Finger::Index)))]
#[case(json!({"a": [2, "RIGHT_PINKY"]}), 2.0, Some(FingerId::new(Hand::Right, Finger::Pinky)))]
#[case(json!({"a": {"penalty": 3}}), 3.0, None)]
#[case(json!({"a": {"penalty": 3, "finger": "left_ring"}}), 3.0, Some(FingerId::new(Hand::Left, Finger::Ring)))]
#[case(json!({"rules": {"a": [4, "right_thumb"]}}), 4.0, Some(FingerId::new(Hand::Right, Finger::Thumb)))]
fn test_valid_shapes(
    #[case] doc: Value,
    #[case] penalty: f64,
    #[case] finger: Option<FingerId>,
) {
    let model = parse(doc).unwrap();
    let rule = model.get('a').unwrap();
    assert_eq!(rule.penalty(), penalty);
    assert_eq!(rule.finger(), finger);
}

#[test]
fn test_mixed_legacy_and_extended_rules() {
    let model = parse(json!({"a": 1, "b": [2, "left_index", "shift", "alt"]})).unwrap();
    assert_eq!(model.len(), 2);
    assert!(matches!(model.get('a'), Some(LayoutRule::Scalar(_))));
    let b = model.assignment('b').unwrap();
    assert_eq!(b.modifiers, vec![Modifier::Shift, Modifier::Alt]);
    assert!(model.has_fingers());
}

#[test]
fn test_unicode_and_whitespace_symbols() {
    let model = parse(json!({"ё": 2, " ": 0.5})).unwrap();
    assert_eq!(model.get('ё').map(LayoutRule::penalty), Some(2.0));
    assert_eq!(model.get(' ').map(LayoutRule::penalty), Some(0.5));
}

#[test]
fn test_error_names_the_symbol() {
    let err = parse(json!({"a": 1, "q": -3})).unwrap_err();
    match err {
        KeyComfortError::InvalidRule { symbol, reason } => {
            assert_eq!(symbol, "q");
            assert!(reason.contains("negative"), "reason was '{}'", reason);
        }
        other => panic!("Expected InvalidRule, got {:?}", other),
    }
}

#[test]
fn test_typed_rules_are_validated() {
    let ok = LayoutModel::from_rules([('a', LayoutRule::Scalar(1.0))]).unwrap();
    assert_eq!(ok.len(), 1);
    assert!(LayoutModel::from_rules([('a', LayoutRule::Scalar(-1.0))]).is_err());
    assert!(LayoutModel::from_rules(Vec::<(char, LayoutRule)>::new()).is_err());
}

#[test]
fn test_iter_sorted_is_ordered() {
    let model = parse(json!({"c": 1, "a": 1, "b": 1})).unwrap();
    let symbols: Vec<char> = model.iter_sorted().into_iter().map(|(c, _)| c).collect();
    assert_eq!(symbols, vec!['a', 'b', 'c']);
}
