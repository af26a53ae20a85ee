//! Pipeline-level phone recognition tests against the built-in pack.

use crate::phone::grammar::DigitGrammar;
use crate::phone::recognizer::recognize_phones;
use crate::store::{RuleStore, DEFAULT_PACK};
use crate::text::ScanText;

fn spans(input: &str) -> Vec<(usize, usize, String)> {
    spans_with(&RuleStore::from_pack_str(DEFAULT_PACK).unwrap(), input)
}

fn spans_with(store: &RuleStore, input: &str) -> Vec<(usize, usize, String)> {
    let text = ScanText::new(input);
    recognize_phones(&text, store, &DigitGrammar)
        .into_iter()
        .map(|s| (s.begin, s.end, s.content))
        .collect()
}

#[test]
fn whole_mobile_number() {
    assert_eq!(
        spans("call 13812345678 now"),
        vec![(5, 16, "13812345678".to_owned())]
    );
}

#[test]
fn area_code_with_brackets() {
    assert_eq!(
        spans("(0511)12345678 please"),
        vec![(0, 14, "(0511)12345678".to_owned())]
    );
}

#[test]
fn segment_split_yields_one_span_per_side() {
    assert_eq!(
        spans("call 12345 / 67890"),
        vec![(5, 10, "12345".to_owned()), (13, 18, "67890".to_owned())]
    );
}

#[test]
fn operator_prefixed_number() {
    assert_eq!(
        spans("dial 1795113812345678 now"),
        vec![(5, 21, "1795113812345678".to_owned())]
    );
}

#[test]
fn keyword_window_picks_trailing_number() {
    assert_eq!(
        spans("tel: 65529988 thanks"),
        vec![(5, 13, "65529988".to_owned())]
    );
}

#[test]
fn keyword_window_picks_leading_number() {
    // The extension digits also read as a standalone short code.
    assert_eq!(
        spans("65529988 ext 123"),
        vec![(0, 8, "65529988".to_owned()), (13, 16, "123".to_owned())]
    );
}

#[test]
fn short_code_scan() {
    assert_eq!(spans("call 110 now"), vec![(5, 8, "110".to_owned())]);
}

#[test]
fn negative_rules_suppress_context() {
    let cases = vec![
        "QQ: 12345678",
        "meeting 2026-08-25 at 12:30",
        "mail me at someone@example.com",
    ];
    for input in cases {
        assert!(spans(input).is_empty(), "input: {input:?}");
    }
}

#[test]
fn money_border_suppresses_amount() {
    assert!(spans("price $ 12345678 only").is_empty());
    assert!(spans("pay ¥13812345678").is_empty());
}

#[test]
fn unbalanced_leading_bracket_is_dropped() {
    assert_eq!(
        spans("(13812345678"),
        vec![(1, 12, "13812345678".to_owned())]
    );
}

#[test]
fn multiple_numbers_are_kept_independently() {
    assert_eq!(
        spans("call 13812345678 or 13987654321"),
        vec![
            (5, 16, "13812345678".to_owned()),
            (20, 31, "13987654321".to_owned()),
        ]
    );
}

#[test]
fn digit_free_input_yields_nothing() {
    assert!(spans("").is_empty());
    assert!(spans("no numbers in here").is_empty());
}

#[test]
fn rule_less_pack_keeps_valid_and_short_numbers() {
    let pack = r#"{
        "phone": {
            "region": "CN",
            "find": [
                {"pattern": "[+(\\[]?\\d[\\d()\\[\\] ./;=-]{3,24}\\d"},
                {"pattern": "\\b\\d{3,6}\\b"}
            ]
        },
        "datetime": {"locale": "en"}
    }"#;
    let store = RuleStore::from_pack_str(pack).unwrap();
    assert!(store.fallback_scan());
    assert_eq!(
        spans_with(&store, "call 13812345678 or 110"),
        vec![(5, 16, "13812345678".to_owned()), (20, 23, "110".to_owned())]
    );
}

#[test]
fn duplicate_scores_collapse_to_one_span() {
    // Without the short-pair probe rule, a valid spaced number is kept and
    // then scored again by the blank handler; dedup keeps one copy.
    let pack = r#"{
        "phone": {
            "region": "CN",
            "codes": [{"valid": "prefix_suffix"}, {"valid": "code"}],
            "positive": [
                {"pattern": "\\d{3} \\d{4} \\d{4}", "handle": "blank"}
            ],
            "find": [
                {"pattern": "[+(\\[]?\\d[\\d()\\[\\] ./;=-]{3,24}\\d"},
                {"pattern": "\\b\\d{3,6}\\b"}
            ]
        },
        "datetime": {"locale": "en"}
    }"#;
    let store = RuleStore::from_pack_str(pack).unwrap();
    assert_eq!(
        spans_with(&store, "138 1234 5678"),
        vec![(0, 13, "138 1234 5678".to_owned())]
    );
}
