//! Pipeline-level datetime recognition tests against the built-in pack.

use crate::datetime::finder::{self, Candidate};
use crate::datetime::merge::{self, recognize_datetimes};
use crate::datetime::DateTimeKind;
use crate::store::{RuleStore, DEFAULT_PACK};
use crate::text::ScanText;

fn spans(input: &str) -> Vec<(usize, usize, DateTimeKind)> {
    spans_with(&RuleStore::from_pack_str(DEFAULT_PACK).unwrap(), input)
}

fn spans_with(store: &RuleStore, input: &str) -> Vec<(usize, usize, DateTimeKind)> {
    let text = ScanText::new(input);
    recognize_datetimes(&text, store)
        .into_iter()
        .map(|s| (s.begin, s.end, s.kind))
        .collect()
}

#[test]
fn iso_datetime_absorbs_its_parts() {
    assert_eq!(
        spans("meet at 2026-08-25 10:30 sharp"),
        vec![(8, 24, DateTimeKind::DateTime)]
    );
}

#[test]
fn keyword_datetime_rule_wins_whole_phrase() {
    assert_eq!(
        spans("April 5 at 3pm"),
        vec![(0, 14, DateTimeKind::DateTime)]
    );
}

#[test]
fn short_date_priority_picks_configured_order() {
    assert_eq!(spans("12/25/2026"), vec![(0, 10, DateTimeKind::Date)]);
}

#[test]
fn priority_override_decides_identical_spans() {
    let store = RuleStore::from_pack_str(DEFAULT_PACK).unwrap();
    let text = ScanText::new("12/25/2026");
    // Both short-date rules match the same span; the mdy pack ranks 20014
    // higher, whichever side is seen first.
    for ids in [[20_014, 20_015], [20_015, 20_014]] {
        let candidates: Vec<Candidate> = ids
            .iter()
            .map(|&id| Candidate {
                id,
                begin: 0,
                end: 10,
                kind: DateTimeKind::Date,
                time_period: false,
            })
            .collect();
        let kept = merge::filter_candidates(&text, &store, candidates, &[], &[]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 20_014);
    }
}

#[test]
fn weekday_joins_time_with_keyword() {
    assert_eq!(
        spans("Monday at 3pm"),
        vec![(0, 13, DateTimeKind::DateTime)]
    );
}

#[test]
fn bracketed_restatement_joins_times() {
    assert_eq!(spans("3pm (15:00)"), vec![(0, 11, DateTimeKind::DateTime)]);
}

#[test]
fn comma_joins_date_and_time() {
    assert_eq!(spans("April 5, 3pm"), vec![(0, 12, DateTimeKind::DateTime)]);
}

#[test]
fn period_joiner_merges_sibling_times() {
    assert_eq!(spans("2pm - 4pm"), vec![(0, 9, DateTimeKind::TimePeriod)]);
}

#[test]
fn period_joiner_merges_sibling_weekdays() {
    assert_eq!(
        spans("Monday - Tuesday"),
        vec![(0, 16, DateTimeKind::TimePeriod)]
    );
    assert_eq!(spans("Mon to Tue"), vec![(0, 10, DateTimeKind::TimePeriod)]);
}

#[test]
fn range_keyword_rule_claims_whole_band() {
    assert_eq!(
        spans("from 2pm to 4pm"),
        vec![(0, 15, DateTimeKind::TimePeriod)]
    );
}

#[test]
fn date_absorbs_following_time_band() {
    assert_eq!(
        spans("Monday from 2pm to 4pm"),
        vec![(0, 22, DateTimeKind::TimePeriod)]
    );
}

#[test]
fn date_pair_combines_over_separator() {
    assert_eq!(spans("Monday, April 5"), vec![(0, 15, DateTimeKind::Date)]);
}

#[test]
fn three_dates_combine_fully() {
    assert_eq!(
        spans("Monday, April 5, today"),
        vec![(0, 22, DateTimeKind::Date)]
    );
}

#[test]
fn bracketed_date_restatement_combines() {
    assert_eq!(
        spans("Monday (April 5)"),
        vec![(0, 16, DateTimeKind::Date)]
    );
}

#[test]
fn parenthesized_date_joins_following_time() {
    assert_eq!(
        spans("(Monday) 3pm"),
        vec![(0, 12, DateTimeKind::DateTime)]
    );
}

#[test]
fn weekday_run_splits_to_singles() {
    assert_eq!(
        spans("Mon and Tue"),
        vec![(0, 3, DateTimeKind::Week), (8, 11, DateTimeKind::Week)]
    );
}

#[test]
fn standalone_kinds_survive() {
    let cases: Vec<(&str, Vec<(usize, usize, DateTimeKind)>)> = vec![
        ("today", vec![(0, 5, DateTimeKind::Today)]),
        ("Monday", vec![(0, 6, DateTimeKind::Week)]),
        ("next week", vec![(0, 9, DateTimeKind::Week)]),
        ("April 5", vec![(0, 7, DateTimeKind::Date)]),
        ("2026-08-25", vec![(0, 10, DateTimeKind::Date)]),
    ];
    for (input, want) in cases {
        assert_eq!(spans(input), want, "input {input:?}");
    }
}

#[test]
fn past_prefix_removes_adjacent_only() {
    assert_eq!(spans("last Monday"), vec![]);
    assert_eq!(
        spans("last call Monday"),
        vec![(10, 16, DateTimeKind::Week)]
    );
}

#[test]
fn past_suffix_removes_leading_candidate() {
    assert_eq!(spans("saw him Monday earlier"), vec![]);
}

#[test]
fn clearing_rules_suppress_contained_spans() {
    assert_eq!(spans("version 2.8.26"), vec![]);
    assert_eq!(spans("build 2.8.26"), vec![(6, 12, DateTimeKind::Date)]);
}

#[test]
fn outputs_stay_ordered_and_disjoint() {
    let inputs = [
        "Monday at 3pm and 12/25/2026",
        "April 5, 3pm (15:00)",
        "from 2pm to 4pm or 9pm",
        "meet 2026-08-25 10:30 and version 2.8.26",
    ];
    for input in inputs {
        let found = spans(input);
        assert!(!found.is_empty(), "input {input:?}");
        for pair in found.windows(2) {
            assert!(pair[0].0 < pair[1].0, "input {input:?}: {found:?}");
            assert!(pair[0].1 <= pair[1].0, "input {input:?}: {found:?}");
        }
    }
}

#[test]
fn merge_reruns_to_a_fixed_point() {
    let store = RuleStore::from_pack_str(DEFAULT_PACK).unwrap();
    let inputs = [
        "Monday at 3pm, then 12/25/2026",
        "Monday, April 5, today",
        "3pm (15:00)",
    ];
    for input in inputs {
        let text = ScanText::new(input);
        let candidates = finder::scan(&text, &store);
        let clears = finder::clear_spans(&text, &store);
        let pasts = finder::past_spans(&text, &store);
        let once = merge::filter_candidates(&text, &store, candidates, &clears, &pasts);
        let twice = merge::filter_candidates(&text, &store, once.clone(), &clears, &pasts);
        let span_of = |c: &Candidate| (c.begin, c.end);
        assert_eq!(
            once.iter().map(span_of).collect::<Vec<_>>(),
            twice.iter().map(span_of).collect::<Vec<_>>(),
            "input {input:?}"
        );
    }
}

#[test]
fn missing_auxiliary_patterns_degrade_joins() {
    let store = RuleStore::from_pack_str(
        r#"{
            "phone": {"region": "ZZ"},
            "datetime": {
                "locale": "en",
                "params": {"weekday": "Monday|Tuesday"},
                "locale_rules": [
                    {"id": 20009, "pattern": "(?:{{weekday}})", "insensitive": true},
                    {"id": 30002, "pattern": "\\b\\d{1,2}\\s?(?:am|pm)\\b", "insensitive": true}
                ]
            }
        }"#,
    )
    .unwrap();
    assert_eq!(
        spans_with(&store, "Monday at 3pm"),
        vec![(0, 6, DateTimeKind::Week), (10, 13, DateTimeKind::Time)]
    );
}

#[test]
fn empty_and_inert_inputs_yield_nothing() {
    assert_eq!(spans(""), vec![]);
    assert_eq!(spans("hello there"), vec![]);
}
