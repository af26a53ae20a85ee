//! Candidate discovery.
//!
//! Runs every universe and locale rule over the text and records one
//! candidate per match. Rules listed as sub-rule parents are split instead:
//! the matched slice is re-scanned with the sub rules and only the pieces
//! are kept, shifted back to absolute offsets. Clearing and past rules are
//! scanned here too; the merge passes consume their spans last.

use std::ops::Range;

use crate::datetime::classify::{classify, DateTimeKind};
use crate::pattern;
use crate::store::{DateTimeRule, RuleId, RuleStore};
use crate::text::ScanText;

/// A recognized date or time span. Offsets are char indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeSpan {
    pub begin: usize,
    pub end: usize,
    pub kind: DateTimeKind,
}

/// Working candidate flowing through the merge passes. The id stays the
/// one that produced the span even after merges extend it; only the kind
/// is rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub id: RuleId,
    pub begin: usize,
    pub end: usize,
    pub kind: DateTimeKind,
    pub time_period: bool,
}

impl Candidate {
    fn new(id: RuleId, span: Range<usize>) -> Self {
        Self {
            id,
            begin: span.start,
            end: span.end,
            kind: classify(id),
            time_period: false,
        }
    }

    /// True once a period merge flags the candidate, or lazily for rules
    /// in the period id band.
    pub fn is_time_period(&self) -> bool {
        self.time_period || (50_000..=59_999).contains(&self.id)
    }
}

/// Scans universe and locale rules, splitting parent matches with their
/// sub rules where the pack configures them. Candidates come back ordered
/// by match start; ties keep rule order.
pub(crate) fn scan(text: &ScanText, store: &RuleStore) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for rule in store.universe_rules().iter().chain(store.locale_rules()) {
        for span in pattern::find_all(&rule.pattern, text) {
            collect(text, store, rule, span, &mut candidates);
        }
    }
    candidates.sort_by_key(|c| c.begin);
    candidates
}

fn collect(
    text: &ScanText,
    store: &RuleStore,
    rule: &DateTimeRule,
    span: Range<usize>,
    out: &mut Vec<Candidate>,
) {
    match store.sub_rules(rule.id) {
        Some(subs) => {
            // The parent span is dropped either way; only sub matches count.
            let inner = text.slice(span.clone());
            for sub in subs {
                for local in pattern::find_all_spans(&sub.pattern, inner) {
                    out.push(Candidate::new(
                        sub.id,
                        span.start + local.start..span.start + local.end,
                    ));
                }
            }
        }
        None => out.push(Candidate::new(rule.id, span)),
    }
}

/// Spans matched by clearing rules. Candidates fully inside one are
/// removed at the end of the pipeline.
pub(crate) fn clear_spans(text: &ScanText, store: &RuleStore) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    for rule in store.filter_rules() {
        spans.extend(pattern::find_all(&rule.pattern, text));
    }
    spans
}

/// Spans matched by past rules, keyed by rule id. The id decides on which
/// side of a candidate the match must sit.
pub(crate) fn past_spans(text: &ScanText, store: &RuleStore) -> Vec<(RuleId, Range<usize>)> {
    let mut spans = Vec::new();
    for rule in store.past_rules() {
        for span in pattern::find_all(&rule.pattern, text) {
            spans.push((rule.id, span));
        }
    }
    spans
}
