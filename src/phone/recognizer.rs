//! The phone recognition loop.
//!
//! Candidates flow find → border → codes → (valid | positive handlers),
//! and every accepted span is blanked out of the working buffer so later
//! stages cannot claim the same digits. The short-number scan runs against
//! whatever survived, then the combined list is deduplicated and leading
//! brackets are fixed up.
//!
//! A pack with no negative, border, codes or positive rules drops the
//! pipeline entirely and keeps any candidate the grammar accepts.

use std::collections::HashSet;

use crate::phone::filters::{self, FILLER};
use crate::phone::finder::{self, PhoneSpan};
use crate::phone::grammar::PhoneGrammar;
use crate::store::RuleStore;
use crate::text::ScanText;

pub(crate) fn recognize_phones(
    text: &ScanText,
    store: &RuleStore,
    grammar: &dyn PhoneGrammar,
) -> Vec<PhoneSpan> {
    if store.fallback_scan() {
        return without_phone_rules(text, store, grammar);
    }
    let mut filtered = text.clone();
    filters::redact_negative(&mut filtered, store);
    let mut spans = possible_numbers(text, &mut filtered, store, grammar);
    spans.extend(finder::find_short_numbers(&filtered, store, grammar));
    let mut spans = dedup(spans);
    for span in &mut spans {
        filters::fix_leading_bracket(span);
    }
    spans
}

fn possible_numbers(
    src: &ScanText,
    filtered: &mut ScanText,
    store: &RuleStore,
    grammar: &dyn PhoneGrammar,
) -> Vec<PhoneSpan> {
    let mut result = Vec::new();
    let found = finder::find_numbers(filtered, store, grammar);
    for number in found {
        if !filters::passes_borders(filtered, number.begin, number.end, store) {
            continue;
        }
        // Codes validation reads the unredacted text so prefix and suffix
        // context is intact.
        if !filters::validate_codes(src, &number, store) {
            continue;
        }
        if grammar.is_valid(&number.parsed, store.region()) {
            let span = PhoneSpan {
                begin: number.begin,
                end: number.end,
                content: number.content.clone(),
            };
            if keep_valid_number(&mut result, span, filtered, store) {
                continue;
            }
        }
        let positives = filters::apply_positive(filtered, &number, store, grammar);
        if !positives.is_empty() {
            for span in &positives {
                filtered.redact(span.begin..span.end, FILLER);
            }
            result.extend(positives);
        }
    }
    result
}

/// Keeps a grammar-valid candidate unless the short-pair probe hits it, in
/// which case the positive handlers get to split it instead. Returns
/// whether the candidate was consumed.
fn keep_valid_number(
    result: &mut Vec<PhoneSpan>,
    span: PhoneSpan,
    filtered: &mut ScanText,
    store: &RuleStore,
) -> bool {
    let rules = store.find_rules();
    // Three find rules means a short-pair probe sits at index 0.
    if rules.len() == 3 {
        let probe = &rules[0];
        let stripped = if span.content.starts_with('(') || span.content.starts_with('[') {
            &span.content[1..]
        } else {
            span.content.as_str()
        };
        if !probe.pattern.is_match(stripped) {
            let range = span.begin..span.end;
            result.push(span);
            filtered.redact(range, FILLER);
            return true;
        }
        false
    } else {
        let range = span.begin..span.end;
        result.push(span);
        filtered.redact(range, FILLER);
        false
    }
}

/// Rule-less scan: keep whatever the grammar calls valid, plus short codes.
fn without_phone_rules(
    text: &ScanText,
    store: &RuleStore,
    grammar: &dyn PhoneGrammar,
) -> Vec<PhoneSpan> {
    let region = store.region();
    let mut result: Vec<PhoneSpan> = finder::find_numbers(text, store, grammar)
        .into_iter()
        .filter(|number| grammar.is_valid(&number.parsed, region))
        .map(|number| PhoneSpan {
            begin: number.begin,
            end: number.end,
            content: number.content,
        })
        .collect();
    result.extend(finder::find_short_numbers(text, store, grammar));
    let mut result = dedup(result);
    for span in &mut result {
        filters::fix_leading_bracket(span);
    }
    result
}

/// Keeps the first occurrence of each (begin, end, content) triple.
fn dedup(spans: Vec<PhoneSpan>) -> Vec<PhoneSpan> {
    let mut seen: HashSet<(usize, usize, String)> = HashSet::new();
    let mut out = Vec::new();
    for span in spans {
        if seen.insert((span.begin, span.end, span.content.clone())) {
            out.push(span);
        }
    }
    out
}
