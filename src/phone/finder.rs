//! Candidate discovery.
//!
//! The find rules are ordered: the last rule scans short codes, the one
//! before it scans general numbers, and (when present) the first probes
//! slash-separated short pairs for the recognizer's valid-number path.
//!
//! A general match that fails whole-number parsing is split at each space
//! and slash and the segments are retried, which is how `"12345 / 67890"`
//! turns into two candidates with correct absolute offsets.

use tracing::error;

use crate::pattern::find_all;
use crate::phone::grammar::{digit_count, ParsedNumber, PhoneGrammar};
use crate::store::RuleStore;
use crate::text::ScanText;

const MIN_NUMBER_DIGITS: usize = 5;

/// A general-scan candidate still carrying its parse result.
#[derive(Debug, Clone)]
pub(crate) struct FoundNumber {
    pub begin: usize,
    pub end: usize,
    pub content: String,
    pub parsed: ParsedNumber,
}

/// A recognized phone-number span. Offsets are char indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneSpan {
    pub begin: usize,
    pub end: usize,
    pub content: String,
}

/// Runs the general find rule and returns every parsable candidate.
pub(crate) fn find_numbers(
    text: &ScanText,
    store: &RuleStore,
    grammar: &dyn PhoneGrammar,
) -> Vec<FoundNumber> {
    let rules = store.find_rules();
    if rules.len() < 2 {
        error!("phone scan needs a general find rule");
        return Vec::new();
    }
    let general = &rules[rules.len() - 2];
    let region = store.region();
    let mut out = Vec::new();
    for span in find_all(&general.pattern, text) {
        let whole = text.slice(span.clone()).to_owned();
        if add_phone_number(&whole, span.start, &mut out, grammar, region) {
            continue;
        }
        if !whole.contains(' ') && !whole.contains('/') {
            continue;
        }
        // The whole match is not one number; retry each delimited segment.
        let mut search_byte = 0usize;
        let mut search_char = 0usize;
        loop {
            let rest = &whole[search_byte..];
            let cut = match (rest.find(' '), rest.find('/')) {
                (None, None) => break,
                (Some(sp), None) => sp,
                (None, Some(sl)) => sl,
                (Some(sp), Some(sl)) => sp.min(sl),
            };
            let segment = &rest[..cut];
            add_phone_number(segment, span.start + search_char, &mut out, grammar, region);
            search_char += segment.chars().count() + 1;
            search_byte += cut + 1;
        }
        add_phone_number(
            &whole[search_byte..],
            span.start + search_char,
            &mut out,
            grammar,
            region,
        );
    }
    out
}

/// Accepts `number` when it has enough digits, parses, and is either
/// undelimited or fully valid. Returns whether it was accepted.
fn add_phone_number(
    number: &str,
    start: usize,
    out: &mut Vec<FoundNumber>,
    grammar: &dyn PhoneGrammar,
    region: &str,
) -> bool {
    if digit_count(number) < MIN_NUMBER_DIGITS {
        return false;
    }
    let Some(parsed) = grammar.parse(number, region) else {
        return false;
    };
    if (!number.contains(' ') && !number.contains('/')) || grammar.is_valid(&parsed, region) {
        out.push(FoundNumber {
            begin: start,
            end: start + number.chars().count(),
            content: number.to_owned(),
            parsed,
        });
        return true;
    }
    false
}

/// Runs the short-code find rule over `text`.
pub(crate) fn find_short_numbers(
    text: &ScanText,
    store: &RuleStore,
    grammar: &dyn PhoneGrammar,
) -> Vec<PhoneSpan> {
    let Some(short_rule) = store.find_rules().last() else {
        error!("short number scan has no find rules");
        return Vec::new();
    };
    let region = store.region();
    let mut out = Vec::new();
    for span in find_all(&short_rule.pattern, text) {
        let content = text.slice(span.clone());
        let Some(parsed) = grammar.parse(content, region) else {
            continue;
        };
        if grammar.is_possible_short(&parsed, region) {
            out.push(PhoneSpan {
                begin: span.start,
                end: span.end,
                content: content.to_owned(),
            });
        }
    }
    out
}
