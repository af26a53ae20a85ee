//! Merge and removal passes.
//!
//! Pass order is fixed: overlap resolution, date-run joining, date+time
//! joining, period joining, punctuation joining, clearing, past guards.
//! Each pass consumes and returns the working list; the joining passes
//! assume the list is sorted by span start. A missing auxiliary pattern
//! degrades the check that wanted it to "no match" and the pass carries
//! on.

use std::ops::Range;

use tracing::debug;

use crate::datetime::classify::{classify, full_level, is_date_like, DateTimeKind};
use crate::datetime::finder::{self, Candidate, DateTimeSpan};
use crate::datetime::PAST_SUFFIX_THRESHOLD;
use crate::store::{RuleId, RuleStore};
use crate::text::ScanText;

/// Outcome of the look-ahead date check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateCombine {
    None,
    Two,
    All,
}

/// Full datetime recognition over one text.
pub(crate) fn recognize_datetimes(text: &ScanText, store: &RuleStore) -> Vec<DateTimeSpan> {
    let candidates = finder::scan(text, store);
    if candidates.is_empty() {
        return Vec::new();
    }
    debug!(count = candidates.len(), "datetime candidates found");
    let clears = finder::clear_spans(text, store);
    let pasts = finder::past_spans(text, store);
    filter_candidates(text, store, candidates, &clears, &pasts)
        .into_iter()
        .map(|c| DateTimeSpan {
            begin: c.begin,
            end: c.end,
            kind: c.kind,
        })
        .collect()
}

/// The merge pipeline proper, re-runnable on its own output.
pub(crate) fn filter_candidates(
    text: &ScanText,
    store: &RuleStore,
    candidates: Vec<Candidate>,
    clears: &[Range<usize>],
    pasts: &[(RuleId, Range<usize>)],
) -> Vec<Candidate> {
    if candidates.is_empty() {
        return candidates;
    }
    let mut matches = resolve_overlaps(candidates, store);
    matches = join_dates(text, store, matches);
    matches = join_date_times(text, store, matches);
    matches = join_periods(text, store, matches);
    matches = join_on_punctuation(text, matches);
    matches = drop_cleared(matches, clears);
    drop_past(matches, pasts)
}

fn resolve_overlaps(candidates: Vec<Candidate>, store: &RuleStore) -> Vec<Candidate> {
    let kept = prefer_higher_priority(candidates, store);
    let mut kept = prefer_wider(kept);
    kept.sort_by_key(|c| c.begin);
    kept
}

/// Resolves duplicate and straddling matches by rule priority; ties keep
/// the earlier candidate.
fn prefer_higher_priority(candidates: Vec<Candidate>, store: &RuleStore) -> Vec<Candidate> {
    let mut kept: Vec<Candidate> = Vec::new();
    for cand in candidates {
        let mut valid = true;
        let mut i = 0;
        while i < kept.len() {
            let cur = &kept[i];
            let duplicate = cur.begin == cand.begin && cur.end == cand.end;
            let straddles = (cur.begin < cand.begin && cand.begin < cur.end && cur.end < cand.end)
                || (cand.begin < cur.begin && cur.begin < cand.end && cand.end < cur.end);
            if !duplicate && !straddles {
                i += 1;
                continue;
            }
            if full_level(cur.id, store) >= full_level(cand.id, store) {
                valid = false;
                i += 1;
            } else {
                kept.remove(i);
            }
        }
        if valid {
            kept.push(cand);
        }
    }
    kept
}

/// Removes candidates fully nested inside another; the wider span wins.
fn prefer_wider(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut kept: Vec<Candidate> = Vec::new();
    for cand in candidates {
        let mut valid = true;
        let mut i = 0;
        while i < kept.len() {
            let cur = &kept[i];
            if (cur.begin > cand.begin && cur.end <= cand.end)
                || (cur.begin == cand.begin && cur.end < cand.end)
            {
                kept.remove(i);
            } else if cur.begin <= cand.begin && cur.end >= cand.end {
                valid = false;
                i += 1;
            } else {
                i += 1;
            }
        }
        if valid {
            kept.push(cand);
        }
    }
    kept
}

/// Joins runs of up to three date-like candidates separated by relative
/// separators or a bracketed restatement. Standalone week and today
/// candidates keep their kind; joined runs become plain dates.
fn join_dates(text: &ScanText, store: &RuleStore, matches: Vec<Candidate>) -> Vec<Candidate> {
    let mut result = Vec::new();
    let mut i = 0;
    while i < matches.len() {
        let mut current = matches[i].clone();
        current.kind = classify(current.id);
        if !is_date_like(current.kind) {
            result.push(current);
            i += 1;
            continue;
        }
        let rest = &matches[i + 1..matches.len().min(i + 3)];
        if rest.is_empty() {
            result.push(current);
            i += 1;
            continue;
        }
        match chained_dates(text, store, &current, rest, None) {
            DateCombine::None => {
                result.push(current);
                i += 1;
                continue;
            }
            DateCombine::Two => i += 1,
            DateCombine::All => i += 2,
        }
        current.kind = DateTimeKind::Date;
        extend_over_brackets(text, &matches[i], &mut current);
        result.push(current);
        i += 1;
    }
    result
}

/// Whether `current` combines with the next candidate, and transitively
/// with the one after it. Two equal kinds in a row never combine, nor does
/// a kind repeating the one before `current`.
fn chained_dates(
    text: &ScanText,
    store: &RuleStore,
    current: &Candidate,
    rest: &[Candidate],
    prev_kind: Option<DateTimeKind>,
) -> DateCombine {
    let next = &rest[0];
    let next_kind = classify(next.id);
    if !is_date_like(next_kind) {
        return DateCombine::None;
    }
    if next_kind == classify(current.id) || Some(next_kind) == prev_kind {
        return DateCombine::None;
    }
    combine_result(text, store, current, next, rest)
}

fn combine_result(
    text: &ScanText,
    store: &RuleStore,
    current: &Candidate,
    next: &Candidate,
    rest: &[Candidate],
) -> DateCombine {
    let between = text.slice(current.end..next.begin);
    let relative = store.is_relative_separator(between);
    if !relative && between.trim() != "(" {
        return DateCombine::None;
    }
    let mut is_three = false;
    if rest.len() > 1 {
        let chained = chained_dates(text, store, next, &rest[1..], Some(classify(current.id)));
        is_three = chained == DateCombine::Two;
    }
    let mut is_brackets = false;
    if between.trim() == "(" {
        if let Some(re) = store.compiled_pattern("brackets") {
            let tail = text.slice(current.end..text.char_len());
            let group = re
                .captures(tail)
                .and_then(|caps| caps.get(1))
                .map_or("", |g| g.as_str());
            let end = if is_three { rest[1].end } else { next.end };
            if !group.is_empty() && group.trim() == text.slice(next.begin..end).trim() {
                is_brackets = true;
            }
        }
    }
    if relative || is_brackets {
        if is_three {
            DateCombine::All
        } else {
            DateCombine::Two
        }
    } else {
        DateCombine::None
    }
}

/// Extends a combined date run over a trailing close bracket when the run
/// ends just before one, then adopts the last member's end.
fn extend_over_brackets(text: &ScanText, last: &Candidate, current: &mut Candidate) {
    let mut add = 0;
    if let Some(open) = text.find_char('(', current.end) {
        if open < last.begin {
            if let Some(close) = text.find_char(')', last.end) {
                if text.slice(last.end..close + 1).trim() == ")" {
                    add = close - last.end + 1;
                }
            }
        }
    }
    current.end = last.end + add;
}

/// Pairs where a date-like span and a time span can merge.
fn date_time_pair(left: &Candidate, right: &Candidate) -> bool {
    (is_date_like(left.kind) && right.kind == DateTimeKind::Time)
        || (is_date_like(left.kind)
            && right.kind == DateTimeKind::TimePeriod
            && right.is_time_period())
        || (left.kind == DateTimeKind::Time && is_date_like(right.kind))
        || (left.kind == DateTimeKind::TimePeriod
            && left.is_time_period()
            && is_date_like(right.kind))
}

/// Merges adjacent date and time spans joined by the locale's datetime
/// joiner, or failing that by a bracketed restatement. Merged spans stay
/// in place so a chain can keep absorbing neighbours.
fn join_date_times(
    text: &ScanText,
    store: &RuleStore,
    mut matches: Vec<Candidate>,
) -> Vec<Candidate> {
    let joiner = store.compiled_pattern("datetime");
    if joiner.is_none() {
        debug!("rule pack has no datetime joiner pattern");
    }
    let mut last = 0;
    let mut index = 1;
    while index < matches.len() {
        let mut merged = false;
        let left = matches[last].clone();
        let right = matches[index].clone();
        if date_time_pair(&left, &right) {
            let between = text.slice(left.end..right.begin);
            let is_joiner =
                between.trim().is_empty() || joiner.is_some_and(|re| re.is_match(between));
            if is_joiner {
                let kind = if (is_date_like(left.kind) && right.kind == DateTimeKind::Time)
                    || (left.kind == DateTimeKind::Time && is_date_like(right.kind))
                {
                    DateTimeKind::DateTime
                } else {
                    DateTimeKind::TimePeriod
                };
                matches[last].end = right.end;
                matches[last].kind = kind;
                matches.remove(index);
                merged = true;
            }
        }
        if !merged {
            merged = join_bracketed(text, store, &mut matches, last, index, &left, &right);
        }
        if !merged {
            last = index;
            index += 1;
        }
    }
    matches
}

/// Bracket fallback for the date+time stage: a time restated in brackets
/// right after another span, or a date wrapped in brackets just before a
/// time.
fn join_bracketed(
    text: &ScanText,
    store: &RuleStore,
    matches: &mut Vec<Candidate>,
    last: usize,
    index: usize,
    left: &Candidate,
    right: &Candidate,
) -> bool {
    if left.kind == DateTimeKind::Time {
        let Some(re) = store.compiled_pattern("brackets") else {
            debug!("rule pack has no brackets pattern");
            return false;
        };
        let tail = text.slice(left.end..text.char_len());
        let Some(caps) = re.captures(tail) else {
            return false;
        };
        let group = caps.get(1).map_or("", |g| g.as_str());
        let added = caps[0].chars().count();
        if !group.is_empty() && group.trim() == text.slice(right.begin..right.end).trim() {
            matches[last].end = left.end + added;
            matches[last].kind = DateTimeKind::DateTime;
            matches.remove(index);
            return true;
        }
    } else if is_date_like(left.kind) && right.kind == DateTimeKind::Time {
        let head = text.slice(0..left.begin);
        let between = text.slice(left.end..right.begin);
        if head.trim().ends_with('(') && between.trim() == ")" {
            if let Some(open) = text.rfind_char('(', left.begin) {
                matches[last].begin = open;
                matches[last].end = right.end;
                matches[last].kind = DateTimeKind::DateTime;
                matches.remove(index);
                return true;
            }
        }
    }
    false
}

/// Merges adjacent date-like pairs, sibling times or date-times, or a
/// date-time followed by a time, into a period when the between-text is a
/// period joiner. Week and today spans count as dates here.
fn join_periods(text: &ScanText, store: &RuleStore, mut matches: Vec<Candidate>) -> Vec<Candidate> {
    let Some(joiner) = store.compiled_pattern("period") else {
        debug!("rule pack has no period joiner pattern");
        return matches;
    };
    let mut current = 0;
    let mut index = 1;
    while index < matches.len() {
        let left = matches[current].clone();
        let right = matches[index].clone();
        let pair = (is_date_like(left.kind) && is_date_like(right.kind))
            || (left.kind == right.kind
                && matches!(left.kind, DateTimeKind::Time | DateTimeKind::DateTime))
            || (left.kind == DateTimeKind::DateTime && right.kind == DateTimeKind::Time);
        if pair && joiner.is_match(text.slice(left.end..right.begin)) {
            matches[current].end = right.end;
            matches[current].kind = DateTimeKind::TimePeriod;
            matches[current].time_period = left.kind == DateTimeKind::Time;
            matches.remove(index);
        } else {
            current = index;
            index += 1;
        }
    }
    matches
}

/// Same pairing as the date+time stage, but triggered only by a bare comma
/// between the spans.
fn join_on_punctuation(text: &ScanText, mut matches: Vec<Candidate>) -> Vec<Candidate> {
    let mut current = 0;
    let mut index = 1;
    while index < matches.len() {
        let left = matches[current].clone();
        let right = matches[index].clone();
        let between = text.slice(left.end..right.begin).trim();
        if date_time_pair(&left, &right) && (between == "," || between == "，") {
            let kind = if (is_date_like(left.kind) && right.kind == DateTimeKind::Time)
                || left.kind == DateTimeKind::Time
            {
                DateTimeKind::DateTime
            } else {
                DateTimeKind::TimePeriod
            };
            matches[current].end = right.end;
            matches[current].kind = kind;
            matches.remove(index);
        } else {
            current = index;
            index += 1;
        }
    }
    matches
}

/// Removes candidates fully inside a clearing match.
fn drop_cleared(mut matches: Vec<Candidate>, clears: &[Range<usize>]) -> Vec<Candidate> {
    if clears.is_empty() {
        return matches;
    }
    matches.retain(|m| {
        !clears
            .iter()
            .any(|clear| m.begin >= clear.start && m.end <= clear.end)
    });
    matches
}

/// Removes at most one candidate per past match, on the side the rule id
/// selects.
fn drop_past(mut matches: Vec<Candidate>, pasts: &[(RuleId, Range<usize>)]) -> Vec<Candidate> {
    for (id, span) in pasts {
        let before_candidate = *id < PAST_SUFFIX_THRESHOLD;
        let hit = matches.iter().position(|m| {
            (before_candidate && span.end == m.begin) || (!before_candidate && span.start == m.end)
        });
        if let Some(pos) = hit {
            matches.remove(pos);
        }
    }
    matches
}
