//! Rule-id bands.
//!
//! Datetime rule ids carry their meaning in fixed numeric bands, so a
//! candidate's kind and priority are always recomputed from its id instead
//! of being stored. The same id must classify the same way in every pass.

use crate::store::{RuleId, RuleStore};

/// What a recognized span denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTimeKind {
    /// A calendar date, or several joined into one span.
    Date,
    /// A clock time.
    Time,
    /// A date and a time joined into one span.
    DateTime,
    /// A span bounded by two times, or matched by a period-band rule.
    TimePeriod,
    /// A weekday reference, standalone or a "next week" style phrase.
    Week,
    /// A "today" or "tonight" style reference.
    Today,
}

/// Maps a rule id to its kind. The week and today ids sit inside the date
/// band and are checked first.
pub(crate) fn classify(id: RuleId) -> DateTimeKind {
    match id {
        20_009 | 20_011 | 21_026 => DateTimeKind::Week,
        20_010 => DateTimeKind::Today,
        20_000..=29_999 => DateTimeKind::Date,
        30_000..=39_999 => DateTimeKind::Time,
        10_000..=19_999 => DateTimeKind::DateTime,
        _ => DateTimeKind::TimePeriod,
    }
}

/// Kinds that denote a calendar day rather than a clock time.
pub(crate) fn is_date_like(kind: DateTimeKind) -> bool {
    matches!(
        kind,
        DateTimeKind::Date | DateTimeKind::Week | DateTimeKind::Today
    )
}

/// Priority used to resolve overlapping candidates: a base from the id
/// band plus the pack's per-rule override, which defaults to 1.
pub(crate) fn full_level(id: RuleId, store: &RuleStore) -> i32 {
    let base = match id {
        10_000..=19_999 => 10,
        20_000..=39_999 => 20,
        _ => 30,
    };
    base + store.priority_level(id)
}
