//! Date and time recognition.
//!
//! Finds date, time, date-time and period spans by scanning the rule
//! store's datetime categories and merging neighbouring candidates. The
//! phone side lives in [`crate::phone`].
//!
//! ## How the parts work together
//!
//! ```text
//! input ── universe + locale rules ──> raw candidates        (finder.rs)
//!                 │        (sub rules split composite matches)
//!                 v
//! overlap resolution ── priority, then containment ── sort    (merge.rs)
//!                 │
//!                 v
//! date-run joining ── date+time joining ── period joining
//!                 ── punctuation joining                      (merge.rs)
//!                 │
//!                 v
//! clearing rules ── past guards ──> DateTimeSpan*             (merge.rs)
//! ```
//!
//! Candidates never overlap once the merge passes finish; every joining
//! pass works on a list sorted by span start.
//!
//! ## Responsibilities by module
//!
//! - `classify.rs`: rule-id bands to [`DateTimeKind`] and priority levels.
//! - `finder.rs`: the raw candidate scan, sub-rule splitting and the
//!   clear/past match scans.
//! - `merge.rs`: the merge and removal passes, in their fixed order.
//!
//! Offsets in [`DateTimeSpan`] are char indices into the scanned text.

#[path = "datetime/classify.rs"]
mod classify;
#[path = "datetime/finder.rs"]
mod finder;
#[path = "datetime/merge.rs"]
mod merge;

#[allow(unused_imports)]
pub use classify::DateTimeKind;
#[allow(unused_imports)]
pub use finder::DateTimeSpan;
#[allow(unused_imports)]
pub(crate) use merge::recognize_datetimes;

use crate::store::RuleId;

/// Past rules with ids below this threshold must end where a candidate
/// begins to remove it; rules at or above it must begin where a candidate
/// ends.
pub(crate) const PAST_SUFFIX_THRESHOLD: RuleId = 200;

#[cfg(test)]
#[path = "datetime/tests.rs"]
mod tests;
