//! Phone number recognition.
//!
//! Finds phone-number spans in free text by running the rule store's phone
//! categories over a char-indexed buffer. Nothing here understands calendar
//! text; the date-time side lives in [`crate::datetime`].
//!
//! ## How the parts work together
//!
//! ```text
//! input ──────────────────────────────┐
//!                                     v
//! negative rules ── redact ──> filtered buffer        (filters.rs)
//!                                     │
//!                                     v
//! find rules ── whole match / segment split ──> FoundNumber*   (finder.rs)
//!                                     │
//!         border check ── codes validation            (filters.rs)
//!                                     │
//!         valid number ──> keep span (+ short/short probe)
//!         otherwise ─────> positive handlers          (filters.rs)
//!                                     │
//!                                     v
//! PhoneSpan* ── + short number scan ── dedup ── bracket fixup  (recognizer.rs)
//! ```
//!
//! Every accepted span is redacted out of the filtered buffer before the
//! next candidate is considered, so one stretch of digits is never claimed
//! twice. The short-number scan runs last, over whatever digits survived.
//!
//! ## Responsibilities by module
//!
//! - `grammar.rs`: the [`PhoneGrammar`] trait and the built-in digit-string
//!   heuristic standing in for a full numbering-plan library.
//! - `finder.rs`: candidate discovery with the find rules, including the
//!   space/slash segment split for strings that fail whole-number parsing.
//! - `filters.rs`: negative redaction, border windows, codes validation and
//!   the positive handler family.
//! - `recognizer.rs`: the orchestration loop tying the stages together.
//!
//! Offsets in [`PhoneSpan`] are char indices into the normalized input.

#[path = "phone/filters.rs"]
mod filters;
#[path = "phone/finder.rs"]
mod finder;
#[path = "phone/grammar.rs"]
mod grammar;
#[path = "phone/recognizer.rs"]
mod recognizer;

#[allow(unused_imports)]
pub use finder::PhoneSpan;
#[allow(unused_imports)]
pub use grammar::{DigitGrammar, ParsedNumber, PhoneGrammar};
#[allow(unused_imports)]
pub(crate) use recognizer::recognize_phones;

#[cfg(test)]
#[path = "phone/tests.rs"]
mod tests;
