//! Rule storage and loading.
//!
//! Recognition is driven entirely by data: regex rules grouped into named
//! categories, loaded once from a JSON *rule pack* and never mutated
//! afterwards. The store is the only component that touches configuration;
//! the finders and merge passes see compiled regexes and numeric ids.
//!
//! ## How the parts work together
//!
//! ```text
//! pack JSON ── pack::RawPack (serde)          (pack.rs)
//!                    │
//!                    │  compile: interpolate {{params}},
//!                    │  wrap alternatives, build regexes,
//!                    │  warn + skip anything uncompilable
//!                    v
//!              RuleStore
//!                ├─ phone categories: negative / border / codes /
//!                │                    positive / find
//!                ├─ datetime categories: universe / locale / sub /
//!                │                       filter / past
//!                ├─ priority overrides (rule id -> level)
//!                └─ named auxiliary patterns ("datetime", "period",
//!                                             "brackets")
//! ```
//!
//! ## Responsibilities by module
//!
//! - `pack.rs`: the serde schema for rule packs, pattern compilation and
//!   parameter interpolation.
//! - `defaults.rs`: the built-in pack used when the caller does not supply
//!   one.
//!
//! A `RuleStore` is immutable after construction and safe to share across
//! concurrent recognition calls.

#[path = "store/defaults.rs"]
mod defaults;
#[path = "store/pack.rs"]
mod pack;

#[allow(unused_imports)]
pub use defaults::DEFAULT_PACK;
#[allow(unused_imports)]
pub use pack::{PackError, RawPack};

use std::collections::HashMap;

use regex::Regex;

/// Numeric rule identifier. Datetime classification and priority derive from
/// fixed id bands, so the id is part of the rule contract, not an internal
/// handle.
pub type RuleId = u32;

/// How a border rule rejects a phone candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    /// Reject only when the border match fully contains the candidate.
    Contains,
    /// Reject on full containment or partial overlap.
    ContainsOrIntersects,
}

/// Which validation a codes rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    Default,
    PrefixSuffix,
    Code,
    RawString,
}

/// Which finalization a positive rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Default,
    Operator,
    Blank,
    Slant,
    StartWithMobile,
    EndWithMobile,
}

#[derive(Debug)]
pub struct NegativeRule {
    pub pattern: Regex,
}

#[derive(Debug)]
pub struct BorderRule {
    pub pattern: Regex,
    pub kind: BorderKind,
}

#[derive(Debug, Clone, Copy)]
pub struct CodeRule {
    pub kind: ValidationKind,
}

#[derive(Debug)]
pub struct PositiveRule {
    pub pattern: Regex,
    pub handler: HandlerKind,
}

#[derive(Debug)]
pub struct FindRule {
    pub pattern: Regex,
}

/// A datetime scan rule: the id selects type band, priority band and any
/// sub-rule splitting; the pattern produces raw candidate spans.
#[derive(Debug)]
pub struct DateTimeRule {
    pub id: RuleId,
    pub pattern: Regex,
}

/// Compiled rule pack. Read-only after construction.
#[derive(Debug)]
pub struct RuleStore {
    region: String,
    locale: String,
    fallback_scan: bool,
    negative: Vec<NegativeRule>,
    border: Vec<BorderRule>,
    codes: Vec<CodeRule>,
    positive: Vec<PositiveRule>,
    find: Vec<FindRule>,
    universe: Vec<DateTimeRule>,
    locale_rules: Vec<DateTimeRule>,
    subs: HashMap<RuleId, Vec<DateTimeRule>>,
    filter: Vec<DateTimeRule>,
    past: Vec<DateTimeRule>,
    levels: HashMap<RuleId, i32>,
    separators: Vec<String>,
    patterns: HashMap<String, Regex>,
}

impl RuleStore {
    /// Builds a store from rule-pack JSON. Regexes that fail to compile are
    /// logged and skipped; only malformed JSON is an error.
    pub fn from_pack_str(json: &str) -> Result<Self, PackError> {
        let raw: RawPack = serde_json::from_str(json)?;
        Ok(pack::compile(raw))
    }

    /// Builds a store from a rule-pack file.
    pub fn from_pack_file(path: &std::path::Path) -> Result<Self, PackError> {
        let json = std::fs::read_to_string(path).map_err(|source| PackError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_pack_str(&json)
    }

    /// Phone region the pack targets, e.g. "CN".
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Datetime locale the pack targets, e.g. "en".
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// True when the pack carries no phone filtering rules at all. The phone
    /// recognizer then runs a reduced scan: find rules plus base validation,
    /// with no redaction or rule pipeline.
    pub fn fallback_scan(&self) -> bool {
        self.fallback_scan
    }

    pub fn negative_rules(&self) -> &[NegativeRule] {
        &self.negative
    }

    pub fn border_rules(&self) -> &[BorderRule] {
        &self.border
    }

    pub fn codes_rules(&self) -> &[CodeRule] {
        &self.codes
    }

    pub fn positive_rules(&self) -> &[PositiveRule] {
        &self.positive
    }

    /// Find rules in pack order. The last entry scans short numbers, the one
    /// before it scans general numbers; with exactly three entries the first
    /// doubles as the probe for short-number pairs.
    pub fn find_rules(&self) -> &[FindRule] {
        &self.find
    }

    pub fn universe_rules(&self) -> &[DateTimeRule] {
        &self.universe
    }

    pub fn locale_rules(&self) -> &[DateTimeRule] {
        &self.locale_rules
    }

    /// Sub rules that re-scan the span matched by `parent`, replacing it.
    pub fn sub_rules(&self, parent: RuleId) -> Option<&[DateTimeRule]> {
        self.subs.get(&parent).map(Vec::as_slice)
    }

    /// Clearing rules: any candidate fully inside one of their matches is
    /// dropped.
    pub fn filter_rules(&self) -> &[DateTimeRule] {
        &self.filter
    }

    /// Past rules: remove one adjacent candidate per match. Ids below 200
    /// ask for adjacency on the left of the candidate, higher ids on the
    /// right.
    pub fn past_rules(&self) -> &[DateTimeRule] {
        &self.past
    }

    /// Per-rule priority override, defaulting to 1. The full priority adds a
    /// base derived from the rule-id band.
    pub fn priority_level(&self, id: RuleId) -> i32 {
        self.levels.get(&id).copied().unwrap_or(1)
    }

    /// Auxiliary named pattern ("datetime", "period", "brackets"), if the
    /// pack defines it and it compiled.
    pub fn compiled_pattern(&self, name: &str) -> Option<&Regex> {
        self.patterns.get(name)
    }

    /// Whether `text` counts as a relative-date separator for this locale:
    /// whitespace only, or one of the configured separator strings.
    pub fn is_relative_separator(&self, text: &str) -> bool {
        let trimmed = text.trim();
        trimmed.is_empty() || self.separators.iter().any(|s| s == trimmed)
    }

    pub(crate) fn from_compiled(parts: pack::CompiledPack) -> Self {
        let pack::CompiledPack {
            region,
            locale,
            negative,
            border,
            codes,
            positive,
            find,
            universe,
            locale_rules,
            subs,
            filter,
            past,
            levels,
            separators,
            patterns,
        } = parts;
        let fallback_scan =
            negative.is_empty() && border.is_empty() && codes.is_empty() && positive.is_empty();
        Self {
            region,
            locale,
            fallback_scan,
            negative,
            border,
            codes,
            positive,
            find,
            universe,
            locale_rules,
            subs,
            filter,
            past,
            levels,
            separators,
            patterns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_pack_compiles() {
        let store = RuleStore::from_pack_str(DEFAULT_PACK).unwrap();
        assert!(!store.fallback_scan());
        assert!(store.find_rules().len() >= 2);
        assert!(!store.universe_rules().is_empty());
        assert!(store.compiled_pattern("datetime").is_some());
        assert!(store.compiled_pattern("period").is_some());
        assert!(store.compiled_pattern("brackets").is_some());
        assert!(store.compiled_pattern("no-such-pattern").is_none());
    }

    #[test]
    fn priority_level_defaults_to_one() {
        let store = RuleStore::from_pack_str(DEFAULT_PACK).unwrap();
        assert_eq!(store.priority_level(99_999), 1);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = RuleStore::from_pack_str("{not json").unwrap_err();
        assert!(matches!(err, PackError::Json(_)));
    }

    #[test]
    fn bad_regex_is_skipped_not_fatal() {
        let store = RuleStore::from_pack_str(
            r#"{
                "phone": {
                    "region": "CN",
                    "negative": [{"pattern": "([unclosed"}, {"pattern": "ok\\d+"}],
                    "find": [{"pattern": "\\d+"}, {"pattern": "\\d{3,6}"}]
                },
                "datetime": {"locale": "en"}
            }"#,
        )
        .unwrap();
        assert_eq!(store.negative_rules().len(), 1);
    }

    #[test]
    fn relative_separator_accepts_whitespace_and_configured() {
        let store = RuleStore::from_pack_str(
            r#"{
                "phone": {"region": "CN"},
                "datetime": {"locale": "en", "relative_separators": [","]}
            }"#,
        )
        .unwrap();
        assert!(store.is_relative_separator("   "));
        assert!(store.is_relative_separator(" , "));
        assert!(!store.is_relative_separator(" ; "));
    }

    #[test]
    fn empty_phone_categories_enable_fallback_scan() {
        let store = RuleStore::from_pack_str(
            r#"{
                "phone": {"region": "ZZ", "find": [{"pattern": "\\d+"}, {"pattern": "\\d{3,6}"}]},
                "datetime": {"locale": "en"}
            }"#,
        )
        .unwrap();
        assert!(store.fallback_scan());
    }
}
