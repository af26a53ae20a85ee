//! Rule-pack schema and compilation.
//!
//! A pack is one JSON document with a `phone` and a `datetime` half. Raw
//! pattern strings may reference named parameters as `{{name}}`; each
//! alternative of the substituted value is wrapped in a word-boundary mark
//! (`\b`, or the pack's delimiter for locales where `\b` is meaningless)
//! unless the alternative already carries one or ends with a regex `.`.
//!
//! Compilation never fails on a bad pattern: the offending rule is logged
//! and skipped, and recognition runs with the remaining rules. Only
//! malformed JSON or an unreadable file aborts loading.

use std::collections::HashMap;
use std::path::PathBuf;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use super::{
    BorderKind, BorderRule, CodeRule, DateTimeRule, FindRule, HandlerKind, NegativeRule,
    PositiveRule, RuleId, RuleStore, ValidationKind,
};

#[derive(Debug, Error)]
pub enum PackError {
    #[error("failed to read rule pack {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed rule pack JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
pub struct RawPack {
    pub phone: RawPhone,
    pub datetime: RawDateTime,
}

#[derive(Debug, Deserialize)]
pub struct RawPhone {
    pub region: String,
    #[serde(default)]
    pub negative: Vec<RawPattern>,
    #[serde(default)]
    pub border: Vec<RawBorder>,
    #[serde(default)]
    pub codes: Vec<RawCode>,
    #[serde(default)]
    pub positive: Vec<RawPositive>,
    #[serde(default)]
    pub find: Vec<RawPattern>,
}

#[derive(Debug, Deserialize)]
pub struct RawDateTime {
    pub locale: String,
    #[serde(default)]
    pub params: HashMap<String, String>,
    #[serde(default)]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub relative_separators: Vec<String>,
    #[serde(default)]
    pub short_date_order: Option<String>,
    #[serde(default)]
    pub universe: Vec<RawDateTimeRule>,
    #[serde(default)]
    pub locale_rules: Vec<RawDateTimeRule>,
    #[serde(default)]
    pub subs: HashMap<String, Vec<RawDateTimeRule>>,
    #[serde(default)]
    pub filter: Vec<RawDateTimeRule>,
    #[serde(default)]
    pub past: Vec<RawDateTimeRule>,
    #[serde(default)]
    pub patterns: HashMap<String, RawPattern>,
}

#[derive(Debug, Deserialize)]
pub struct RawPattern {
    pub pattern: String,
    #[serde(default)]
    pub insensitive: bool,
}

#[derive(Debug, Deserialize)]
pub struct RawBorder {
    pub pattern: String,
    #[serde(default = "default_border_kind")]
    pub kind: String,
    #[serde(default)]
    pub insensitive: bool,
}

fn default_border_kind() -> String {
    "contains".to_owned()
}

#[derive(Debug, Deserialize)]
pub struct RawCode {
    pub valid: String,
}

#[derive(Debug, Deserialize)]
pub struct RawPositive {
    pub pattern: String,
    pub handle: String,
    #[serde(default)]
    pub insensitive: bool,
}

#[derive(Debug, Deserialize)]
pub struct RawDateTimeRule {
    pub id: RuleId,
    pub pattern: String,
    #[serde(default)]
    pub insensitive: bool,
    #[serde(default)]
    pub level: Option<i32>,
}

/// Everything [`RuleStore`] needs, in compiled form.
pub(super) struct CompiledPack {
    pub region: String,
    pub locale: String,
    pub negative: Vec<NegativeRule>,
    pub border: Vec<BorderRule>,
    pub codes: Vec<CodeRule>,
    pub positive: Vec<PositiveRule>,
    pub find: Vec<FindRule>,
    pub universe: Vec<DateTimeRule>,
    pub locale_rules: Vec<DateTimeRule>,
    pub subs: HashMap<RuleId, Vec<DateTimeRule>>,
    pub filter: Vec<DateTimeRule>,
    pub past: Vec<DateTimeRule>,
    pub levels: HashMap<RuleId, i32>,
    pub separators: Vec<String>,
    pub patterns: HashMap<String, Regex>,
}

pub(super) fn compile(raw: RawPack) -> RuleStore {
    let negative = raw
        .phone
        .negative
        .iter()
        .filter_map(|r| {
            compile_regex(&r.pattern, r.insensitive, "negative")
                .map(|pattern| NegativeRule { pattern })
        })
        .collect();
    let border = raw
        .phone
        .border
        .iter()
        .filter_map(|r| {
            compile_regex(&r.pattern, r.insensitive, "border").map(|pattern| BorderRule {
                pattern,
                kind: border_kind(&r.kind),
            })
        })
        .collect();
    let codes = raw
        .phone
        .codes
        .iter()
        .map(|r| CodeRule {
            kind: validation_kind(&r.valid),
        })
        .collect();
    let positive = raw
        .phone
        .positive
        .iter()
        .filter_map(|r| {
            compile_regex(&r.pattern, r.insensitive, "positive").map(|pattern| PositiveRule {
                pattern,
                handler: handler_kind(&r.handle),
            })
        })
        .collect();
    let find = raw
        .phone
        .find
        .iter()
        .filter_map(|r| {
            compile_regex(&r.pattern, r.insensitive, "find").map(|pattern| FindRule { pattern })
        })
        .collect();

    let dt = &raw.datetime;
    let mark = dt.delimiter.clone().unwrap_or_else(|| r"\b".to_owned());
    let mut levels: HashMap<RuleId, i32> = HashMap::new();
    apply_short_date_levels(dt.short_date_order.as_deref(), &mut levels);

    let universe = compile_datetime_rules(&dt.universe, &dt.params, &mark, &mut levels, "universe");
    let locale_rules =
        compile_datetime_rules(&dt.locale_rules, &dt.params, &mark, &mut levels, "locale");
    let filter = compile_datetime_rules(&dt.filter, &dt.params, &mark, &mut levels, "filter");
    let past = compile_datetime_rules(&dt.past, &dt.params, &mark, &mut levels, "past");

    let mut subs: HashMap<RuleId, Vec<DateTimeRule>> = HashMap::new();
    for (key, rules) in &dt.subs {
        let Ok(parent) = key.parse::<RuleId>() else {
            warn!(parent = key.as_str(), "sub rule parent id is not numeric");
            continue;
        };
        // Declared sub rules replace the parent match even when none of
        // their patterns survive compilation.
        subs.insert(
            parent,
            compile_datetime_rules(rules, &dt.params, &mark, &mut levels, "sub"),
        );
    }

    let mut patterns = HashMap::new();
    for (name, raw_pattern) in &dt.patterns {
        let Some(expanded) = interpolate(&raw_pattern.pattern, &dt.params, &mark) else {
            continue;
        };
        // The joiner patterns are full-match tests; anchor them here so the
        // merge passes can use plain `is_match`.
        let source = match name.as_str() {
            "datetime" | "period" => format!("^(?:{expanded})$"),
            _ => expanded,
        };
        if let Some(re) = compile_regex(&source, raw_pattern.insensitive, "patterns") {
            patterns.insert(name.clone(), re);
        }
    }

    RuleStore::from_compiled(CompiledPack {
        region: raw.phone.region,
        locale: dt.locale.clone(),
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
        separators: dt.relative_separators.clone(),
        patterns,
    })
}

fn compile_datetime_rules(
    rules: &[RawDateTimeRule],
    params: &HashMap<String, String>,
    mark: &str,
    levels: &mut HashMap<RuleId, i32>,
    category: &str,
) -> Vec<DateTimeRule> {
    let mut out = Vec::new();
    for rule in rules {
        if let Some(level) = rule.level {
            levels.insert(rule.id, level);
        }
        let Some(expanded) = interpolate(&rule.pattern, params, mark) else {
            continue;
        };
        let Some(pattern) = compile_regex(&expanded, rule.insensitive, category) else {
            continue;
        };
        out.push(DateTimeRule {
            id: rule.id,
            pattern,
        });
    }
    out
}

/// The three short-date rules are ambiguous between digit orders; the pack
/// declares which order its locale reads, and the order decides their
/// priority overrides.
fn apply_short_date_levels(order: Option<&str>, levels: &mut HashMap<RuleId, i32>) {
    match order {
        Some("ymd") => {
            levels.insert(20016, 1);
            levels.insert(20014, 3);
            levels.insert(20015, 2);
        }
        Some("mdy") => {
            levels.insert(20016, 2);
            levels.insert(20014, 3);
            levels.insert(20015, 1);
        }
        Some(other) => warn!(order = other, "unknown short date order"),
        None => {}
    }
}

fn compile_regex(pattern: &str, insensitive: bool, category: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern)
        .case_insensitive(insensitive)
        .build()
    {
        Ok(re) => Some(re),
        Err(err) => {
            warn!(category, pattern, %err, "skipping uncompilable rule pattern");
            None
        }
    }
}

/// Substitutes `{{name}}` references. Returns `None` (and warns) when the
/// pattern references a parameter the pack does not define.
fn interpolate(pattern: &str, params: &HashMap<String, String>, mark: &str) -> Option<String> {
    let placeholder = regex!(r"\{\{([A-Za-z0-9_]+)\}\}");
    let mut out = String::new();
    let mut last = 0usize;
    for m in placeholder.find_iter(pattern) {
        let name = &pattern[m.start() + 2..m.end() - 2];
        out.push_str(&pattern[last..m.start()]);
        match params.get(name) {
            Some(value) => out.push_str(&wrap_alternatives(value, mark)),
            None => {
                warn!(param = name, "rule references unknown parameter");
                return None;
            }
        }
        last = m.end();
    }
    out.push_str(&pattern[last..]);
    Some(out)
}

/// Wraps each `|`-alternative of a parameter value in the boundary mark, so
/// `Sat|Sun` becomes `\bSat\b|\bSun\b`. Alternatives that already start or
/// end with `\b`, or end with `.`, are left alone on that side.
fn wrap_alternatives(value: &str, mark: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    for alt in value.split('|') {
        let mut piece = String::new();
        if !alt.starts_with("\\b") {
            piece.push_str(mark);
        }
        piece.push_str(alt);
        if !alt.ends_with("\\b") && !alt.ends_with('.') {
            piece.push_str(mark);
        }
        parts.push(piece);
    }
    parts.join("|")
}

fn border_kind(raw: &str) -> BorderKind {
    match raw {
        "contains" => BorderKind::Contains,
        "contains_or_intersects" => BorderKind::ContainsOrIntersects,
        other => {
            warn!(kind = other, "unknown border kind, treating as contains");
            BorderKind::Contains
        }
    }
}

fn validation_kind(raw: &str) -> ValidationKind {
    match raw {
        "default" => ValidationKind::Default,
        "prefix_suffix" => ValidationKind::PrefixSuffix,
        "code" => ValidationKind::Code,
        "raw_string" => ValidationKind::RawString,
        other => {
            warn!(kind = other, "unknown codes validation, using default");
            ValidationKind::Default
        }
    }
}

fn handler_kind(raw: &str) -> HandlerKind {
    match raw {
        "default" => HandlerKind::Default,
        "operator" => HandlerKind::Operator,
        "blank" => HandlerKind::Blank,
        "slant" => HandlerKind::Slant,
        "start_with_mobile" => HandlerKind::StartWithMobile,
        "end_with_mobile" => HandlerKind::EndWithMobile,
        other => {
            warn!(handler = other, "unknown positive handler, using default");
            HandlerKind::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolation_wraps_alternatives() {
        let mut params = HashMap::new();
        params.insert("weekday".to_owned(), "Sat|Sun|\\bMon\\b".to_owned());
        let out = interpolate(r"on ({{weekday}})", &params, r"\b").unwrap();
        assert_eq!(out, r"on (\bSat\b|\bSun\b|\bMon\b)");
    }

    #[test]
    fn interpolation_respects_delimiter_and_dot() {
        let mut params = HashMap::new();
        params.insert("month".to_owned(), "Jan.|Feb".to_owned());
        let out = interpolate(r"({{month}})", &params, "#").unwrap();
        assert_eq!(out, "(#Jan.|#Feb#)");
    }

    #[test]
    fn unknown_parameter_drops_the_rule() {
        let params = HashMap::new();
        assert!(interpolate(r"({{missing}})", &params, r"\b").is_none());
    }

    #[test]
    fn pattern_without_placeholders_is_untouched() {
        let params = HashMap::new();
        let out = interpolate(r"\d{1,2}:\d{2}", &params, r"\b").unwrap();
        assert_eq!(out, r"\d{1,2}:\d{2}");
    }

    #[test]
    fn joiner_patterns_are_anchored() {
        let raw: RawPack = serde_json::from_str(
            r#"{
                "phone": {"region": "CN"},
                "datetime": {
                    "locale": "en",
                    "patterns": {
                        "datetime": {"pattern": "\\s*(at|,)?\\s*", "insensitive": true},
                        "brackets": {"pattern": "\\s*\\(([^)]*)\\)"}
                    }
                }
            }"#,
        )
        .unwrap();
        let store = compile(raw);
        let joiner = store.compiled_pattern("datetime").unwrap();
        assert!(joiner.is_match(" at "));
        assert!(!joiner.is_match("nope at all"));
        let brackets = store.compiled_pattern("brackets").unwrap();
        assert!(brackets.is_match("xx (15:00)"));
    }

    #[test]
    fn unknown_kind_strings_fall_back_to_default() {
        assert_eq!(border_kind("whatever"), BorderKind::Contains);
        assert_eq!(validation_kind("odd"), ValidationKind::Default);
        assert_eq!(handler_kind("odd"), HandlerKind::Default);
    }
}
