//! Negative redaction, border windows, codes validation and the positive
//! handler family.
//!
//! Codes validation answers "is this digit string shaped like a number
//! someone would dial"; it never adjusts the candidate span. The positive
//! handlers run only for candidates the grammar rejects, and each one knows
//! how to carve spans out of one awkward shape (operator prefixes, spaced
//! groups, slash pairs, keyword windows).

use regex::Regex;

use tracing::debug;

use crate::pattern::{find_all, find_all_spans, find_first_span};
use crate::phone::finder::{FoundNumber, PhoneSpan};
use crate::phone::grammar::{digit_count, PhoneGrammar};
use crate::store::{BorderKind, HandlerKind, PositiveRule, RuleStore, ValidationKind};
use crate::text::ScanText;

/// Redacted regions are overwritten with this char so offsets keep.
pub(crate) const FILLER: char = 'A';

const BORDER_RADIUS: usize = 10;

/// Blanks out every negative-rule match in place.
pub(crate) fn redact_negative(text: &mut ScanText, store: &RuleStore) {
    for rule in store.negative_rules() {
        let spans = find_all(&rule.pattern, text);
        for span in spans {
            text.redact(span, FILLER);
        }
    }
}

/// Checks the border rules against a window of [`BORDER_RADIUS`] chars on
/// each side of the candidate. Any hit rejects it.
pub(crate) fn passes_borders(
    filtered: &ScanText,
    begin: usize,
    end: usize,
    store: &RuleStore,
) -> bool {
    let rules = store.border_rules();
    if rules.is_empty() {
        return true;
    }
    let win_start = begin.saturating_sub(BORDER_RADIUS);
    let win_end = (end + BORDER_RADIUS).min(filtered.char_len());
    let window = filtered.slice(win_start..win_end);
    for rule in rules {
        for m in find_all_spans(&rule.pattern, window) {
            let b = m.start + win_start;
            let e = m.end + win_start;
            let contains = b <= begin && end <= e;
            let hit = match rule.kind {
                BorderKind::Contains => contains,
                BorderKind::ContainsOrIntersects => {
                    contains
                        || (b < begin && begin < e && e < end)
                        || (begin < b && b < end && end < e)
                }
            };
            if hit {
                return false;
            }
        }
    }
    true
}

/// Runs the codes validations in pack order; all must accept. An empty
/// codes list keeps the candidate.
pub(crate) fn validate_codes(src: &ScanText, found: &FoundNumber, store: &RuleStore) -> bool {
    let rules = store.codes_rules();
    if rules.is_empty() {
        debug!(begin = found.begin, "no codes rules, keeping candidate");
        return true;
    }
    for rule in rules {
        let ok = match rule.kind {
            ValidationKind::Default => true,
            ValidationKind::PrefixSuffix => prefix_suffix_valid(src, found.begin, found.end),
            ValidationKind::Code => code_valid(&found.content),
            ValidationKind::RawString => raw_string_valid(&found.content),
        };
        if !ok {
            return false;
        }
    }
    true
}

/// Candidates mid-text get their leading context checked; candidates at the
/// very start get their trailing context checked instead.
fn prefix_suffix_valid(message: &ScanText, begin: usize, end: usize) -> bool {
    if begin >= 1 {
        return is_valid_start(message, begin);
    }
    if end < message.char_len() {
        return is_valid_end(message, end);
    }
    true
}

/// Walks left from `begin`. An uppercase run touching the candidate marks a
/// product-code prefix and rejects it; most other neighbors accept.
fn is_valid_start(message: &ScanText, begin: usize) -> bool {
    let mut d = 0usize;
    while d < begin {
        let Some(c) = message.char_at(begin - 1 - d) else {
            return false;
        };
        if d == 0 && !c.is_uppercase() {
            return true;
        }
        if d < 2 && c.is_alphabetic() {
            if c.is_uppercase() {
                d += 1;
                continue;
            }
            return true;
        }
        if c == '-' || c == '\'' {
            return true;
        }
        if c.is_ascii_digit() || c == ' ' {
            return false;
        }
        if !c.is_alphabetic() {
            return false;
        }
        return true;
    }
    false
}

/// Mirror of [`is_valid_start`] walking right from `end`.
fn is_valid_end(message: &ScanText, end: usize) -> bool {
    let len = message.char_len();
    let mut d = 0usize;
    while end + d < len {
        let Some(c) = message.char_at(end + d) else {
            return false;
        };
        if d == 0 && !c.is_uppercase() {
            return true;
        }
        if d < 2 && c.is_alphabetic() {
            if c.is_uppercase() {
                d += 1;
                continue;
            }
            return true;
        }
        if d == 1 || d == 2 {
            if c == '-' || c == '\'' {
                return true;
            }
            if c.is_ascii_digit() || c == ' ' {
                return false;
            }
            if !c.is_alphabetic() {
                return false;
            }
            return true;
        }
        d += 1;
    }
    false
}

/// Dialing-code shape checks on the candidate text.
fn code_valid(content: &str) -> bool {
    let trimmed = content.trim();
    let number: String = match trimmed.find(";ext=") {
        Some(ind) => trimmed[..ind].to_owned(),
        None => content.to_owned(),
    };
    let number = if number.starts_with('(') || number.starts_with('[') {
        resolve_leading_bracket(&number)
    } else {
        number
    };
    number_valid(&number)
}

/// A head closed by the opener's matching bracket, with enough digits and
/// a one-or-two digit tail, is an area-code form; validation then looks
/// only inside the brackets. Anything else drops the opening bracket.
fn resolve_leading_bracket(number: &str) -> String {
    let closer = if number.starts_with('[') { ']' } else { ')' };
    match number.char_indices().find(|&(_, c)| c == closer) {
        Some((idx, _)) => {
            let head = &number[..idx];
            let tail = &number[idx..];
            if digit_count(head) > 4 && (1..=2).contains(&digit_count(tail)) {
                number[1..idx].to_owned()
            } else {
                strip_leading(number).to_owned()
            }
        }
        None => strip_leading(number).to_owned(),
    }
}

fn number_valid(number: &str) -> bool {
    const IP_PREFIXES: [&str; 5] = ["11808", "17909", "12593", "17951", "17911"];
    let digits = digit_count(number);
    let first = number.chars().next();
    let first3: String = number.chars().take(3).collect();
    let trimmed = number.trim();
    match first {
        Some('1') if digits > 11 => {
            let head: String = number.chars().take(5).collect();
            IP_PREFIXES.contains(&head.as_str())
        }
        Some('0') if digits > 12 && number.chars().nth(1) != Some('0') => false,
        _ if (first3 == "400" || first3 == "800") && digits != 10 => false,
        _ if first.is_some_and(|c| c != '0' && c != '1' && c != '+')
            && first3 != "400"
            && first3 != "800"
            && digits >= 9 =>
        {
            trimmed.starts_with('9') || trimmed.starts_with('1')
        }
        _ if digits <= 4 => false,
        _ => true,
    }
}

/// Rejects bare eight-digit strings without an area code, and anything with
/// four digits or fewer.
fn raw_string_valid(content: &str) -> bool {
    let trimmed = content.trim();
    let number: String = match trimmed.find(";ext=") {
        Some(ind) => trimmed[..ind].to_owned(),
        None => content.to_owned(),
    };
    let number = if number.starts_with('(') || number.starts_with('[') {
        strip_leading(&number).to_owned()
    } else {
        number
    };
    let digits = digit_count(&number);
    !((!number.starts_with('0') && digits == 8) || digits <= 4)
}

/// Tries each positive rule in pack order; the first one that yields spans
/// wins.
pub(crate) fn apply_positive(
    filtered: &ScanText,
    found: &FoundNumber,
    store: &RuleStore,
    grammar: &dyn PhoneGrammar,
) -> Vec<PhoneSpan> {
    for rule in store.positive_rules() {
        let spans = handle_positive_rule(filtered, found, rule, grammar, store.region());
        if !spans.is_empty() {
            return spans;
        }
    }
    Vec::new()
}

/// A rule applies when its pattern occurs in the candidate (modulo one
/// unbalanced leading bracket) or anywhere in the message; the handler then
/// decides what to emit.
fn handle_positive_rule(
    message: &ScanText,
    found: &FoundNumber,
    rule: &PositiveRule,
    grammar: &dyn PhoneGrammar,
    region: &str,
) -> Vec<PhoneSpan> {
    let raw = found.content.as_str();
    let probed = if is_number_with_one_bracket(raw) {
        strip_leading(raw)
    } else {
        raw
    };
    if !rule.pattern.is_match(probed) && !rule.pattern.is_match(message.as_str()) {
        return Vec::new();
    }
    match rule.handler {
        HandlerKind::Operator => handle_operator(found),
        HandlerKind::Blank => handle_blank(found, &rule.pattern),
        HandlerKind::Slant => handle_slant(found, &rule.pattern, grammar, region),
        HandlerKind::StartWithMobile => handle_mobile_window(message, found, &rule.pattern, false),
        HandlerKind::EndWithMobile => handle_mobile_window(message, found, &rule.pattern, true),
        HandlerKind::Default => handle_default(found),
    }
}

fn handle_default(found: &FoundNumber) -> Vec<PhoneSpan> {
    vec![PhoneSpan {
        begin: found.begin,
        end: found.end,
        content: found.content.clone(),
    }]
}

/// Operator-prefixed numbers keep the candidate span, minus a leading
/// bracket when present.
fn handle_operator(found: &FoundNumber) -> Vec<PhoneSpan> {
    let bracketed = found.content.starts_with('(') || found.content.starts_with('[');
    let (begin, content) = if bracketed {
        (found.begin + 1, strip_leading(&found.content).to_owned())
    } else {
        (found.begin, found.content.clone())
    };
    vec![PhoneSpan {
        begin,
        end: found.end,
        content,
    }]
}

/// Space-grouped numbers. Chat slang shaped like them is excluded.
fn handle_blank(found: &FoundNumber, pattern: &Regex) -> Vec<PhoneSpan> {
    let number = found.content.as_str();
    let Some(m) = find_first_span(pattern, number) else {
        return Vec::new();
    };
    if blank_excluded(number) {
        return Vec::new();
    }
    let bracketed = number.starts_with('(') || number.starts_with('[');
    let begin = if bracketed {
        found.begin
    } else {
        found.begin + m.start
    };
    vec![PhoneSpan {
        begin,
        end: found.begin + m.end,
        content: number.to_owned(),
    }]
}

/// `5201314` and `2333333`-style runs read as chat slang, not numbers.
fn blank_excluded(number: &str) -> bool {
    if number == "5201314" {
        return true;
    }
    let chars: Vec<char> = number.chars().collect();
    let joins_number = |c: char| c == '-' || c.is_ascii_digit();
    for span in find_all_spans(regex!("23{6,7}"), number) {
        let before = span.start.checked_sub(1).and_then(|i| chars.get(i).copied());
        let after = chars.get(span.end).copied();
        if !before.is_some_and(joins_number) && !after.is_some_and(joins_number) {
            return true;
        }
    }
    false
}

/// Slash- or bar-separated short pairs, each side validated on its own.
fn handle_slant(
    found: &FoundNumber,
    pattern: &Regex,
    grammar: &dyn PhoneGrammar,
    region: &str,
) -> Vec<PhoneSpan> {
    let number = found.content.as_str();
    let Some(m) = find_first_span(pattern, number) else {
        return Vec::new();
    };
    let mut start = m.start;
    let halves = numbers_with_slant(number, grammar, region);
    if halves.len() == 2 && start == 1 {
        start = 0;
    }
    let mut out = Vec::new();
    if let Some(first) = halves.first() {
        out.push(PhoneSpan {
            begin: first.begin + start + found.begin,
            end: first.end + found.begin,
            content: first.content.clone(),
        });
        if let Some(second) = halves.get(1) {
            out.push(PhoneSpan {
                begin: second.begin + start + found.begin,
                end: second.end + found.begin,
                content: second.content.clone(),
            });
        }
    }
    out
}

/// Splits at the last `/` or `|` and keeps each half that is a valid short
/// code. Spans are relative to `text`.
fn numbers_with_slant(
    text: &str,
    grammar: &dyn PhoneGrammar,
    region: &str,
) -> Vec<PhoneSpan> {
    let chars: Vec<char> = text.chars().collect();
    let mut slant = 0usize;
    let mut first = String::new();
    let mut second = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c == '/' || c == '|' {
            slant = i;
            first = chars[..i].iter().collect();
            second = chars[i + 1..].iter().collect();
        }
    }
    let mut out = Vec::new();
    if let Some(parsed) = grammar.parse(&first, region) {
        if grammar.is_valid_short(&parsed, region) {
            out.push(PhoneSpan {
                begin: 0,
                end: slant,
                content: first,
            });
        }
    }
    if let Some(parsed) = grammar.parse(&second, region) {
        if grammar.is_valid_short(&parsed, region) {
            out.push(PhoneSpan {
                begin: slant + 1,
                end: chars.len(),
                content: second,
            });
        }
    }
    out
}

/// Keyword windows like `tel: 65529988`. The window must start (or end)
/// with the candidate text; the span covers the candidate only.
fn handle_mobile_window(
    message: &ScanText,
    found: &FoundNumber,
    pattern: &Regex,
    number_first: bool,
) -> Vec<PhoneSpan> {
    let possible = found.content.as_str();
    let possible_len = found.content.chars().count();
    let mut out = Vec::new();
    for span in find_all(pattern, message) {
        let window = message.slice(span.clone());
        let hit = if number_first {
            window.starts_with(possible)
        } else {
            window.ends_with(possible)
        };
        if hit {
            let (begin, end) = if number_first {
                (span.start, span.start + possible_len)
            } else {
                (span.end - possible_len, span.end)
            };
            out.push(PhoneSpan {
                begin,
                end,
                content: possible.to_owned(),
            });
        }
    }
    out
}

/// One more opening bracket than closing, and it leads: the bracket is
/// residue from the find pattern, not part of the number.
pub(crate) fn is_number_with_one_bracket(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let mut left = 0usize;
    let mut right = 0usize;
    for c in s.chars() {
        if c == '(' || c == '[' {
            left += 1;
        }
        if c == ')' || c == ']' {
            right += 1;
        }
    }
    left > right && matches!(s.chars().next(), Some('(') | Some('['))
}

/// Drops an unbalanced leading bracket from a finished span.
pub(crate) fn fix_leading_bracket(span: &mut PhoneSpan) {
    if is_number_with_one_bracket(&span.content) {
        span.begin += 1;
        span.content = strip_leading(&span.content).to_owned();
    }
}

fn strip_leading(s: &str) -> &str {
    s.char_indices()
        .nth(1)
        .map(|(i, _)| &s[i..])
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phone::grammar::DigitGrammar;
    use crate::store::{RuleStore, DEFAULT_PACK};

    fn store() -> RuleStore {
        RuleStore::from_pack_str(DEFAULT_PACK).unwrap()
    }

    fn found(begin: usize, content: &str) -> FoundNumber {
        FoundNumber {
            begin,
            end: begin + content.chars().count(),
            content: content.to_owned(),
            parsed: DigitGrammar.parse(content, "CN").unwrap(),
        }
    }

    #[test]
    fn negative_rules_blank_matches_in_place() {
        let mut text = ScanText::new("mail a@b.com at 12:30");
        redact_negative(&mut text, &store());
        assert_eq!(text.as_str(), "mail AAAAAAA at AAAAA");
    }

    #[test]
    fn border_money_rejects_overlapping_candidate() {
        let text = ScanText::new("pay ¥13812345678 today");
        // candidate is the digit run after the currency mark
        assert!(!passes_borders(&text, 5, 16, &store()));
        let plain = ScanText::new("call 13812345678 today");
        assert!(passes_borders(&plain, 5, 16, &store()));
    }

    #[test]
    fn border_long_digit_run_rejects_contained_candidate() {
        let text = ScanText::new("id 1234567890123456789");
        assert!(!passes_borders(&text, 3, 14, &store()));
    }

    #[test]
    fn prefix_checks_guard_product_codes() {
        let cases: Vec<(&str, usize, usize, bool)> = vec![
            ("call 13812345678", 5, 16, true),
            ("AB13812345678", 2, 13, false),
            ("aB13812345678", 2, 13, true),
            ("-13812345678", 1, 12, true),
            ("13812345678,", 0, 11, true),
            ("13812345678AB", 0, 11, false),
        ];
        for (input, begin, end, want) in cases {
            let text = ScanText::new(input);
            assert_eq!(
                prefix_suffix_valid(&text, begin, end),
                want,
                "input: {input:?}"
            );
        }
    }

    #[test]
    fn code_shapes() {
        let cases: Vec<(&str, bool)> = vec![
            ("13812345678", true),
            ("(0511)12345678", true),
            ("(12345)12", true),
            ("(5555555)55", true),
            ("(5555555]55", false),
            ("[5555555)55", false),
            ("17951138123456", true),
            ("19912345678901", false),
            ("400-123-4567", true),
            ("4001234567890", false),
            ("65529988", true),
            ("958812345", true),
            ("558812345", false),
            ("1234", false),
        ];
        for (input, want) in cases {
            assert_eq!(code_valid(input), want, "input: {input:?}");
        }
    }

    #[test]
    fn raw_string_rejects_bare_eight_digits() {
        assert!(!raw_string_valid("65529988"));
        assert!(raw_string_valid("065529988"));
        assert!(raw_string_valid("13812345678"));
        assert!(!raw_string_valid("1234"));
    }

    #[test]
    fn blank_exclusions() {
        assert!(blank_excluded("5201314"));
        assert!(blank_excluded("2333333"));
        assert!(blank_excluded("23333333"));
        assert!(!blank_excluded("2333333-1"));
        assert!(!blank_excluded("12333333"));
        assert!(!blank_excluded("138 1234 5678"));
    }

    #[test]
    fn slant_handler_splits_valid_short_pairs() {
        let store = store();
        let rule = &store.positive_rules()[0];
        let spans = handle_slant(&found(3, "12345/678"), &rule.pattern, &DigitGrammar, "CN");
        let got: Vec<(usize, usize, &str)> = spans
            .iter()
            .map(|s| (s.begin, s.end, s.content.as_str()))
            .collect();
        assert_eq!(got, vec![(3, 8, "12345"), (9, 12, "678")]);
    }

    #[test]
    fn mobile_window_carves_number_from_keyword_context() {
        let store = store();
        let text = ScanText::new("tel: 65529988");
        let cand = found(5, "65529988");
        let spans = apply_positive(&text, &cand, &store, &DigitGrammar);
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].begin, spans[0].end), (5, 13));
        assert_eq!(spans[0].content, "65529988");
    }

    #[test]
    fn bracket_fixup_only_fires_unbalanced() {
        let mut balanced = PhoneSpan {
            begin: 0,
            end: 14,
            content: "(0511)12345678".to_owned(),
        };
        fix_leading_bracket(&mut balanced);
        assert_eq!(balanced.begin, 0);
        assert_eq!(balanced.content, "(0511)12345678");

        let mut dangling = PhoneSpan {
            begin: 0,
            end: 12,
            content: "(13812345678".to_owned(),
        };
        fix_leading_bracket(&mut dangling);
        assert_eq!(dangling.begin, 1);
        assert_eq!(dangling.content, "13812345678");
    }
}
