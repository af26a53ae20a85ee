//! Regex matching that reports character spans.
//!
//! The regex crate measures matches in bytes. These helpers convert match
//! boundaries to character indices once, at the matching site, so the rest
//! of the crate never touches byte offsets.

use std::ops::Range;

use regex::Regex;

use crate::text::ScanText;

/// All non-overlapping matches of `re` in `text`, as character spans.
pub(crate) fn find_all(re: &Regex, text: &ScanText) -> Vec<Range<usize>> {
    re.find_iter(text.as_str())
        .map(|m| text.byte_to_char(m.start())..text.byte_to_char(m.end()))
        .collect()
}

/// All non-overlapping matches of `re` in a plain slice, as character spans
/// relative to the slice. A single forward pass keeps the char counting
/// linear in the slice length.
pub(crate) fn find_all_spans(re: &Regex, s: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut char_idx = 0usize;
    let mut byte_idx = 0usize;
    for m in re.find_iter(s) {
        char_idx += s[byte_idx..m.start()].chars().count();
        let len = s[m.start()..m.end()].chars().count();
        spans.push(char_idx..char_idx + len);
        char_idx += len;
        byte_idx = m.end();
    }
    spans
}

/// First match of `re` in `s`, as a character span relative to `s`.
pub(crate) fn find_first_span(re: &Regex, s: &str) -> Option<Range<usize>> {
    let m = re.find(s)?;
    let begin = s[..m.start()].chars().count();
    let len = s[m.start()..m.end()].chars().count();
    Some(begin..begin + len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_are_char_indexed() {
        let re = Regex::new(r"\d+").unwrap();
        let text = ScanText::new("电话 12345 和 678");
        let spans = find_all(&re, &text);
        assert_eq!(spans, vec![3..8, 11..14]);
        assert_eq!(text.slice(3..8), "12345");
        assert_eq!(text.slice(11..14), "678");
    }

    #[test]
    fn slice_spans_are_relative() {
        let re = Regex::new(r"[a-z]+").unwrap();
        let spans = find_all_spans(&re, "５ab６cd");
        assert_eq!(spans, vec![1..3, 4..6]);
    }

    #[test]
    fn first_span_handles_multibyte_prefix() {
        let re = Regex::new(r"\d{2}").unwrap();
        assert_eq!(find_first_span(&re, "十一时30分"), Some(3..5));
        assert_eq!(find_first_span(&re, "none"), None);
    }
}
