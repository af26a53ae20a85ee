//! Character-indexed text handling.
//!
//! Every span the crate reports is measured in characters, not bytes, so
//! offsets stay meaningful to callers that index the original message by
//! code point. [`ScanText`] wraps a `String` together with a byte-offset
//! table so regex byte positions convert to character positions in O(log n),
//! and so in-place redaction (used by the phone pipeline) keeps the two
//! views consistent.
//!
//! Width folding happens before any rule runs: fullwidth digits, letters and
//! a fixed set of fullwidth punctuation are mapped to their ASCII halves,
//! one character to one character, so spans measured on the folded text are
//! valid on the original.

use std::ops::Range;

/// Offset between a fullwidth form (U+FF01..U+FF5E) and its ASCII half.
const FULLWIDTH_GAP: u32 = 0xFEE0;

/// Maps one fullwidth character to its halfwidth equivalent, or `None` when
/// the character has no mapping and passes through unchanged.
pub(crate) fn half_width(c: char) -> Option<char> {
    let mapped = match c {
        '：' => ':',
        '／' | '∕' => '/',
        '．' => '.',
        '＼' => '\\',
        '，' => ',',
        '！' => '!',
        '（' => '(',
        '）' => ')',
        '？' => '?',
        '﹡' => '*',
        '；' => ';',
        '﹣' | '—' | '－' => '-',
        '【' => '[',
        '】' => ']',
        '＋' => '+',
        '＝' => '=',
        '｛' => '{',
        '｝' => '}',
        '％' => '%',
        '０'..='９' | 'ａ'..='ｚ' | 'Ａ'..='Ｚ' => ((c as u32 - FULLWIDTH_GAP) as u8) as char,
        _ => return None,
    };
    Some(mapped)
}

/// Folds fullwidth characters to halfwidth, one char per char, so the result
/// has the same character length as the input.
pub(crate) fn normalize_width(text: &str) -> String {
    text.chars().map(|c| half_width(c).unwrap_or(c)).collect()
}

/// A text buffer addressed by character index.
///
/// Holds the backing `String` plus a table of byte offsets, one per
/// character, with a final sentinel equal to `text.len()`. Regex matching
/// runs on the `&str` view; match boundaries convert back through
/// [`ScanText::byte_to_char`].
#[derive(Debug, Clone)]
pub(crate) struct ScanText {
    text: String,
    starts: Vec<usize>,
}

impl ScanText {
    pub fn new(text: &str) -> Self {
        Self::from_string(text.to_owned())
    }

    pub fn from_string(text: String) -> Self {
        let mut starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        starts.push(text.len());
        Self { text, starts }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.starts.len() - 1
    }

    pub fn char_at(&self, idx: usize) -> Option<char> {
        if idx >= self.char_len() {
            return None;
        }
        self.text[self.starts[idx]..].chars().next()
    }

    /// Substring for a character range.
    pub fn slice(&self, span: Range<usize>) -> &str {
        &self.text[self.starts[span.start]..self.starts[span.end]]
    }

    pub fn char_to_byte(&self, idx: usize) -> usize {
        self.starts[idx]
    }

    /// Converts a byte offset (a char boundary, as regex boundaries always
    /// are) to its character index.
    pub fn byte_to_char(&self, byte: usize) -> usize {
        self.starts.partition_point(|&s| s < byte)
    }

    /// First occurrence of `needle` at or after character index `from`.
    pub fn find_char(&self, needle: char, from: usize) -> Option<usize> {
        (from..self.char_len()).find(|&i| self.char_at(i) == Some(needle))
    }

    /// Last occurrence of `needle` strictly before character index `before`.
    pub fn rfind_char(&self, needle: char, before: usize) -> Option<usize> {
        (0..before.min(self.char_len()))
            .rev()
            .find(|&i| self.char_at(i) == Some(needle))
    }

    /// Overwrites every character in `span` with `filler`, preserving the
    /// character length of the buffer. Byte offsets are rebuilt because the
    /// replaced characters may have had a different encoded width.
    pub fn redact(&mut self, span: Range<usize>, filler: char) {
        if span.start >= span.end || span.start >= self.char_len() {
            return;
        }
        let end = span.end.min(self.char_len());
        let rebuilt: String = self
            .text
            .chars()
            .enumerate()
            .map(|(i, c)| if i >= span.start && i < end { filler } else { c })
            .collect();
        *self = Self::from_string(rebuilt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_fullwidth_forms() {
        let cases: Vec<(&str, &str)> = vec![
            ("１２３４５", "12345"),
            ("ＡＢＣｘｙｚ", "ABCxyz"),
            ("（０１０）", "(010)"),
            ("１２：３０", "12:30"),
            ("５／６", "5/6"),
            ("﹣—－", "---"),
            ("【５２０】", "[520]"),
            ("no change", "no change"),
            ("电话１１０", "电话110"),
        ];
        for (input, want) in cases {
            assert_eq!(normalize_width(input), want, "input {input:?}");
        }
    }

    #[test]
    fn folding_preserves_char_length() {
        let inputs = ["１２３", "ＡＢ（ｃ）", "みどり１０時", "％＝＋"];
        for input in inputs {
            let folded = normalize_width(input);
            assert_eq!(
                folded.chars().count(),
                input.chars().count(),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn char_offsets_round_trip() {
        let text = ScanText::new("ab电话12");
        assert_eq!(text.char_len(), 6);
        assert_eq!(text.char_at(2), Some('电'));
        assert_eq!(text.slice(2..4), "电话");
        let byte = text.char_to_byte(4);
        assert_eq!(text.byte_to_char(byte), 4);
        assert_eq!(text.byte_to_char(text.as_str().len()), 6);
    }

    #[test]
    fn redact_replaces_chars_and_reindexes() {
        let mut text = ScanText::new("call 电话 12345");
        text.redact(5..7, 'A');
        assert_eq!(text.as_str(), "call AA 12345");
        assert_eq!(text.char_len(), 13);
        assert_eq!(text.slice(8..13), "12345");
    }

    #[test]
    fn redact_clamps_out_of_range() {
        let mut text = ScanText::new("abc");
        text.redact(2..10, 'A');
        assert_eq!(text.as_str(), "abA");
        text.redact(5..6, 'A');
        assert_eq!(text.as_str(), "abA");
    }
}
