//! Input pre-classification.
//!
//! One pass over the raw input producing coarse signals that let the
//! recognizer skip work: the phone scan never runs on digit-less text, and
//! width normalization is skipped when no full-width characters occur.
//!
//! This is a heuristic gate; a false positive only costs the downstream
//! scan a wasted regex pass.

use bitflags::bitflags;

use crate::text::half_width;

bitflags! {
    /// Coarse input characteristics detected by [`ScanFlags::scan`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ScanFlags: u8 {
        /// At least one digit, ASCII or full-width.
        const HAS_DIGITS = 1 << 0;
        /// At least one character the width fold rewrites.
        const HAS_FULLWIDTH = 1 << 1;
    }
}

impl ScanFlags {
    /// Scan `input` once and record what it contains.
    pub fn scan(input: &str) -> Self {
        let mut flags = ScanFlags::empty();
        for c in input.chars() {
            if c.is_ascii_digit() {
                flags |= ScanFlags::HAS_DIGITS;
            } else if let Some(folded) = half_width(c) {
                flags |= ScanFlags::HAS_FULLWIDTH;
                if folded.is_ascii_digit() {
                    flags |= ScanFlags::HAS_DIGITS;
                }
            }
            if flags.contains(ScanFlags::HAS_DIGITS | ScanFlags::HAS_FULLWIDTH) {
                break;
            }
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_reflect_content() {
        let cases: Vec<(&str, ScanFlags)> = vec![
            ("", ScanFlags::empty()),
            ("no numbers here", ScanFlags::empty()),
            ("call 12345", ScanFlags::HAS_DIGITS),
            ("время：", ScanFlags::HAS_FULLWIDTH),
            ("１２３", ScanFlags::HAS_DIGITS | ScanFlags::HAS_FULLWIDTH),
            ("！？", ScanFlags::HAS_FULLWIDTH),
        ];
        for (input, want) in cases {
            assert_eq!(ScanFlags::scan(input), want, "input: {input:?}");
        }
    }
}
