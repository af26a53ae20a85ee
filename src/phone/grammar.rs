//! Number grammar oracle.
//!
//! The rule pipeline needs three judgements about a digit string: does it
//! parse at all, is it a valid full number for the region, and is it a
//! plausible short code. [`PhoneGrammar`] is that seam; [`DigitGrammar`] is
//! the built-in heuristic. Callers with a real numbering-plan library can
//! plug it in through [`crate::Recognizer::with_grammar`].

/// A candidate that survived lexical parsing.
///
/// `digits` holds the significant digits only (an `;ext=` suffix is not
/// counted); `has_plus` records an international prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNumber {
    digits: String,
    has_plus: bool,
}

impl ParsedNumber {
    pub fn new(digits: String, has_plus: bool) -> Self {
        ParsedNumber { digits, has_plus }
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn digit_count(&self) -> usize {
        self.digits.len()
    }

    pub fn has_plus(&self) -> bool {
        self.has_plus
    }
}

/// Region-aware validity judgements over parsed numbers.
pub trait PhoneGrammar: Send + Sync {
    /// Lexically parse `candidate`. `None` means the string cannot be a
    /// phone number at all (stray letters, no digits, too many digits).
    fn parse(&self, candidate: &str, region: &str) -> Option<ParsedNumber>;

    /// Is this a complete, diallable number for `region`?
    fn is_valid(&self, number: &ParsedNumber, region: &str) -> bool;

    /// Could this be a short code (hotlines, emergency numbers) in `region`?
    fn is_possible_short(&self, number: &ParsedNumber, region: &str) -> bool;

    /// Is this a well-formed short code in `region`?
    fn is_valid_short(&self, number: &ParsedNumber, region: &str) -> bool;
}

/// Built-in grammar driven purely by digit shape.
///
/// Deliberately permissive: the rule pipeline around it (negative rules,
/// borders, codes validation) carries the precision, the grammar only has
/// to rule out the impossible.
#[derive(Debug, Default, Clone, Copy)]
pub struct DigitGrammar;

const MAX_NUMBER_DIGITS: usize = 17;

impl PhoneGrammar for DigitGrammar {
    fn parse(&self, candidate: &str, _region: &str) -> Option<ParsedNumber> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return None;
        }
        let national = match trimmed.find(";ext=") {
            Some(ind) => &trimmed[..ind],
            None => trimmed,
        };
        let mut digits = String::new();
        for c in national.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
            } else if !matches!(
                c,
                '+' | '-' | '(' | ')' | '[' | ']' | '.' | '/' | ';' | '=' | ' '
            ) {
                return None;
            }
        }
        if digits.is_empty() || digits.len() > MAX_NUMBER_DIGITS {
            return None;
        }
        Some(ParsedNumber {
            digits,
            has_plus: trimmed.starts_with('+'),
        })
    }

    fn is_valid(&self, number: &ParsedNumber, region: &str) -> bool {
        let digits = number.digits().as_bytes();
        let len = digits.len();
        match region {
            "CN" => {
                (len == 11 && digits[0] == b'1' && (b'3'..=b'9').contains(&digits[1]))
                    || (digits[0] == b'0' && (10..=12).contains(&len))
                    || ((number.digits().starts_with("400") || number.digits().starts_with("800"))
                        && len == 10)
                    || (number.has_plus() && (8..=15).contains(&len))
            }
            "US" => {
                (len == 10 && (b'2'..=b'9').contains(&digits[0]))
                    || (len == 11 && digits[0] == b'1' && (b'2'..=b'9').contains(&digits[1]))
            }
            _ => (8..=15).contains(&len),
        }
    }

    fn is_possible_short(&self, number: &ParsedNumber, _region: &str) -> bool {
        (3..=6).contains(&number.digit_count())
    }

    fn is_valid_short(&self, number: &ParsedNumber, region: &str) -> bool {
        self.is_possible_short(number, region) && !number.digits().starts_with('0')
    }
}

/// Digits in `s`, ignoring every other character.
pub(crate) fn digit_count(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_digit()).count()
}
